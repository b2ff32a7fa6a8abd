//! Error handlers
//!
//! Provides error reporting helpers for the command layer.

use crate::error::types::{CommandError, ErrorKind, StoreError};
use log::error;

/// Log a command error
pub fn handle_error(err: &CommandError) {
    error!("Command failed: {}", err);
}

/// Convert a store error to its short status label
pub fn store_error_label(err: &StoreError) -> &'static str {
    match err.kind() {
        ErrorKind::NotFound => "not-found",
        ErrorKind::Conflict => "conflict",
        ErrorKind::WrongKind => "wrong-kind",
        ErrorKind::TooLong => "too-long",
        ErrorKind::TooLarge => "too-large",
        ErrorKind::Capacity => "capacity",
        ErrorKind::NotEmpty => "not-empty",
        ErrorKind::InvalidPath => "invalid-path",
    }
}

/// Convert any command error to its short status label
pub fn error_label(err: &CommandError) -> &'static str {
    match err {
        CommandError::UnknownCommand(_) => "unknown-command",
        CommandError::MissingArgument { .. } => "syntax",
        CommandError::InvalidArgument(_) => "syntax",
        CommandError::Store(e) => store_error_label(e),
    }
}
