//! Error types
//!
//! Defines the error kinds returned by `PathStore` operations and by the
//! text command layer that drives it.

use std::fmt;

use crate::storage::EntryKind;

/// Fieldless discriminant of a [`StoreError`], convenient for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    WrongKind,
    TooLong,
    TooLarge,
    Capacity,
    NotEmpty,
    InvalidPath,
}

/// Store module errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No live entry at the given path.
    NotFound(String),
    /// The target path is already held by a live entry.
    Conflict(String),
    /// The entry at `path` is not of the `expected` kind.
    WrongKind { path: String, expected: EntryKind },
    TooLong { path: String, max: usize },
    TooLarge { path: String, max: usize },
    /// Every slot of the table is live.
    Capacity(usize),
    /// A directory with live descendants cannot be deleted on its own.
    NotEmpty(String),
    InvalidPath(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Conflict(_) => ErrorKind::Conflict,
            StoreError::WrongKind { .. } => ErrorKind::WrongKind,
            StoreError::TooLong { .. } => ErrorKind::TooLong,
            StoreError::TooLarge { .. } => ErrorKind::TooLarge,
            StoreError::Capacity(_) => ErrorKind::Capacity,
            StoreError::NotEmpty(_) => ErrorKind::NotEmpty,
            StoreError::InvalidPath(_) => ErrorKind::InvalidPath,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(p) => write!(f, "Entry not found: {}", p),
            StoreError::Conflict(p) => write!(f, "Entry already exists: {}", p),
            StoreError::WrongKind { path, expected } => {
                write!(f, "Expected a {} at {}", expected, path)
            }
            StoreError::TooLong { path, max } => {
                write!(f, "Path too long (limit {} bytes): {}", max, path)
            }
            StoreError::TooLarge { path, max } => {
                write!(f, "Content too large for {} (limit {} bytes)", path, max)
            }
            StoreError::Capacity(max) => write!(f, "No free slot left ({} entries max)", max),
            StoreError::NotEmpty(p) => write!(f, "Directory not empty: {}", p),
            StoreError::InvalidPath(p) => write!(f, "Invalid path: {:?}", p),
        }
    }
}

impl std::error::Error for StoreError {}

/// Command layer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand(String),
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    InvalidArgument(String),
    Store(StoreError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(c) => write!(f, "Unknown command: {}", c),
            CommandError::MissingArgument { command, argument } => {
                write!(f, "{} requires <{}>", command, argument)
            }
            CommandError::InvalidArgument(a) => write!(f, "Invalid argument: {}", a),
            CommandError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(error: StoreError) -> Self {
        CommandError::Store(error)
    }
}
