//! Text command layer
//!
//! A thin driver over `PathStore` used by the `ramfs` binary. It owns no
//! state of its own.

mod handlers;
mod parser;

pub use handlers::{DEMO_SCRIPT, describe, handle_command, run_line, run_script};
pub use parser::{Command, CommandResult, is_blank, parse_command};
