//! Command parsing
//!
//! Turns one line of text into a [`Command`] for the store.

use crate::error::CommandError;
use crate::storage::EntryKind;

/// Command enum to represent store commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    List,
    Create {
        path: String,
        kind: EntryKind,
        permissions: u32,
    },
    Read(String),
    Write {
        path: String,
        content: String,
    },
    Delete(String),
    Rename {
        from: String,
        to: String,
    },
    Chmod {
        path: String,
        permissions: u32,
    },
    RmTree(String),
}

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Quit,
    Continue,
}

/// Whether a script line carries no command
pub fn is_blank(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

// Parse raw command string into Command enum
pub fn parse_command(raw: &str) -> Result<Command, CommandError> {
    let trimmed = raw.trim();
    let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (trimmed, ""),
    };
    let mut args = rest.split_whitespace();

    match cmd.to_ascii_uppercase().as_str() {
        "QUIT" | "Q" => Ok(Command::Quit),
        "LIST" | "LS" => Ok(Command::List),
        "CREATE" => {
            let path = required(args.next(), "CREATE", "path")?;
            let kind = parse_kind(&required(args.next(), "CREATE", "file|dir")?)?;
            let permissions = args.next().map(parse_permissions).transpose()?.unwrap_or(0);
            Ok(Command::Create {
                path,
                kind,
                permissions,
            })
        }
        "READ" => Ok(Command::Read(required(args.next(), "READ", "path")?)),
        "WRITE" => {
            let path = required(args.next(), "WRITE", "path")?;
            // Everything after the path, inner spacing preserved
            let content = rest[path.len()..].trim_start();
            Ok(Command::Write {
                path,
                content: content.to_string(),
            })
        }
        "DELETE" | "RM" => Ok(Command::Delete(required(args.next(), "DELETE", "path")?)),
        "RENAME" | "MV" => Ok(Command::Rename {
            from: required(args.next(), "RENAME", "old")?,
            to: required(args.next(), "RENAME", "new")?,
        }),
        "CHMOD" => Ok(Command::Chmod {
            path: required(args.next(), "CHMOD", "path")?,
            permissions: parse_permissions(&required(args.next(), "CHMOD", "perm")?)?,
        }),
        "RMTREE" => Ok(Command::RmTree(required(args.next(), "RMTREE", "dir")?)),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn required(
    arg: Option<&str>,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    arg.map(str::to_string)
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn parse_kind(raw: &str) -> Result<EntryKind, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "file" | "f" | "regular" => Ok(EntryKind::File),
        "dir" | "d" | "directory" => Ok(EntryKind::Directory),
        _ => Err(CommandError::InvalidArgument(raw.to_string())),
    }
}

/// Decimal, or octal with a `0o` prefix
fn parse_permissions(raw: &str) -> Result<u32, CommandError> {
    let parsed = match raw.strip_prefix("0o") {
        Some(octal) => u32::from_str_radix(octal, 8),
        None => raw.parse(),
    };
    parsed.map_err(|_| CommandError::InvalidArgument(raw.to_string()))
}
