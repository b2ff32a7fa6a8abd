//! Command handlers
//!
//! Executes parsed commands against a `PathStore` and writes one response
//! line per result: `OK ...` or `ERR <label>: <message>`.

use log::info;
use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::commands::parser::{Command, CommandResult, is_blank, parse_command};
use crate::error::CommandError;
use crate::error::handlers::{error_label, handle_error};
use crate::storage::{EntryKind, EntrySnapshot, PathStore};

/// The walkthrough run when the binary gets no script.
pub const DEMO_SCRIPT: &str = "\
CREATE dir1/file1.txt file 3
CREATE dir1/dir2 dir 1
WRITE dir1/file1.txt This is a test file.
READ dir1/file1.txt
READ dir1/dir2
CHMOD dir1/file1.txt 1
DELETE dir1/file1.txt
READ dir1/file1.txt
RENAME dir1/dir2 dir1/dir3
READ dir1/dir2
READ dir1/dir3
RMTREE dir1
LIST
";

// Handle a single command and write its response
pub fn handle_command<W: Write>(
    store: &mut PathStore,
    command: Command,
    out: &mut W,
) -> io::Result<CommandResult> {
    let outcome = match command {
        Command::Quit => {
            writeln!(out, "OK bye")?;
            return Ok(CommandResult::Quit);
        }
        Command::List => return handle_cmd_list(store, out),
        Command::Create {
            path,
            kind,
            permissions,
        } => store
            .create(&path, kind, permissions)
            .map(|_| format!("created '{}' ({})", path, kind)),
        Command::Read(path) => store.read(&path).map(|snap| describe(&snap)),
        Command::Write { path, content } => store
            .write(&path, &content)
            .map(|_| format!("'{}' updated, {} bytes", path, content.len())),
        Command::Delete(path) => store.delete(&path).map(|_| format!("deleted '{}'", path)),
        Command::Rename { from, to } => store
            .rename(&from, &to)
            .map(|_| format!("renamed '{}' to '{}'", from, to)),
        Command::Chmod { path, permissions } => store
            .chmod(&path, permissions)
            .map(|_| format!("permissions for '{}' set to {}", path, permissions)),
        Command::RmTree(dir) => {
            let removed = store.delete_subtree(&dir);
            Ok(format!("removed {} entries below '{}'", removed, dir))
        }
    };

    match outcome {
        Ok(message) => writeln!(out, "OK {}", message)?,
        Err(e) => write_error(out, &CommandError::from(e))?,
    }
    Ok(CommandResult::Continue)
}

fn handle_cmd_list<W: Write>(store: &PathStore, out: &mut W) -> io::Result<CommandResult> {
    writeln!(out, "OK {} of {} slots in use", store.len(), store.capacity())?;
    for snap in store.list() {
        writeln!(out, "{}", describe(&snap))?;
    }
    Ok(CommandResult::Continue)
}

/// Parse and run one line. Blank and comment lines are skipped.
pub fn run_line<W: Write>(
    store: &mut PathStore,
    line: &str,
    out: &mut W,
) -> io::Result<CommandResult> {
    if is_blank(line) {
        return Ok(CommandResult::Continue);
    }
    match parse_command(line) {
        Ok(command) => handle_command(store, command, out),
        Err(e) => {
            write_error(out, &e)?;
            Ok(CommandResult::Continue)
        }
    }
}

/// Run commands line by line until input ends or `QUIT` is read
pub fn run_script<R: BufRead, W: Write>(
    store: &mut PathStore,
    input: R,
    mut out: W,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if run_line(store, &line, &mut out)? == CommandResult::Quit {
            info!("Script ended by QUIT");
            break;
        }
    }
    out.flush()
}

fn write_error<W: Write>(out: &mut W, err: &CommandError) -> io::Result<()> {
    handle_error(err);
    writeln!(out, "ERR {}: {}", error_label(err), err)
}

/// One-line summary of an entry, content included for files
pub fn describe(snap: &EntrySnapshot) -> String {
    let kind = match snap.kind {
        EntryKind::File => "Regular",
        EntryKind::Directory => "Directory",
    };
    let mut line = format!(
        "{} type={} perm={} size={} created={} accessed={}",
        snap.path,
        kind,
        snap.permissions,
        snap.size,
        unix_secs(snap.created_at),
        unix_secs(snap.accessed_at)
    );
    if let Some(content) = snap.content_lossy() {
        line.push_str(&format!(" content={:?}", content));
    }
    line
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_secs())
        .unwrap_or(0)
}
