//! Entry records
//!
//! One slot of the store table. A slot keeps its last contents after the
//! entry is deleted and is overwritten when it is handed out again.

use std::fmt;
use std::time::SystemTime;

/// Whether an entry is a regular file or a directory. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

/// A file or directory record.
#[derive(Debug, Clone)]
pub struct Entry {
    pub(crate) path: String,
    pub(crate) kind: EntryKind,
    pub(crate) permissions: u32,
    pub(crate) created_at: SystemTime,
    pub(crate) accessed_at: SystemTime,
    pub(crate) content: Vec<u8>,
    pub(crate) live: bool,
}

impl Entry {
    pub(crate) fn new(path: String, kind: EntryKind, permissions: u32) -> Self {
        let now = SystemTime::now();
        Self {
            path,
            kind,
            permissions,
            created_at: now,
            accessed_at: now,
            content: Vec::new(),
            live: true,
        }
    }

    /// Marks the slot free. The path stays until the slot is reused.
    pub(crate) fn tombstone(&mut self) {
        self.live = false;
        self.content.clear();
    }

    pub(crate) fn touch(&mut self) {
        self.accessed_at = SystemTime::now();
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
