//! Storage result types
//!
//! Defines the snapshots handed out by read and list operations.

use std::time::SystemTime;

use super::entry::{Entry, EntryKind};

/// Point-in-time copy of a live entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySnapshot {
    pub path: String,
    pub kind: EntryKind,
    pub permissions: u32,
    pub size: usize,
    pub created_at: SystemTime,
    pub accessed_at: SystemTime,
    /// `None` for directories.
    pub content: Option<Vec<u8>>,
}

impl EntrySnapshot {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Content as text, with invalid UTF-8 replaced
    pub fn content_lossy(&self) -> Option<String> {
        self.content
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl From<&Entry> for EntrySnapshot {
    fn from(entry: &Entry) -> Self {
        Self {
            path: entry.path.clone(),
            kind: entry.kind,
            permissions: entry.permissions,
            size: entry.content.len(),
            created_at: entry.created_at,
            accessed_at: entry.accessed_at,
            content: match entry.kind {
                EntryKind::File => Some(entry.content.clone()),
                EntryKind::Directory => None,
            },
        }
    }
}

/// Iterator over the live entries of a store, in slot order.
///
/// Cloning yields an independent cursor at the same position; calling
/// `PathStore::list` again starts over.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    slots: std::slice::Iter<'a, Entry>,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(slots: &'a [Entry]) -> Self {
        Self {
            slots: slots.iter(),
        }
    }
}

impl Iterator for Entries<'_> {
    type Item = EntrySnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .find(|entry| entry.live)
            .map(EntrySnapshot::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}
