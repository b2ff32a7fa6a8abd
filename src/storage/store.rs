//! Path store operations
//!
//! A flat, fixed-capacity table of entries that behaves like a directory
//! tree. Parent/child links are never stored: an entry's parent is the part
//! of its path before the last separator, and every live entry's ancestors
//! exist as live directories.
//!
//! Slots are handed out lowest index first. Deleting an entry tombstones its
//! slot and returns it to the free set; `index` maps every live path to its
//! slot.

use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::storage::entry::{Entry, EntryKind};
use crate::storage::path;
use crate::storage::results::{Entries, EntrySnapshot};

pub struct PathStore {
    config: StoreConfig,
    slots: Vec<Entry>,
    free: BTreeSet<usize>,
    index: HashMap<String, usize>,
}

impl Default for PathStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl PathStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.max_entries),
            free: BTreeSet::new(),
            index: HashMap::with_capacity(config.max_entries),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.config.max_entries
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Slots that a create could still use, tombstoned or never touched.
    pub fn free_slots(&self) -> usize {
        self.free.len() + (self.config.max_entries - self.slots.len())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    // --------------------
    // Operations
    // --------------------

    /// Create a directory for every proper prefix of `path` that lacks one.
    ///
    /// Calling it again for the same path creates nothing.
    pub fn ensure_ancestors(&mut self, path: &str) -> Result<(), StoreError> {
        self.validate(path)?;
        let missing = self.missing_ancestors(path)?;
        if missing.len() > self.free_slots() {
            warn!("No room for {} ancestors of {}", missing.len(), path);
            return Err(StoreError::Capacity(self.config.max_entries));
        }
        self.materialize(missing);
        Ok(())
    }

    /// Create a file or directory, synthesizing any missing ancestor
    /// directories first.
    ///
    /// Nothing is created unless the new entry and all of its missing
    /// ancestors fit in the free slots.
    pub fn create(
        &mut self,
        path: &str,
        kind: EntryKind,
        permissions: u32,
    ) -> Result<(), StoreError> {
        self.validate(path)?;
        if self.index.contains_key(path) {
            return Err(StoreError::Conflict(path.to_string()));
        }

        let missing = self.missing_ancestors(path)?;
        if missing.len() + 1 > self.free_slots() {
            warn!("Table full, cannot create {}", path);
            return Err(StoreError::Capacity(self.config.max_entries));
        }

        self.materialize(missing);
        self.insert(Entry::new(path.to_string(), kind, permissions));
        info!("Created {} ({})", path, kind);
        Ok(())
    }

    /// Snapshot an entry and mark it accessed.
    pub fn read(&mut self, path: &str) -> Result<EntrySnapshot, StoreError> {
        let idx = self.lookup(path)?;
        let entry = &mut self.slots[idx];
        entry.touch();
        Ok(EntrySnapshot::from(&*entry))
    }

    /// Snapshot an entry without touching its access time.
    pub fn stat(&self, path: &str) -> Result<EntrySnapshot, StoreError> {
        let idx = self.lookup(path)?;
        Ok(EntrySnapshot::from(&self.slots[idx]))
    }

    /// Replace a file's content.
    pub fn write(&mut self, path: &str, content: impl AsRef<[u8]>) -> Result<(), StoreError> {
        let content = content.as_ref();
        let idx = self.lookup(path)?;
        let max = self.config.max_content_len;
        let entry = &mut self.slots[idx];

        if entry.is_dir() {
            return Err(StoreError::WrongKind {
                path: path.to_string(),
                expected: EntryKind::File,
            });
        }
        if content.len() >= max {
            return Err(StoreError::TooLarge {
                path: path.to_string(),
                max,
            });
        }

        entry.content.clear();
        entry.content.extend_from_slice(content);
        entry.touch();
        info!("Wrote {} bytes to {}", content.len(), path);
        Ok(())
    }

    /// Delete a single entry. Directories must be empty first.
    pub fn delete(&mut self, path: &str) -> Result<(), StoreError> {
        let idx = self.lookup(path)?;
        if self.slots[idx].is_dir() && self.has_descendants(path) {
            return Err(StoreError::NotEmpty(path.to_string()));
        }
        self.tombstone(idx);
        info!("Deleted {}", path);
        Ok(())
    }

    /// Move an entry, and everything below it for a directory, to `new_path`.
    ///
    /// Missing ancestors of `new_path` are created the same way `create`
    /// creates them.
    pub fn rename(&mut self, old_path: &str, new_path: &str) -> Result<(), StoreError> {
        self.validate(new_path)?;
        if old_path == new_path {
            self.lookup(old_path)?;
            return Ok(());
        }
        if self.index.contains_key(new_path) {
            return Err(StoreError::Conflict(new_path.to_string()));
        }
        let idx = self.lookup(old_path)?;

        let sep = self.config.separator;
        if path::is_descendant(new_path, old_path, sep) {
            return Err(StoreError::InvalidPath(new_path.to_string()));
        }

        let mut moved = vec![(idx, new_path.to_string())];
        if self.slots[idx].is_dir() {
            for (i, entry) in self.slots.iter().enumerate() {
                if entry.live && path::is_descendant(&entry.path, old_path, sep) {
                    let rebased = path::rebase(&entry.path, old_path, new_path);
                    if rebased.len() >= self.config.max_path_len {
                        return Err(StoreError::TooLong {
                            path: rebased,
                            max: self.config.max_path_len,
                        });
                    }
                    if self.index.contains_key(&rebased) {
                        return Err(StoreError::Conflict(rebased));
                    }
                    moved.push((i, rebased));
                }
            }
        }

        let missing = self.missing_ancestors(new_path)?;
        if missing.len() > self.free_slots() {
            warn!("Table full, cannot rename {} to {}", old_path, new_path);
            return Err(StoreError::Capacity(self.config.max_entries));
        }
        self.materialize(missing);

        for (i, _) in &moved {
            self.index.remove(&self.slots[*i].path);
        }
        for (i, rebased) in moved {
            self.index.insert(rebased.clone(), i);
            self.slots[i].path = rebased;
        }
        info!("Renamed {} to {}", old_path, new_path);
        Ok(())
    }

    /// Update an entry's permission bits. They are stored, never enforced.
    pub fn chmod(&mut self, path: &str, permissions: u32) -> Result<(), StoreError> {
        let idx = self.lookup(path)?;
        self.slots[idx].permissions = permissions;
        info!("Permissions for {} set to {}", path, permissions);
        Ok(())
    }

    /// Live entries in slot order. Access times are left alone.
    pub fn list(&self) -> Entries<'_> {
        Entries::new(&self.slots)
    }

    /// Delete every file below `dir_path`. Nested directories are emptied
    /// recursively but kept, as is `dir_path` itself.
    ///
    /// Returns how many entries were removed.
    pub fn delete_subtree(&mut self, dir_path: &str) -> usize {
        let removed = self.sweep(dir_path);
        info!("Removed {} entries below {}", removed, dir_path);
        removed
    }

    // --------------------
    // Internals
    // --------------------

    fn validate(&self, path: &str) -> Result<(), StoreError> {
        path::validate_path(path, self.config.separator, self.config.max_path_len)
    }

    fn lookup(&self, path: &str) -> Result<usize, StoreError> {
        self.index
            .get(path)
            .copied()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    /// Ancestor prefixes of `path` with no live entry, shortest first.
    fn missing_ancestors(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let mut missing = Vec::new();
        for prefix in path::ancestors(path, self.config.separator) {
            match self.index.get(prefix) {
                Some(&idx) if !self.slots[idx].is_dir() => {
                    return Err(StoreError::WrongKind {
                        path: prefix.to_string(),
                        expected: EntryKind::Directory,
                    });
                }
                Some(_) => {}
                None => missing.push(prefix.to_string()),
            }
        }
        Ok(missing)
    }

    /// Caller has checked that every directory fits.
    fn materialize(&mut self, missing: Vec<String>) {
        let permissions = self.config.default_dir_permissions;
        for dir in missing {
            debug!("Synthesizing directory {}", dir);
            self.insert(Entry::new(dir, EntryKind::Directory, permissions));
        }
    }

    fn insert(&mut self, entry: Entry) {
        let path = entry.path.clone();
        let idx = match self.free.pop_first() {
            Some(idx) => {
                self.slots[idx] = entry;
                idx
            }
            None => {
                self.slots.push(entry);
                self.slots.len() - 1
            }
        };
        self.index.insert(path, idx);
    }

    fn tombstone(&mut self, idx: usize) {
        let entry = &mut self.slots[idx];
        self.index.remove(&entry.path);
        entry.tombstone();
        self.free.insert(idx);
    }

    fn has_descendants(&self, dir_path: &str) -> bool {
        let sep = self.config.separator;
        self.index
            .keys()
            .any(|p| path::is_descendant(p, dir_path, sep))
    }

    /// Recurses into each nested directory, then tombstones the files still
    /// live below `dir_path`. Directories are never tombstoned here.
    fn sweep(&mut self, dir_path: &str) -> usize {
        let sep = self.config.separator;
        let matched: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.live && path::is_descendant(&e.path, dir_path, sep))
            .map(|(i, _)| i)
            .collect();

        let mut removed = 0;
        for &idx in &matched {
            let entry = &self.slots[idx];
            if entry.live && entry.is_dir() {
                let child = entry.path.clone();
                debug!("Sweeping {}", child);
                removed += self.sweep(&child);
            }
        }
        for idx in matched {
            let entry = &self.slots[idx];
            if entry.live && !entry.is_dir() {
                self.tombstone(idx);
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn small_store(max_entries: usize) -> PathStore {
        PathStore::new(StoreConfig {
            max_entries,
            ..StoreConfig::default()
        })
    }

    fn live_paths(store: &PathStore) -> Vec<String> {
        store.list().map(|s| s.path).collect()
    }

    #[test]
    fn test_create_synthesizes_ancestors_in_order() {
        let mut store = PathStore::default();
        store.create("a/b/c.txt", EntryKind::File, 3).unwrap();
        assert_eq!(live_paths(&store), vec!["a", "a/b", "a/b/c.txt"]);
        assert!(store.stat("a").unwrap().is_dir());
        assert_eq!(store.stat("a/b").unwrap().permissions, 0);
    }

    #[test]
    fn test_synthesized_dirs_use_configured_permissions() {
        let mut store = PathStore::new(StoreConfig {
            default_dir_permissions: 0o755,
            ..StoreConfig::default()
        });
        store.create("x/y", EntryKind::File, 1).unwrap();
        assert_eq!(store.stat("x").unwrap().permissions, 0o755);
        assert_eq!(store.stat("x/y").unwrap().permissions, 1);
    }

    #[test]
    fn test_ensure_ancestors_is_idempotent() {
        let mut store = PathStore::default();
        store.ensure_ancestors("a/b/c").unwrap();
        store.ensure_ancestors("a/b/c").unwrap();
        assert_eq!(live_paths(&store), vec!["a", "a/b"]);
        assert!(!store.contains("a/b/c"));
    }

    #[test]
    fn test_create_rejects_duplicate_path() {
        let mut store = PathStore::default();
        store.create("f", EntryKind::File, 0).unwrap();
        let err = store.create("f", EntryKind::Directory, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_cannot_act_as_ancestor() {
        let mut store = PathStore::default();
        store.create("f", EntryKind::File, 0).unwrap();
        let err = store.create("f/child", EntryKind::File, 0).unwrap_err();
        assert_eq!(
            err,
            StoreError::WrongKind {
                path: "f".into(),
                expected: EntryKind::Directory
            }
        );
    }

    #[test]
    fn test_create_is_all_or_nothing_on_capacity() {
        let mut store = small_store(2);
        let err = store.create("a/b/c", EntryKind::File, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert!(store.is_empty());
        assert_eq!(store.free_slots(), 2);
    }

    #[test]
    fn test_tombstoned_slot_is_reused_first() {
        let mut store = small_store(3);
        store.create("one", EntryKind::File, 0).unwrap();
        store.create("two", EntryKind::File, 0).unwrap();
        store.create("three", EntryKind::File, 0).unwrap();
        store.delete("one").unwrap();
        store.create("four", EntryKind::File, 0).unwrap();
        assert_eq!(live_paths(&store), vec!["four", "two", "three"]);
    }

    #[test]
    fn test_read_touches_access_time_but_stat_and_list_do_not() {
        let mut store = PathStore::default();
        store.create("f", EntryKind::File, 0).unwrap();
        let before = store.stat("f").unwrap();
        let listed: Vec<_> = store.list().collect();
        assert_eq!(listed[0].accessed_at, before.accessed_at);
        let read = store.read("f").unwrap();
        assert!(read.accessed_at >= before.accessed_at);
        assert_eq!(store.stat("f").unwrap().accessed_at, read.accessed_at);
    }

    #[test]
    fn test_write_checks_kind_and_size() {
        let mut store = small_store(4);
        store.create("d", EntryKind::Directory, 0).unwrap();
        store.create("d/f", EntryKind::File, 0).unwrap();

        let err = store.write("d", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongKind);

        let max = store.config().max_content_len;
        let err = store.write("d/f", vec![b'a'; max]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooLarge);

        store.write("d/f", vec![b'a'; max - 1]).unwrap();
        assert_eq!(store.stat("d/f").unwrap().size, max - 1);

        let err = store.write("missing", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_refuses_non_empty_directory() {
        let mut store = PathStore::default();
        store.create("d/f", EntryKind::File, 0).unwrap();
        assert_eq!(store.delete("d").unwrap_err().kind(), ErrorKind::NotEmpty);
        store.delete("d/f").unwrap();
        store.delete("d").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_rename_rewrites_descendants() {
        let mut store = PathStore::default();
        store.create("a/b/c.txt", EntryKind::File, 0).unwrap();
        store.write("a/b/c.txt", "payload").unwrap();
        store.rename("a/b", "a/z").unwrap();

        assert_eq!(live_paths(&store), vec!["a", "a/z", "a/z/c.txt"]);
        assert_eq!(
            store.read("a/z/c.txt").unwrap().content.as_deref(),
            Some(&b"payload"[..])
        );
        assert_eq!(store.stat("a/b").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_rename_creates_missing_target_ancestors() {
        let mut store = PathStore::default();
        store.create("f", EntryKind::File, 0).unwrap();
        store.rename("f", "new/dir/f").unwrap();
        assert_eq!(live_paths(&store), vec!["new/dir/f", "new", "new/dir"]);
    }

    #[test]
    fn test_rename_error_cases() {
        let mut store = PathStore::default();
        store.create("a/b", EntryKind::Directory, 0).unwrap();
        store.create("c", EntryKind::File, 0).unwrap();

        assert_eq!(store.rename("c", "a").unwrap_err().kind(), ErrorKind::Conflict);
        assert_eq!(store.rename("nope", "x").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(
            store.rename("a", "a/b/inner").unwrap_err().kind(),
            ErrorKind::InvalidPath
        );
        let long = "x".repeat(store.config().max_path_len);
        assert_eq!(store.rename("c", &long).unwrap_err().kind(), ErrorKind::TooLong);
        store.rename("c", "c").unwrap();
        assert!(store.contains("c"));
    }

    #[test]
    fn test_delete_subtree_empties_but_keeps_nested_directories() {
        let mut store = PathStore::default();
        store.create("top/a.txt", EntryKind::File, 0).unwrap();
        store.create("top/sub/deeper/b.txt", EntryKind::File, 0).unwrap();
        store.create("top2/c.txt", EntryKind::File, 0).unwrap();

        let removed = store.delete_subtree("top");
        assert_eq!(removed, 2);
        assert_eq!(
            live_paths(&store),
            vec!["top", "top/sub", "top/sub/deeper", "top2", "top2/c.txt"]
        );
        assert!(store.stat("top/sub/deeper").unwrap().is_dir());
        assert_eq!(store.delete_subtree("top"), 0);
    }

    #[test]
    fn test_ensure_ancestors_capacity_leaves_table_unchanged() {
        let mut store = small_store(2);
        store.create("x", EntryKind::File, 0).unwrap();

        let err = store.ensure_ancestors("a/b/c").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert_eq!(live_paths(&store), vec!["x"]);
        assert_eq!(store.free_slots(), 1);
    }

    #[test]
    fn test_rename_capacity_leaves_table_unchanged() {
        let mut store = small_store(2);
        store.create("f", EntryKind::File, 0).unwrap();
        store.create("g", EntryKind::File, 0).unwrap();

        let err = store.rename("f", "d/f").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert_eq!(live_paths(&store), vec!["f", "g"]);
        assert!(!store.contains("d"));
        assert!(!store.contains("d/f"));
    }

    #[test]
    fn test_rename_under_a_file_is_wrong_kind() {
        let mut store = PathStore::default();
        store.create("file", EntryKind::File, 0).unwrap();
        store.create("g", EntryKind::File, 0).unwrap();

        let err = store.rename("g", "file/g").unwrap_err();
        assert_eq!(
            err,
            StoreError::WrongKind {
                path: "file".into(),
                expected: EntryKind::Directory
            }
        );
        assert_eq!(live_paths(&store), vec!["file", "g"]);
    }

    #[test]
    fn test_chmod_updates_permissions_only() {
        let mut store = PathStore::default();
        store.create("f", EntryKind::File, 3).unwrap();
        store.chmod("f", 1).unwrap();
        let snap = store.stat("f").unwrap();
        assert_eq!(snap.permissions, 1);
        assert_eq!(snap.kind, EntryKind::File);
        assert_eq!(store.chmod("g", 1).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
