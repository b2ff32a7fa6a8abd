//! Path validation
//!
//! Paths are plain strings split on a single separator character. There is
//! no root entry and no `.`/`..` handling: `a/b/c` has ancestors `a` and
//! `a/b`.

use crate::error::StoreError;

/// Check that a path is non-empty, short enough and has no empty segment.
pub fn validate_path(path: &str, separator: char, max_len: usize) -> Result<(), StoreError> {
    if path.len() >= max_len {
        return Err(StoreError::TooLong {
            path: path.to_string(),
            max: max_len,
        });
    }
    if path.is_empty() || path.split(separator).any(str::is_empty) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Proper prefixes of `path` ending just before a separator, shortest first.
pub fn ancestors(path: &str, separator: char) -> impl Iterator<Item = &str> {
    path.match_indices(separator).map(move |(i, _)| &path[..i])
}

/// Whether `path` lies strictly below `dir`.
pub fn is_descendant(path: &str, dir: &str, separator: char) -> bool {
    path.strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix(separator))
        .is_some_and(|rest| !rest.is_empty())
}

/// Replace the `old_prefix` head of `path` with `new_prefix`.
///
/// `path` must be `old_prefix` itself or one of its descendants.
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> String {
    format!("{}{}", new_prefix, &path[old_prefix.len()..])
}
