//! In-memory path storage
//!
//! Holds a fixed-capacity table of file and directory entries addressed by
//! full path strings. The hierarchy is implied by the paths themselves.

pub mod entry;
pub mod path;
pub mod results;
pub mod store;

pub use entry::{Entry, EntryKind};
pub use results::{Entries, EntrySnapshot};
pub use store::PathStore;
