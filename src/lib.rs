pub mod commands;
pub mod config;
pub mod error;
pub mod storage;
pub mod utils;

pub use config::StoreConfig;
pub use error::{ErrorKind, StoreError};
pub use storage::{EntryKind, EntrySnapshot, PathStore};
