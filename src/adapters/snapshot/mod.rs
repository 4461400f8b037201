//! Durable snapshot of the last known-good dataset.
//!
//! One JSON file per process, replaced atomically via temp-file-then-rename.

pub mod file_store;

pub use file_store::{SnapshotError, SnapshotStore, SNAPSHOT_FILENAME};
