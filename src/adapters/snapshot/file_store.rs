//! File-backed snapshot store.
//!
//! Writes go to `<file>.tmp` in the target directory and are renamed over the
//! canonical path, so readers see either the previous snapshot or the new one
//! and never a partial file. Reads treat a missing or malformed file as
//! "no snapshot" rather than an error.

use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::domain::models::Dataset;

/// Fixed file name of the snapshot inside the cache directory.
pub const SNAPSHOT_FILENAME: &str = "vpsdb.json";

/// Failures persisting a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SnapshotError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Snapshot store rooted at a cache directory.
#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    path: PathBuf,
    /// Whether a snapshot is known to exist on disk.
    available: AtomicBool,
}

impl SnapshotStore {
    /// Create a store for `<dir>/vpsdb.json`. Touches nothing on disk.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(SNAPSHOT_FILENAME);
        Self {
            dir,
            path,
            available: AtomicBool::new(false),
        }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Canonical snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Staging path used during writes.
    pub fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{SNAPSHOT_FILENAME}.tmp"))
    }

    /// Whether the last write or read confirmed a snapshot on disk.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Create the cache directory if needed. Idempotent.
    pub async fn ensure_dir(&self) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SnapshotError::io(&self.dir, e))
    }

    /// Atomically replace the snapshot with `data`.
    ///
    /// On failure the staging file is removed best-effort and the canonical
    /// path keeps its previous content.
    pub async fn write(&self, data: &Dataset) -> Result<(), SnapshotError> {
        let temp_path = self.temp_path();

        match self.stage_and_rename(data, &temp_path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Successfully wrote to cache file");
                self.set_available(true);
                Ok(())
            }
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "Failed to atomically write to cache file");
                if let Err(cleanup) = fs::remove_file(&temp_path).await {
                    if cleanup.kind() != ErrorKind::NotFound {
                        error!(
                            path = %temp_path.display(),
                            error = %cleanup,
                            "Failed to cleanup temp cache file"
                        );
                    }
                }
                Err(err)
            }
        }
    }

    async fn stage_and_rename(&self, data: &Dataset, temp_path: &Path) -> Result<(), SnapshotError> {
        self.ensure_dir().await?;
        let json = serde_json::to_vec_pretty(data)?;

        let mut file = fs::File::create(temp_path)
            .await
            .map_err(|e| SnapshotError::io(temp_path, e))?;
        file.write_all(&json)
            .await
            .map_err(|e| SnapshotError::io(temp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| SnapshotError::io(temp_path, e))?;
        drop(file);

        fs::rename(temp_path, &self.path)
            .await
            .map_err(|e| SnapshotError::io(&self.path, e))
    }

    /// Load the snapshot.
    ///
    /// Returns `None` when the file is missing, unreadable, not JSON, or not
    /// an array; the availability flag is cleared in each of those cases.
    pub async fn read(&self) -> Option<Dataset> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Disk cache file not found");
                self.set_available(false);
                return None;
            }
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "Failed to load disk cache");
                self.set_available(false);
                return None;
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(records)) => {
                info!(path = %self.path.display(), count = records.len(), "Successfully loaded disk cache");
                self.set_available(true);
                Some(records)
            }
            Ok(_) => {
                warn!(path = %self.path.display(), "Disk cache file has unexpected format. Treating as empty");
                self.set_available(false);
                None
            }
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "Failed to load disk cache");
                self.set_available(false);
                None
            }
        }
    }
}
