//! Common test utilities for integration tests
//!
//! Provides shared fixtures, source doubles, and wait helpers used across
//! multiple integration test files.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use vps_data::{Dataset, GamesCache, GamesSource, SnapshotStore, UpstreamError, DEFAULT_TTL};

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Two-game fixture used across tests
pub fn sample_games() -> Dataset {
    vec![
        json!({
            "id": "mm",
            "name": "Medieval Madness",
            "manufacturer": "Williams",
            "tableFiles": [{"id": "mm-vpx", "version": "2.0"}]
        }),
        json!({
            "id": "tz",
            "name": "Twilight Zone",
            "manufacturer": "Bally",
            "tableFiles": [
                {"id": "tz-vpx", "version": "1.4"},
                {"id": "tz-fp", "version": "1.0"}
            ]
        }),
    ]
}

/// Upstream double returning a fixed result and counting calls
#[allow(dead_code)]
pub struct StubSource {
    calls: AtomicUsize,
    data: Option<Dataset>,
}

#[allow(dead_code)]
impl StubSource {
    /// Source that always succeeds with `data`
    pub fn ok(data: Dataset) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            data: Some(data),
        })
    }

    /// Source that always fails with a 503
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            data: None,
        })
    }

    /// Number of fetches so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GamesSource for StubSource {
    async fn fetch(&self) -> Result<Dataset, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.data
            .clone()
            .ok_or(UpstreamError::Status(StatusCode::SERVICE_UNAVAILABLE))
    }
}

/// Cache over `source` with its snapshot in `dir`
#[allow(dead_code)]
pub fn cache_over(source: Arc<dyn GamesSource>, dir: &TempDir) -> GamesCache {
    GamesCache::new(source, SnapshotStore::new(dir.path()), DEFAULT_TTL)
}

/// Write `data` as the snapshot file in `dir`
#[allow(dead_code)]
pub fn write_snapshot(dir: &TempDir, data: &Dataset) {
    let body = serde_json::to_string_pretty(data).expect("fixture serializes");
    std::fs::write(dir.path().join("vpsdb.json"), body).expect("Failed to write snapshot");
}

/// Wait until the cache holds an in-memory entry
///
/// Polls every 10ms until an entry appears or `timeout` elapses.
///
/// # Returns
///
/// * `true` - Entry appeared within timeout
/// * `false` - Timeout occurred
#[allow(dead_code)]
pub async fn wait_for_entry(cache: &GamesCache, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if cache.cached_entry().await.is_some() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
