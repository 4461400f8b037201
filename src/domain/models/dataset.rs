//! Game dataset and the in-memory cache entry that holds it.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// The full ordered collection of game records.
///
/// Records are opaque JSON payloads. Only the top-level "is this an array"
/// shape is ever checked by the cache layer.
pub type Dataset = Vec<Value>;

/// A dataset together with the instant it was adopted into memory.
///
/// Data and timestamp live in one value so a cache slot is either fully
/// populated or empty.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    data: Arc<Dataset>,
    timestamp: Instant,
}

impl CacheEntry {
    /// Create an entry stamped with `timestamp`.
    pub fn new(data: Arc<Dataset>, timestamp: Instant) -> Self {
        Self { data, timestamp }
    }

    /// Shared handle to the cached dataset.
    pub fn data(&self) -> &Arc<Dataset> {
        &self.data
    }

    /// Instant the entry was adopted.
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Age of the entry relative to `now`. Never negative.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.timestamp)
    }

    /// Whether the entry is still inside its TTL window (strict less-than).
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}
