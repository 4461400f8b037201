//! Tiered cache for the game dataset.
//!
//! Every read walks the tiers in priority order:
//!
//! 1. a fresh in-memory snapshot,
//! 2. the single shared upstream refresh (started here if none is running),
//! 3. the on-disk snapshot, consulted only when availability is unconfirmed
//!    or the memory entry has expired,
//! 4. the expired in-memory snapshot, if one exists,
//! 5. `CacheError::Unavailable`.
//!
//! Concurrent readers that miss memory all await the same refresh, so the
//! upstream is hit at most once per refresh cycle.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::adapters::snapshot::SnapshotStore;
use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::models::{CacheEntry, Dataset};
use crate::domain::ports::GamesSource;

/// How long a snapshot is served from memory before a refresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(8 * 60 * 60);

/// Result of one refresh cycle as seen by every waiter.
///
/// `Ok(None)` means upstream failed; `Err` carries a refresh task panic.
type RefreshOutcome = Result<Option<Arc<Dataset>>, String>;

type RefreshHandle = Shared<BoxFuture<'static, RefreshOutcome>>;

/// State shared between the cache handle and its refresh tasks.
struct CacheState {
    source: Arc<dyn GamesSource>,
    store: SnapshotStore,
    ttl: Duration,
    memory: RwLock<Option<CacheEntry>>,
    /// In-flight refresh. Never locked across an await.
    refresh: Mutex<Option<RefreshHandle>>,
}

impl CacheState {
    async fn refresh(&self) -> Option<Arc<Dataset>> {
        match self.source.fetch().await {
            Ok(records) => {
                let data = Arc::new(records);
                *self.memory.write().await = Some(CacheEntry::new(Arc::clone(&data), Instant::now()));

                if self.store.write(&data).await.is_err() {
                    warn!("Serving refreshed data without a disk snapshot");
                }

                debug!(count = data.len(), "Successfully refreshed and updated caches");
                Some(data)
            }
            Err(err) => {
                error!(error = %err, "Upstream data fetch failed. Stale cache will be used if available");
                None
            }
        }
    }

    fn clear_refresh(&self) {
        self.refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Clears the refresh slot when the refresh task ends, including by panic.
struct RefreshSlotGuard(Arc<CacheState>);

impl Drop for RefreshSlotGuard {
    fn drop(&mut self) {
        self.0.clear_refresh();
    }
}

/// Tiered memory / upstream / disk cache of the game dataset.
///
/// Cheap to clone; all clones share one cache.
#[derive(Clone)]
pub struct GamesCache {
    state: Arc<CacheState>,
}

impl GamesCache {
    /// Create an empty cache over `source` and `store`.
    pub fn new(source: Arc<dyn GamesSource>, store: SnapshotStore, ttl: Duration) -> Self {
        Self {
            state: Arc::new(CacheState {
                source,
                store,
                ttl,
                memory: RwLock::new(None),
                refresh: Mutex::new(None),
            }),
        }
    }

    /// Configured TTL.
    pub fn ttl(&self) -> Duration {
        self.state.ttl
    }

    /// Snapshot store backing the disk tier.
    pub fn store(&self) -> &SnapshotStore {
        &self.state.store
    }

    /// Current in-memory entry, if any.
    pub async fn cached_entry(&self) -> Option<CacheEntry> {
        self.state.memory.read().await.clone()
    }

    /// Whether an upstream refresh is running right now.
    pub fn is_refreshing(&self) -> bool {
        self.state
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Prepare the cache at process start.
    ///
    /// Seeds memory from the disk snapshot when one exists, treating it as
    /// fresh for a full TTL. Otherwise kicks off one background refresh and
    /// returns without waiting for it. Failures are logged, never returned.
    pub async fn initialize(&self) {
        if let Err(err) = self.state.store.ensure_dir().await {
            error!(error = %err, "Failed to initialize cache directory or load initial cache");
            return;
        }

        if let Some(records) = self.state.store.read().await {
            info!(count = records.len(), "Seeded in-memory cache from disk snapshot");
            *self.state.memory.write().await = Some(CacheEntry::new(Arc::new(records), Instant::now()));
            return;
        }

        info!("No valid disk cache found. Triggering initial background fetch");
        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(err) = cache.get_or_refresh().await {
                error!(error = %err, "Background initial fetch failed");
            }
        });
    }

    /// Return the dataset from the best available tier.
    pub async fn get_or_refresh(&self) -> CacheResult<Arc<Dataset>> {
        let now = Instant::now();
        let ttl = self.state.ttl;

        if let Some(entry) = self.state.memory.read().await.as_ref() {
            if entry.is_fresh(now, ttl) {
                debug!("Serving data from fresh in-memory cache");
                return Ok(Arc::clone(entry.data()));
            }
        }

        match self.refresh_handle().await {
            Ok(Some(data)) => {
                debug!("Serving data from ongoing/completed upstream refresh");
                return Ok(data);
            }
            Ok(None) => {}
            Err(reason) => {
                error!(error = %reason, "Refresh task failed unexpectedly");
                return Err(CacheError::Internal(reason));
            }
        }

        let stale = self.state.memory.read().await.clone();
        let memory_expired = stale.as_ref().is_some_and(|entry| !entry.is_fresh(now, ttl));

        if !self.state.store.is_available() || memory_expired {
            if let Some(records) = self.state.store.read().await {
                info!("Serving data from disk cache (upstream refresh failed)");
                let data = Arc::new(records);
                *self.state.memory.write().await = Some(CacheEntry::new(Arc::clone(&data), now));
                return Ok(data);
            }
        }

        if let Some(entry) = stale {
            warn!(
                age_secs = entry.age(now).as_secs(),
                "Serving stale in-memory data (upstream and disk unavailable)"
            );
            return Ok(Arc::clone(entry.data()));
        }

        error!("No valid cache data available (in-memory, disk, or upstream fetch failed)");
        Err(CacheError::Unavailable)
    }

    /// Join the in-flight refresh, or start one if none is running.
    ///
    /// Check and create happen under one lock with no await in between, so
    /// two readers can never both start a refresh.
    fn refresh_handle(&self) -> RefreshHandle {
        let mut slot = self
            .state
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = slot.as_ref() {
            return handle.clone();
        }

        info!("In-memory cache stale or missing. Initiating background data refresh");

        // Spawned so a dropped reader never cancels a refresh others await.
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let _guard = RefreshSlotGuard(Arc::clone(&state));
            state.refresh().await
        });

        let handle = async move { task.await.map_err(|e| e.to_string()) }
            .boxed()
            .shared();
        *slot = Some(handle.clone());
        handle
    }
}
