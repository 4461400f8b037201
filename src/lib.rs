//! VPS Data - resilient read path for the Virtual Pinball Spreadsheet database
//!
//! Fronts a slow, occasionally unreliable upstream JSON feed with a tiered
//! cache: fresh memory, a single shared upstream refresh, and an on-disk
//! snapshot, in that order.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): dataset model, error taxonomy, ports
//! - **Service Layer** (`services`): the tiered cache and query filters
//! - **Adapters** (`adapters`): HTTP API and disk snapshot store
//! - **Infrastructure Layer** (`infrastructure`): upstream client, config, logging
//! - **Application Layer** (`application`): process wiring
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vps_data::{GamesCache, HttpGamesSource, SnapshotStore, DEFAULT_TTL};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = HttpGamesSource::new("https://example.com/vpsdb.json")?;
//!     let cache = GamesCache::new(Arc::new(source), SnapshotStore::new("/cache"), DEFAULT_TTL);
//!     cache.initialize().await;
//!     let games = cache.get_or_refresh().await?;
//!     println!("{} games", games.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::snapshot::{SnapshotError, SnapshotStore};
pub use domain::errors::{CacheError, UpstreamError};
pub use domain::models::{CacheEntry, Config, Dataset};
pub use domain::ports::GamesSource;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::upstream::HttpGamesSource;
pub use services::{GamesCache, QueryService, DEFAULT_TTL};
