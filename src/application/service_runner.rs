//! Process bootstrap for the VPS data service.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::adapters::http::{GamesHttpConfig, GamesHttpServer};
use crate::adapters::snapshot::SnapshotStore;
use crate::domain::models::Config;
use crate::infrastructure::upstream::HttpGamesSource;
use crate::services::{GamesCache, QueryService};

/// Build the tiered cache described by `config`. Touches neither network nor disk.
pub fn build_cache(config: &Config) -> Result<GamesCache> {
    let source = HttpGamesSource::with_config(&config.upstream)
        .context("Failed to build upstream HTTP client")?;

    Ok(GamesCache::new(
        Arc::new(source),
        SnapshotStore::new(&config.cache.dir),
        config.cache.ttl(),
    ))
}

/// Warm the cache and serve HTTP until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let cache = build_cache(&config)?;

    info!(
        upstream = %config.upstream.url,
        cache_dir = %config.cache.dir.display(),
        ttl_secs = config.cache.ttl_secs,
        "Initializing game cache"
    );
    cache.initialize().await;

    let server = GamesHttpServer::new(QueryService::new(cache), GamesHttpConfig::from(&config.server));
    server
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {e}"))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
