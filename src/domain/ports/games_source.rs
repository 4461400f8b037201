//! Upstream game feed port.
//!
//! Defines the trait the cache manager uses to pull a complete dataset
//! from the authoritative source.

use async_trait::async_trait;

use crate::domain::errors::UpstreamError;
use crate::domain::models::Dataset;

/// Authoritative source of the game dataset.
///
/// Implementations issue a single attempt per call. Retry policy belongs to
/// the caller.
#[async_trait]
pub trait GamesSource: Send + Sync {
    /// Fetch the full dataset.
    async fn fetch(&self) -> Result<Dataset, UpstreamError>;
}
