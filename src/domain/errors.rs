//! Domain errors for the VPS data service.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the upstream game feed.
///
/// Never escapes the refresh step: a failed fetch means "no fresh data this
/// cycle" and the cache falls back to older tiers.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure
    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream fetch failed with status: {0}")]
    Status(StatusCode),

    /// Body was not valid JSON
    #[error("Upstream returned malformed JSON: {0}")]
    Decode(String),

    /// Body was JSON but not an array of records
    #[error("Upstream fetch returned non-array data")]
    NotASequence,
}

/// Caller-visible failures of the tiered cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No tier (memory, refresh, disk) could produce data
    #[error("Service Unavailable: could not fetch or load cache data")]
    Unavailable,

    /// Unexpected failure inside the read path
    #[error("Internal cache failure: {0}")]
    Internal(String),
}

impl CacheError {
    /// Whether this is the "temporarily unavailable" condition (HTTP 503).
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_classification() {
        assert!(CacheError::Unavailable.is_unavailable());
        assert!(!CacheError::Internal("boom".to_string()).is_unavailable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UpstreamError::Status(StatusCode::BAD_GATEWAY).to_string(),
            "Upstream fetch failed with status: 502 Bad Gateway"
        );
        assert_eq!(
            CacheError::Unavailable.to_string(),
            "Service Unavailable: could not fetch or load cache data"
        );
    }
}
