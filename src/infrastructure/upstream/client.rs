//! HTTP client for the upstream game database.
//!
//! One GET per call against the configured URL. A non-success status, a body
//! that is not JSON, or JSON that is not an array all fail the fetch; the
//! caller decides what a failed cycle means.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::domain::errors::UpstreamError;
use crate::domain::models::{Dataset, UpstreamConfig};
use crate::domain::ports::GamesSource;

/// HTTP client for the upstream game database
///
/// Features:
/// - Connection pooling and reuse (via reqwest::Client)
/// - Bounded request timeout so a hung upstream cannot stall a refresh forever
/// - Single attempt per call, no retries
pub struct HttpGamesSource {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    /// Full URL of the JSON database
    url: String,
}

impl HttpGamesSource {
    /// Create a client for `url` with the default timeout
    pub fn new(url: impl Into<String>) -> Result<Self, UpstreamError> {
        Self::with_config(&UpstreamConfig {
            url: url.into(),
            ..Default::default()
        })
    }

    /// Create a client from upstream configuration
    pub fn with_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http_client = ReqwestClient::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(2)
            .build()?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
        })
    }

    /// URL this client fetches from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make the request, check the status and the top-level shape
    async fn send_request(&self) -> Result<Dataset, UpstreamError> {
        let response = self.http_client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        match body {
            Value::Array(records) => Ok(records),
            other => {
                warn!(kind = json_kind(&other), "Upstream fetch did not return an array");
                Err(UpstreamError::NotASequence)
            }
        }
    }
}

#[async_trait]
impl GamesSource for HttpGamesSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Dataset, UpstreamError> {
        info!("Fetching data from upstream");

        match self.send_request().await {
            Ok(records) => {
                info!(count = records.len(), "Successfully fetched games from upstream");
                Ok(records)
            }
            Err(err) => {
                error!(error = %err, "Upstream fetch failed");
                Err(err)
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!({"games": []})), "object");
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&json!(null)), "null");
    }

    #[test]
    fn test_client_keeps_url() {
        let source = HttpGamesSource::new("http://localhost:9999/vpsdb.json").expect("client builds");
        assert_eq!(source.url(), "http://localhost:9999/vpsdb.json");
    }
}
