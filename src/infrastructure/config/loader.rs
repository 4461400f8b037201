use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "vps-data.yaml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "VPS_DATA_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Upstream URL is required (upstream.url, VPS_DATA_UPSTREAM__URL, VPS_URL or --upstream-url)")]
    MissingUpstreamUrl,

    #[error("Invalid upstream URL '{0}': {1}")]
    InvalidUpstreamUrl(String, String),

    #[error("Cache directory cannot be empty")]
    EmptyCacheDir,

    #[error("Invalid ttl_secs: {0}. Must be positive")]
    InvalidTtl(u64),

    #[error("Invalid timeout_secs: {0}. Must be positive")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Values supplied on the command line, highest precedence.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Upstream database URL
    pub upstream_url: Option<String>,
    /// Snapshot directory
    pub cache_dir: Option<PathBuf>,
    /// Listen port
    pub port: Option<u16>,
    /// Log level
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Nested map holding only the values that were set.
    fn to_value(&self) -> Value {
        let mut root = Map::new();
        let mut section = |name: &str, key: &str, value: Value| {
            if let Some(section) = root
                .entry(name)
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
            {
                section.insert(key.to_string(), value);
            }
        };

        if let Some(url) = &self.upstream_url {
            section("upstream", "url", Value::from(url.clone()));
        }
        if let Some(dir) = &self.cache_dir {
            section("cache", "dir", Value::from(dir.to_string_lossy().into_owned()));
        }
        if let Some(port) = self.port {
            section("server", "port", Value::from(port));
        }
        if let Some(level) = &self.log_level {
            section("logging", "level", Value::from(level.clone()));
        }

        Value::Object(root)
    }
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. YAML config file (`path`, or `vps-data.yaml` when absent; optional)
    /// 3. Environment variables (VPS_DATA_* prefix, `__` for nesting)
    /// 4. Command-line overrides
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
        let file = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(&file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides.to_value()))
            .extract()
            .context(format!("Failed to load configuration (file: {})", file.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, without env or CLI layers
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let url = config.upstream.url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingUpstreamUrl);
        }
        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::InvalidUpstreamUrl(
                    url.to_string(),
                    format!("unsupported scheme '{}'", parsed.scheme()),
                ));
            }
            Err(e) => {
                return Err(ConfigError::InvalidUpstreamUrl(url.to_string(), e.to_string()));
            }
        }

        if config.upstream.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.upstream.timeout_secs));
        }

        if config.cache.dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyCacheDir);
        }

        if config.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl(config.cache.ttl_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
