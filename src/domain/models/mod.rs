pub mod config;
pub mod dataset;

pub use config::{CacheConfig, Config, LogFormat, LoggingConfig, RotationPolicy, ServerConfig, UpstreamConfig};
pub use dataset::{CacheEntry, Dataset};
