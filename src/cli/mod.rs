//! CLI type definitions
//!
//! Flags double as the plain environment variables the service has always
//! honoured (`VPS_URL`, `CACHE_DIR`, `PORT`).

use clap::Parser;
use std::path::PathBuf;

use crate::infrastructure::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "vps-data")]
#[command(about = "VPS Data - resilient cache in front of the VPS game database", long_about = None)]
#[command(version)]
pub struct Cli {
    /// YAML config file (defaults to ./vps-data.yaml when present)
    #[arg(short, long, env = "VPS_DATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Upstream game database URL
    #[arg(long, env = "VPS_URL")]
    pub upstream_url: Option<String>,

    /// Directory holding the disk snapshot
    #[arg(long, env = "CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Command-line values as config overrides.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            upstream_url: self.upstream_url.clone(),
            cache_dir: self.cache_dir.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}
