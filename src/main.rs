//! VPS Data service entry point.

use anyhow::Result;
use clap::Parser;

use vps_data::cli::Cli;
use vps_data::infrastructure::config::ConfigLoader;
use vps_data::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(cli.config.as_deref(), &cli.overrides())?;
    let _logger = LoggerImpl::init(&config.logging)?;

    vps_data::application::run(config).await
}
