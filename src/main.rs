//! lotc - download, trim and merge videos
//!
//! # Usage
//!
//! ```bash
//! lotc download "https://www.youtube.com/watch?v=jSRHpA2giUk" 0:30-0:45 1:10-1:40.8
//! lotc trim talk.mp4 5:00-6:30 -o highlight.mp4
//! lotc merge intro.mp4 talk.mp4 outro.mp4
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{debug, info};

use lotc::adapters::TomlConfigAdapter;
use lotc::app::DefaultAppContainer;
use lotc::cli::{commands, Cli};
use lotc::config_initialization::initialize_configuration_hierarchy;
use lotc::ports::ConfigPort;
use lotc::utils::logging::{LogFormat, LogLevel, LoggingConfig, LoggingSystem};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: cli.log_level.parse::<LogLevel>().map_err(|e| anyhow!(e))?,
        format: cli.log_format.parse::<LogFormat>().map_err(|e| anyhow!(e))?,
    };
    LoggingSystem::new(logging)
        .initialize()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
    info!("Starting lotc {}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(TomlConfigAdapter::new());
    initialize_configuration_hierarchy(&config, &cli).await?;

    let container = DefaultAppContainer::from_config(config as Arc<dyn ConfigPort>).await?;
    let outcome = commands::execute(&container, cli.command).await?;
    debug!(?outcome, "Command finished");

    Ok(())
}
