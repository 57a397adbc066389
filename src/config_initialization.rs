//! Configuration initialization and hierarchy management

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::adapters::toml_config::{TomlConfigAdapter, DEFAULTS};
use crate::cli::Cli;
use crate::ports::ConfigPort;

/// Prefix of the environment variables that override configuration keys
pub const ENV_PREFIX: &str = "LOTC_";

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(
    config: &TomlConfigAdapter,
    cli: &Cli,
) -> Result<()> {
    // Defaults are already held by the adapter
    match config_file_path(cli.config.as_deref())? {
        Some(path) => {
            config
                .load_config(&path)
                .await
                .with_context(|| format!("Failed to load configuration from {}", path))?;
            info!("Loaded configuration from {}", path);
        }
        None => debug!("No configuration file found, using defaults"),
    }

    let env_overrides = apply_environment_overrides(config, std::env::vars()).await?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    let cli_overrides = apply_cli_overrides(config, &cli.set).await?;
    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }

    config
        .validate_config()
        .await
        .context("Invalid configuration")?;
    Ok(())
}

/// The file to load: the explicit one, which must exist, or the first
/// default location present on disk
pub fn config_file_path(explicit: Option<&str>) -> Result<Option<String>> {
    if let Some(path) = explicit {
        if !Path::new(path).is_file() {
            return Err(anyhow!("Configuration file {} does not exist", path));
        }
        return Ok(Some(path.to_string()));
    }

    Ok(TomlConfigAdapter::default_config_paths()
        .into_iter()
        .find(|path| path.is_file())
        .map(|path| path.to_string_lossy().to_string()))
}

/// Apply `LOTC_<KEY>` variables for every known key
pub async fn apply_environment_overrides<I>(config: &dyn ConfigPort, vars: I) -> Result<usize>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut overrides = 0;
    for (name, value) in vars {
        let Some(key) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let key = key.to_ascii_lowercase();
        if !DEFAULTS.iter().any(|(known, _)| *known == key) {
            continue;
        }
        debug!("Environment override: {} = {}", name, value);
        config.set_config(&key, &value).await?;
        overrides += 1;
    }
    Ok(overrides)
}

/// Apply `--set key=value` arguments
pub async fn apply_cli_overrides(config: &dyn ConfigPort, assignments: &[String]) -> Result<usize> {
    for assignment in assignments {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", assignment))?;
        debug!("CLI override: {} = {}", key, value);
        config.set_config(key.trim(), value.trim()).await?;
    }
    Ok(assignments.len())
}
