use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::{CliError, Result};
use config::{Config as ConfigBuilder, Environment, File};

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("repotrack").join("config.toml"))
}

pub fn load() -> Result<Config> {
    load_from(default_config_path().as_deref())
}

/// Layers the optional TOML file under `REPOTRACK_*` environment variables,
/// e.g. `REPOTRACK_TRACKER__MAX_CONCURRENT=8`.
pub fn load_from(path: Option<&Path>) -> Result<Config> {
    let mut builder = ConfigBuilder::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    }

    let config: Config = builder
        .add_source(
            Environment::with_prefix("REPOTRACK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(CliError::Config)?
        .try_deserialize()
        .map_err(CliError::Config)?;

    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.tracker.max_concurrent == 0 {
        return Err(CliError::InvalidConfiguration(
            "tracker.max_concurrent must be at least 1".to_string(),
        ));
    }

    if config.github.api_url.trim().is_empty() {
        return Err(CliError::InvalidConfiguration(
            "github.api_url must not be empty".to_string(),
        ));
    }

    Ok(())
}
