//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use geotool_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "geotool.toml";

/// Load layered configuration.
///
/// An explicit `--config` file must exist; the default one is optional.
pub fn load_config(config_file: Option<&Path>) -> Result<LayeredConfig> {
    let config = match config_file {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults()
            .load_from_optional_file(DEFAULT_CONFIG_FILE)
            .context("Failed to load configuration file")?,
    };

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(
    config_file: Option<&Path>,
    data_file: Option<PathBuf>,
) -> Result<LayeredConfig> {
    let mut config = load_config(config_file)?;
    config.update_from_cli(CliConfigOverrides {
        data_file,
        ..Default::default()
    });
    Ok(config)
}
