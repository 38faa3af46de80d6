//! Configuration file discovery for the CLI.

use crate::cli::PresetArg;
use crate::error::{CliError, Result};
use spamgate_gatekeeper::SpamGateConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file location (`~/.spamgate/config.toml`).
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::InvalidInput("Could not find home directory".into()))?;
    Ok(home.join(".spamgate").join("config.toml"))
}

/// Load the active configuration.
///
/// An explicit path must exist. Without one the default location is used
/// when present, otherwise built-in defaults. A non-blank `api_key`
/// replaces the configured key.
pub fn load_config(path: Option<&Path>, api_key: Option<&str>) -> Result<SpamGateConfig> {
    let mut config = match path {
        Some(path) => SpamGateConfig::from_file(path)?,
        None => match default_config_path().ok().filter(|p| p.exists()) {
            Some(path) => {
                debug!(path = %path.display(), "Using default configuration file");
                SpamGateConfig::from_file(path)?
            }
            None => SpamGateConfig::default(),
        },
    };

    if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
        config.api_key = key.to_string();
    }
    Ok(config)
}

/// Configuration for a preset.
pub fn preset_config(preset: PresetArg) -> SpamGateConfig {
    match preset {
        PresetArg::Default => SpamGateConfig::default(),
        PresetArg::ReviewOnly => SpamGateConfig::review_only(),
    }
}

/// Write `config` as TOML, creating parent directories.
///
/// The API key is never written.
pub fn save_config(config: &SpamGateConfig, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_toml()?)?;
    Ok(())
}
