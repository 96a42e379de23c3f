use std::fs;
use std::path::{Path, PathBuf};

use crate::io::atomic::atomic_write;
use crate::model::config::PlannerConfig;

/// Name of the config file inside the vault root
pub const CONFIG_FILE: &str = "dayplan.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse dayplan.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize dayplan.toml: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Load the planner config from `dir`. A missing file means all defaults;
/// out-of-range values are normalized.
pub fn load_config(dir: &Path) -> Result<PlannerConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(PlannerConfig::default());
    }
    let config_text = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: PlannerConfig = toml::from_str(&config_text)?;
    Ok(config.normalized())
}

/// Write `config` to `dir`, replacing any existing file.
pub fn save_config(dir: &Path, config: &PlannerConfig) -> Result<(), ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    let text = toml::to_string_pretty(config)?;
    atomic_write(&config_path, text.as_bytes()).map_err(|e| ConfigError::WriteError {
        path: config_path,
        source: e,
    })
}
