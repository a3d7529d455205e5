//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use apmatch_core::ApMatchConfig;
use tracing::debug;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("apmatch")
        .join("config.json")
}

/// Configuration file selected by `--config`, or the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration for a pipeline run.
///
/// An explicit path must exist. The default location is optional.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<ApMatchConfig> {
    if let Some(path) = explicit {
        return Ok(ApMatchConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using configuration from {}", path.display());
        Ok(ApMatchConfig::from_file(&path)?)
    } else {
        Ok(ApMatchConfig::default())
    }
}
