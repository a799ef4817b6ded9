//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::paths::xdg_root;
use super::StrataConfig;
use crate::error::ApiError;
use config::ConfigError;
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the global config file (`~/.config/strata/config.toml` on Linux).
    pub fn global_config_path() -> Option<PathBuf> {
        xdg_root::global_config_path()
    }

    /// Load configuration from the global file, an optional explicit file, and environment.
    pub fn load(explicit: Option<&Path>) -> Result<StrataConfig, ConfigError> {
        MergeService::load(Self::global_config_path().as_deref(), explicit)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<StrataConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> StrataConfig {
        StrataConfig::default()
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(config: &StrataConfig) -> Result<String, ApiError> {
        toml::to_string_pretty(config)
            .map_err(|e| ApiError::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
