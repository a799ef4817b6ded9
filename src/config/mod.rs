//! Configuration
//!
//! Layered settings for the CLI and embedding applications, loaded through [`ConfigLoader`].
//! Precedence, lowest first: built-in defaults, the global `config.toml`, an explicit
//! `--config` file, then `STRATA_*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrataConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Defaults for directory listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Show dot-files
    #[serde(default)]
    pub show_hidden: bool,
    /// natural, alphabetical, modified, size, extension; anything else means natural
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// asc or desc
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,
}

fn default_sort_by() -> String {
    "natural".to_string()
}

fn default_sort_direction() -> String {
    "asc".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            sort_by: default_sort_by(),
            sort_direction: default_sort_direction(),
        }
    }
}

/// Authorization settings for protected operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Level compared against each rule's release level
    #[serde(default)]
    pub auth_level: i64,
}
