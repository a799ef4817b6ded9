//! MergeService: orchestrates sources, applies merge policy, deserializes to StrataConfig.

use crate::config::merge::builder_with_defaults;
use crate::config::sources::{environment, global_file};
use crate::config::StrataConfig;
use config::{ConfigError, File};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(global: Option<&Path>, explicit: Option<&Path>) -> Result<StrataConfig, ConfigError> {
        let mut builder = builder_with_defaults()?;
        if let Some(global) = global {
            builder = global_file::add_to_builder(builder, global)?;
        }
        if let Some(explicit) = explicit {
            builder = builder.add_source(File::from(explicit.to_path_buf()).required(true));
        }
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<StrataConfig, ConfigError> {
        Self::load(None, Some(path))
    }
}
