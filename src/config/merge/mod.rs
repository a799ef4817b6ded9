//! Config composition

pub mod service;

use crate::config::StrataConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the built-in defaults, the lowest-precedence layer.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&StrataConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
