//! Global config file source

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

/// Add the global config file to builder; a missing file is skipped.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no global config file");
        return Ok(builder);
    }
    Ok(builder.add_source(File::from(path.to_path_buf()).required(false)))
}
