//! Snapshot files on disk

use crate::error::ApiError;
use crate::store::{decode, encode};
use crate::tree::node::Node;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where trees are loaded from and saved to
pub trait SnapshotStore {
    fn load(&self) -> Result<Arc<Node>, ApiError>;
    fn save(&self, root: &Node) -> Result<(), ApiError>;
    fn exists(&self) -> bool;
}

/// JSON snapshot in a single file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Arc<Node>, ApiError> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            ApiError::Snapshot(format!(
                "Failed to read snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;
        decode(&json)
    }

    fn save(&self, root: &Node) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::Snapshot(format!(
                    "Failed to create snapshot directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = encode(root)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}
