//! Error types
//!
//! `FsError` is the closed taxonomy returned by the mutation layer. `ApiError` covers the
//! ambient layers around the engine (configuration, logging, snapshots, CLI).

use thiserror::Error;

/// Discriminant of an [`FsError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsErrorKind {
    InvalidPath,
    NotFound,
    Collision,
    Protected,
}

/// Engine failure returned by every mutation operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// A supplied ancestor-id path did not resolve to a container node.
    #[error("Invalid path")]
    InvalidPath,

    /// The target id is not among the resolved parent's children.
    #[error("Item not found")]
    NotFound,

    /// A same-name, same-kind sibling already exists.
    #[error("Name collision: '{name}' already exists")]
    Collision { name: String },

    /// The protection policy blocked the action.
    #[error("PROTECTED: {message}")]
    Protected { message: String },
}

impl FsError {
    pub fn kind(&self) -> FsErrorKind {
        match self {
            FsError::InvalidPath => FsErrorKind::InvalidPath,
            FsError::NotFound => FsErrorKind::NotFound,
            FsError::Collision { .. } => FsErrorKind::Collision,
            FsError::Protected { .. } => FsErrorKind::Protected,
        }
    }

    /// The policy message for `Protected` failures.
    pub fn protection_message(&self) -> Option<&str> {
        match self {
            FsError::Protected { message } => Some(message),
            _ => None,
        }
    }
}

/// Errors raised outside the engine core
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// An engine operation was refused for a reason other than an `FsError`
    /// (path creation rejections, failed paste batches).
    #[error("{0}")]
    InvalidOperation(String),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
