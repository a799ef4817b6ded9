//! Strata: Simulated Filesystem Tree Engine
//!
//! An in-memory hierarchical filesystem of files, directories, and archives. Trees are
//! immutable: every mutation returns a new root that shares untouched subtrees with the old
//! one. Nodes may carry protection rules gated by an authorization level, and directory
//! listings are projected through hidden-file, filter, and sort options.

pub mod clipboard;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod policy;
pub mod search;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod views;

pub use error::{ApiError, FsError, FsErrorKind};
pub use tree::{Node, NodeKind};
pub use types::{IdPath, NodeId};
