//! Core types for the strata virtual filesystem engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved identifier of the tree root.
pub const ROOT_ID: &str = "root";

/// NodeId: opaque identity of a node, stable across renames and moves
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// The reserved root identifier.
    pub fn root() -> Self {
        NodeId(ROOT_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId(value)
    }
}

/// IdPath: ancestor ids from the root (inclusive) down to a node
pub type IdPath = Vec<NodeId>;

/// Build an id path from string slices; handy for fixtures and seeded layouts.
pub fn id_path(ids: &[&str]) -> IdPath {
    ids.iter().map(|id| NodeId::from(*id)).collect()
}
