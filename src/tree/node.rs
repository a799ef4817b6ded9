//! Filesystem node types and canonical child ordering

use crate::policy::Protection;
use crate::tree::hasher;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Node kind, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "dir")]
    Directory,
    #[serde(rename = "archive")]
    Archive,
    #[serde(rename = "file")]
    File,
}

impl NodeKind {
    /// Class rank used by canonical ordering: directories, then archives, then files.
    pub fn rank(self) -> u8 {
        match self {
            NodeKind::Directory => 0,
            NodeKind::Archive => 1,
            NodeKind::File => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Directory => "dir",
            NodeKind::Archive => "archive",
            NodeKind::File => "file",
        }
    }

    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::File)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeBody {
    #[serde(rename = "file")]
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    #[serde(rename = "dir")]
    Directory {
        #[serde(default)]
        children: Vec<Arc<Node>>,
    },
    #[serde(rename = "archive")]
    Archive {
        #[serde(default)]
        children: Vec<Arc<Node>>,
    },
}

/// A file, directory, or archive in the virtual tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Logical creation time; 0 when unset
    #[serde(default)]
    pub created_at: u64,
    /// Logical modification time; 0 when unset
    #[serde(default)]
    pub modified_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<Protection>,
    #[serde(flatten)]
    pub body: NodeBody,
}

impl Node {
    /// The tree root: an empty directory carrying the reserved root id.
    pub fn root() -> Self {
        Self::root_with(Vec::new())
    }

    pub fn root_with(children: Vec<Node>) -> Self {
        let mut root = Self::directory("/", children);
        root.id = NodeId::root();
        root
    }

    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_body(
            name,
            NodeBody::File {
                content: Some(content.into()),
            },
        )
    }

    /// A file with no content payload at all.
    pub fn empty_file(name: impl Into<String>) -> Self {
        Self::with_body(name, NodeBody::File { content: None })
    }

    pub fn directory(name: impl Into<String>, children: Vec<Node>) -> Self {
        let mut node = Self::with_body(
            name,
            NodeBody::Directory {
                children: children.into_iter().map(Arc::new).collect(),
            },
        );
        node.sort_children();
        node
    }

    pub fn archive(name: impl Into<String>, children: Vec<Node>) -> Self {
        let mut node = Self::with_body(
            name,
            NodeBody::Archive {
                children: children.into_iter().map(Arc::new).collect(),
            },
        );
        node.sort_children();
        node
    }

    /// An empty node of the given kind.
    pub fn empty(name: impl Into<String>, kind: NodeKind) -> Self {
        match kind {
            NodeKind::Directory => Self::directory(name, Vec::new()),
            NodeKind::Archive => Self::archive(name, Vec::new()),
            NodeKind::File => Self::file(name, ""),
        }
    }

    fn with_body(name: impl Into<String>, body: NodeBody) -> Self {
        Self {
            id: hasher::fresh_id(),
            name: name.into(),
            created_at: 0,
            modified_at: 0,
            protection: None,
            body,
        }
    }

    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_protection(mut self, protection: Protection) -> Self {
        self.protection = Some(protection);
        self
    }

    pub fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_modified_at(mut self, modified_at: u64) -> Self {
        self.modified_at = modified_at;
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File { .. } => NodeKind::File,
            NodeBody::Directory { .. } => NodeKind::Directory,
            NodeBody::Archive { .. } => NodeKind::Archive,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Children in canonical order; empty for files.
    pub fn children(&self) -> &[Arc<Node>] {
        match &self.body {
            NodeBody::Directory { children } | NodeBody::Archive { children } => children.as_slice(),
            NodeBody::File { .. } => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Arc<Node>>> {
        match &mut self.body {
            NodeBody::Directory { children } | NodeBody::Archive { children } => Some(children),
            NodeBody::File { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { content } => content.as_deref(),
            _ => None,
        }
    }

    /// Size proxy: child count for containers, content byte length for files.
    pub fn size(&self) -> usize {
        match &self.body {
            NodeBody::File { content } => content.as_ref().map_or(0, String::len),
            NodeBody::Directory { children } | NodeBody::Archive { children } => children.len(),
        }
    }

    pub fn child(&self, id: &NodeId) -> Option<&Arc<Node>> {
        self.children().iter().find(|child| &child.id == id)
    }

    /// The child sharing both `name` and `kind`, which is what collides.
    pub fn child_named(&self, name: &str, kind: NodeKind) -> Option<&Arc<Node>> {
        self.children()
            .iter()
            .find(|child| child.name == name && child.kind() == kind)
    }

    pub(crate) fn sort_children(&mut self) {
        if let Some(children) = self.children_mut() {
            children.sort_by(|a, b| canonical_cmp(a, b));
        }
    }
}

/// Canonical sibling order: class rank, then case-sensitive name.
pub fn canonical_cmp(a: &Node, b: &Node) -> Ordering {
    a.kind()
        .rank()
        .cmp(&b.kind().rank())
        .then_with(|| a.name.cmp(&b.name))
}
