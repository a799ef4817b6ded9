//! Tree Query Layer
//!
//! Read-only traversal over an immutable tree snapshot. Nothing here allocates tree nodes
//! and nothing here fails loudly: unresolvable input yields `None` or an empty listing.

use crate::tree::node::{Node, NodeKind};
use crate::types::{IdPath, NodeId};
use serde::Serialize;

/// A directory reachable from the root, in both addressing forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub id_path: IdPath,
    pub display_path: String,
}

/// A node below a start directory, addressed relative to that directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescendantEntry {
    /// Ids below the start node (the start node itself excluded)
    pub id_path: IdPath,
    /// Slash-joined names below the start node, without a leading slash
    pub display_path: String,
    pub kind: NodeKind,
    pub id: NodeId,
}

/// Resolve a node by its path of ancestor ids.
///
/// The first id must be the root's; every following id must name a child of the previous
/// node. Empty or mismatched paths resolve to `None`.
pub fn resolve_by_id_path<'a>(root: &'a Node, ids: &[NodeId]) -> Option<&'a Node> {
    let (first, rest) = ids.split_first()?;
    if *first != root.id {
        return None;
    }
    rest.iter()
        .try_fold(root, |current, id| current.child(id).map(|child| child.as_ref()))
}

/// The parent of the node at `id_path`; the root has none.
pub fn find_parent<'a>(root: &'a Node, id_path: &[NodeId]) -> Option<&'a Node> {
    if id_path.len() <= 1 {
        return None;
    }
    resolve_by_id_path(root, &id_path[..id_path.len() - 1])
}

/// Depth-first, pre-order search for the first node called `name`.
///
/// Names are not unique across directories, so this is a convenience for fixtures and
/// seeding rather than an addressing mechanism.
pub fn find_by_name<'a>(root: &'a Node, name: &str) -> Option<&'a Node> {
    if root.name == name {
        return Some(root);
    }
    root.children()
        .iter()
        .find_map(|child| find_by_name(child, name))
}

/// Depth-first search by identity.
pub fn find_by_id<'a>(root: &'a Node, id: &NodeId) -> Option<&'a Node> {
    if &root.id == id {
        return Some(root);
    }
    root.children()
        .iter()
        .find_map(|child| find_by_id(child, id))
}

/// Full id path (root first) of the node with `id`.
pub fn find_path_by_id(root: &Node, id: &NodeId) -> Option<IdPath> {
    fn walk(node: &Node, id: &NodeId, trail: &mut IdPath) -> bool {
        trail.push(node.id.clone());
        if &node.id == id {
            return true;
        }
        for child in node.children() {
            if walk(child, id, trail) {
                return true;
            }
        }
        trail.pop();
        false
    }

    let mut trail = Vec::new();
    walk(root, id, &mut trail).then_some(trail)
}

/// Slash-joined names along `id_path`.
///
/// The root and malformed paths render as `/`. A path that stops resolving part-way renders
/// the prefix that did resolve.
pub fn to_display_path(root: &Node, id_path: &[NodeId]) -> String {
    let Some((first, rest)) = id_path.split_first() else {
        return "/".to_string();
    };
    if *first != root.id {
        return "/".to_string();
    }

    let mut display = String::new();
    let mut current = root;
    for id in rest {
        let Some(child) = current.child(id) else {
            break;
        };
        display.push('/');
        display.push_str(&child.name);
        current = child;
    }

    if display.is_empty() {
        "/".to_string()
    } else {
        display
    }
}

/// Every directory in the tree, root included, in pre-order.
pub fn list_all_directories(root: &Node) -> Vec<DirectoryEntry> {
    fn walk(node: &Node, id_path: IdPath, display_path: String, out: &mut Vec<DirectoryEntry>) {
        for child in node.children() {
            if child.kind() != NodeKind::Directory {
                continue;
            }
            let mut child_path = id_path.clone();
            child_path.push(child.id.clone());
            let child_display = if display_path == "/" {
                format!("/{}", child.name)
            } else {
                format!("{}/{}", display_path, child.name)
            };
            out.push(DirectoryEntry {
                id_path: child_path.clone(),
                display_path: child_display.clone(),
            });
            walk(child, child_path, child_display, out);
        }
    }

    let mut out = vec![DirectoryEntry {
        id_path: vec![root.id.clone()],
        display_path: "/".to_string(),
    }];
    walk(root, vec![root.id.clone()], "/".to_string(), &mut out);
    out
}

/// Flatten the subtree under `start_id_path`, addressing each node relative to the start.
///
/// Archives are descended like directories. Unresolvable starts yield an empty list.
pub fn list_recursive_descendants(root: &Node, start_id_path: &[NodeId]) -> Vec<DescendantEntry> {
    fn walk(node: &Node, prefix_ids: &[NodeId], prefix: &str, out: &mut Vec<DescendantEntry>) {
        for child in node.children() {
            let mut id_path = prefix_ids.to_vec();
            id_path.push(child.id.clone());
            let display_path = if prefix.is_empty() {
                child.name.clone()
            } else {
                format!("{}/{}", prefix, child.name)
            };
            out.push(DescendantEntry {
                id_path: id_path.clone(),
                display_path: display_path.clone(),
                kind: child.kind(),
                id: child.id.clone(),
            });
            if child.is_container() {
                walk(child, &id_path, &display_path, out);
            }
        }
    }

    let Some(start) = resolve_by_id_path(root, start_id_path) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    walk(start, &[], "", &mut out);
    out
}
