//! Tree Mutation Layer
//!
//! Every operation takes the current root and returns a new one; the input tree is never
//! modified. Changes are applied by path-copying: the nodes from the root down to the
//! mutated container are re-allocated in the new tree, everything else is shared.

use crate::error::FsError;
use crate::policy::{evaluate_protection, locked_unconditionally, Action};
use crate::tree::hasher;
use crate::tree::node::{Node, NodeBody, NodeKind};
use crate::tree::query::{find_by_id, resolve_by_id_path};
use crate::types::NodeId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of [`create_by_path_string`]
#[derive(Debug, Clone)]
pub enum PathCreation {
    /// Every segment exists now; `created_name` is the leaf that was created, if any.
    Created {
        root: Arc<Node>,
        created_name: Option<String>,
    },
    /// The final segment already exists with the same kind; nothing was changed.
    Collision { root: Arc<Node>, existing: Arc<Node> },
    /// The path could not be materialized; nothing was changed.
    Rejected { root: Arc<Node>, reason: String },
}

impl PathCreation {
    pub fn root(&self) -> &Arc<Node> {
        match self {
            PathCreation::Created { root, .. }
            | PathCreation::Collision { root, .. }
            | PathCreation::Rejected { root, .. } => root,
        }
    }

    pub fn into_root(self) -> Arc<Node> {
        match self {
            PathCreation::Created { root, .. }
            | PathCreation::Collision { root, .. }
            | PathCreation::Rejected { root, .. } => root,
        }
    }

    pub fn created_name(&self) -> Option<&str> {
        match self {
            PathCreation::Created { created_name, .. } => created_name.as_deref(),
            _ => None,
        }
    }

    pub fn collision_node(&self) -> Option<&Arc<Node>> {
        match self {
            PathCreation::Collision { existing, .. } => Some(existing),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PathCreation::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// How ids of an inserted subtree are assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdPolicy {
    Regenerate,
    Preserve,
}

/// What happens when an inserted node collides with a sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnConflict {
    Fail,
    Rename,
}

/// Insert `template` under the container at `parent_path`.
///
/// Every id in the inserted subtree is regenerated. Fails with `Collision` when a child with
/// the same name and kind exists, and with `Protected` when the parent is locked against
/// `add` unconditionally.
pub fn add(root: &Arc<Node>, parent_path: &[NodeId], template: Node) -> Result<Arc<Node>, FsError> {
    insert(root, parent_path, template, IdPolicy::Regenerate, OnConflict::Fail)
        .map(|(root, _)| root)
}

/// Like [`add`], but a colliding name is resolved to `base_N.ext` instead of failing.
///
/// Returns the new root and the name the node was inserted under.
pub fn add_with_rename(
    root: &Arc<Node>,
    parent_path: &[NodeId],
    template: Node,
) -> Result<(Arc<Node>, String), FsError> {
    insert(root, parent_path, template, IdPolicy::Regenerate, OnConflict::Rename)
}

/// Re-insert a node that was cut elsewhere, keeping its identity.
///
/// Ids are kept unless one of them is already present in the tree, in which case the subtree
/// is given fresh ids. Name collisions resolve like [`add_with_rename`].
pub fn insert_preserving_ids(
    root: &Arc<Node>,
    parent_path: &[NodeId],
    node: Node,
) -> Result<(Arc<Node>, String), FsError> {
    let policy = if subtree_ids_present(root, &node) {
        IdPolicy::Regenerate
    } else {
        IdPolicy::Preserve
    };
    insert(root, parent_path, node, policy, OnConflict::Rename)
}

fn insert(
    root: &Arc<Node>,
    parent_path: &[NodeId],
    template: Node,
    ids: IdPolicy,
    on_conflict: OnConflict,
) -> Result<(Arc<Node>, String), FsError> {
    let parent = resolve_container(root, parent_path)?;
    if let Some(message) = locked_unconditionally(parent, Action::Add) {
        warn!(parent = %parent.id, name = %template.name, "add blocked by protection");
        return Err(FsError::Protected { message });
    }

    let kind = template.kind();
    let name = match (parent.child_named(&template.name, kind), on_conflict) {
        (None, _) => template.name.clone(),
        (Some(_), OnConflict::Fail) => {
            return Err(FsError::Collision {
                name: template.name,
            })
        }
        (Some(_), OnConflict::Rename) => free_name(parent, &template.name, kind),
    };

    let stamp = hasher::now();
    let mut node = match ids {
        IdPolicy::Regenerate => regenerate(template, stamp),
        IdPolicy::Preserve => template,
    };
    if node.created_at == 0 {
        node.created_at = stamp;
    }
    node.modified_at = stamp;
    node.name = name.clone();
    let inserted_id = node.id.clone();

    let new_root = with_container(root, parent_path, |container| {
        if let Some(children) = container.children_mut() {
            children.push(Arc::new(node));
        }
        container.sort_children();
    })?;
    debug!(id = %inserted_id, name = %name, kind = %kind, "node added");
    Ok((new_root, name))
}

/// Remove the child `node_id` from the container at `parent_path`.
///
/// `action` is the protection key consulted (`Delete` for plain deletes, `Cut` for the
/// removal half of a move). `force` skips the protection check.
pub fn delete(
    root: &Arc<Node>,
    parent_path: &[NodeId],
    node_id: &NodeId,
    action: Action,
    auth_level: i64,
    force: bool,
) -> Result<Arc<Node>, FsError> {
    let parent = resolve_container(root, parent_path)?;
    let target = parent.child(node_id).ok_or(FsError::NotFound)?;
    if !force {
        if let Some(message) = evaluate_protection(target, action, auth_level) {
            warn!(id = %node_id, name = %target.name, %action, "delete blocked by protection");
            return Err(FsError::Protected { message });
        }
    }

    let new_root = with_container(root, parent_path, |container| {
        if let Some(children) = container.children_mut() {
            children.retain(|child| &child.id != node_id);
        }
    })?;
    debug!(id = %node_id, %action, force, "node removed");
    Ok(new_root)
}

/// Rename the child `node_id` of the container at `parent_path`.
///
/// A sibling of the same kind already called `new_name` blocks the rename unless `force` is
/// set, in which case that sibling is removed first.
pub fn rename(
    root: &Arc<Node>,
    parent_path: &[NodeId],
    node_id: &NodeId,
    new_name: &str,
    auth_level: i64,
    force: bool,
) -> Result<Arc<Node>, FsError> {
    let parent = resolve_container(root, parent_path)?;
    let target = parent.child(node_id).ok_or(FsError::NotFound)?;
    if !force {
        if let Some(message) = evaluate_protection(target, Action::Rename, auth_level) {
            warn!(id = %node_id, name = %target.name, "rename blocked by protection");
            return Err(FsError::Protected { message });
        }
    }

    let kind = target.kind();
    let overwritten = parent
        .children()
        .iter()
        .find(|sibling| &sibling.id != node_id && sibling.name == new_name && sibling.kind() == kind)
        .map(|sibling| sibling.id.clone());
    if overwritten.is_some() && !force {
        return Err(FsError::Collision {
            name: new_name.to_string(),
        });
    }

    let stamp = hasher::now();
    let new_root = with_container(root, parent_path, |container| {
        if let Some(children) = container.children_mut() {
            if let Some(victim) = &overwritten {
                children.retain(|child| &child.id != victim);
            }
            if let Some(child) = children.iter_mut().find(|child| &child.id == node_id) {
                let child = Arc::make_mut(child);
                child.name = new_name.to_string();
                child.modified_at = stamp;
            }
        }
        container.sort_children();
    })?;
    debug!(id = %node_id, name = %new_name, overwrote = overwritten.is_some(), "node renamed");
    Ok(new_root)
}

/// Replace the content of the file `node_id`.
pub fn write_content(
    root: &Arc<Node>,
    parent_path: &[NodeId],
    node_id: &NodeId,
    content: impl Into<String>,
) -> Result<Arc<Node>, FsError> {
    let parent = resolve_container(root, parent_path)?;
    let target = parent.child(node_id).ok_or(FsError::NotFound)?;
    if target.kind() != NodeKind::File {
        return Err(FsError::InvalidPath);
    }

    let content = content.into();
    let stamp = hasher::now();
    with_container(root, parent_path, |container| {
        let Some(children) = container.children_mut() else {
            return;
        };
        if let Some(child) = children.iter_mut().find(|child| &child.id == node_id) {
            let child = Arc::make_mut(child);
            child.body = NodeBody::File {
                content: Some(content),
            };
            child.modified_at = stamp;
        }
    })
}

/// Materialize a slash-separated path below `base_path`.
///
/// Intermediate segments are directories and are reused when they exist. The final segment
/// is a directory when `path_str` ends with `/`, otherwise a file. A final segment that
/// already exists with the same kind is reported as a collision without changing the tree.
pub fn create_by_path_string(root: &Arc<Node>, base_path: &[NodeId], path_str: &str) -> PathCreation {
    let rejected = |reason: String| PathCreation::Rejected {
        root: Arc::clone(root),
        reason,
    };

    let segments: Vec<&str> = path_str
        .split('/')
        .filter(|segment| !segment.trim().is_empty())
        .collect();
    let dir_target = path_str.ends_with('/');

    let mut new_root = Arc::clone(root);
    let mut current_path = base_path.to_vec();

    for (index, segment) in segments.iter().enumerate() {
        let is_last = index + 1 == segments.len();
        let kind = if is_last && !dir_target {
            NodeKind::File
        } else {
            NodeKind::Directory
        };

        let Some(parent) = resolve_by_id_path(&new_root, &current_path).filter(|n| n.is_container())
        else {
            return rejected("Path resolution failed".to_string());
        };

        if let Some(existing) = parent.child_named(segment, kind) {
            if is_last {
                return PathCreation::Collision {
                    root: Arc::clone(root),
                    existing: Arc::clone(existing),
                };
            }
            current_path.push(existing.id.clone());
            continue;
        }
        if !is_last && parent.child_named(segment, NodeKind::File).is_some() {
            return rejected(format!("Cannot create directory inside file: {}", segment));
        }
        if let Some(message) = locked_unconditionally(parent, Action::Add) {
            return rejected(format!(
                "Cannot create in protected directory '{}': {}",
                parent.name, message
            ));
        }

        let stamp = hasher::now();
        let node = Node::empty(*segment, kind)
            .with_created_at(stamp)
            .with_modified_at(stamp);
        let node_id = node.id.clone();
        let Some(container) = container_mut(&mut new_root, &current_path) else {
            return rejected("Path resolution failed".to_string());
        };
        if let Some(children) = container.children_mut() {
            children.push(Arc::new(node));
        }
        container.sort_children();
        debug!(id = %node_id, name = %segment, %kind, "path segment created");

        if is_last {
            return PathCreation::Created {
                root: new_root,
                created_name: Some(segment.to_string()),
            };
        }
        current_path.push(node_id);
    }

    PathCreation::Created {
        root: new_root,
        created_name: None,
    }
}

/// Add `template` unless a same-name, same-kind child already exists.
///
/// Seeding routines call this so that running them twice is harmless.
pub fn ensure_child(
    root: &Arc<Node>,
    parent_path: &[NodeId],
    template: Node,
) -> Result<Arc<Node>, FsError> {
    let parent = resolve_container(root, parent_path)?;
    if parent.child_named(&template.name, template.kind()).is_some() {
        return Ok(Arc::clone(root));
    }
    add(root, parent_path, template)
}

/// Materialize `path_str`, treating an existing leaf as success.
pub fn ensure_path(root: &Arc<Node>, base_path: &[NodeId], path_str: &str) -> Result<Arc<Node>, String> {
    match create_by_path_string(root, base_path, path_str) {
        PathCreation::Created { root, .. } | PathCreation::Collision { root, .. } => Ok(root),
        PathCreation::Rejected { reason, .. } => Err(reason),
    }
}

/// Fill unset timestamps across a subtree.
///
/// Children are stamped progressively older (one second per sibling index) so freshly seeded
/// trees still sort meaningfully by modification time.
pub fn stamp_timestamps(node: &Node, base_time: u64) -> Node {
    let mut stamped = node.clone();
    if stamped.created_at == 0 {
        stamped.created_at = base_time;
    }
    if stamped.modified_at == 0 {
        stamped.modified_at = base_time;
    }
    if let Some(children) = stamped.children_mut() {
        for (index, child) in children.iter_mut().enumerate() {
            let child_time = base_time.saturating_sub(index as u64 * 1000);
            *child = Arc::new(stamp_timestamps(child, child_time));
        }
    }
    stamped
}

fn resolve_container<'a>(root: &'a Node, path: &[NodeId]) -> Result<&'a Node, FsError> {
    resolve_by_id_path(root, path)
        .filter(|node| node.is_container())
        .ok_or(FsError::InvalidPath)
}

/// Path-copy `root` down to the container at `path` and apply `edit` to it.
fn with_container<F>(root: &Arc<Node>, path: &[NodeId], edit: F) -> Result<Arc<Node>, FsError>
where
    F: FnOnce(&mut Node),
{
    let mut new_root = Arc::clone(root);
    let container = container_mut(&mut new_root, path).ok_or(FsError::InvalidPath)?;
    edit(container);
    Ok(new_root)
}

fn container_mut<'a>(root: &'a mut Arc<Node>, path: &[NodeId]) -> Option<&'a mut Node> {
    let (first, rest) = path.split_first()?;
    if *first != root.id {
        return None;
    }
    let mut current = Arc::make_mut(root);
    for id in rest {
        let child = current
            .children_mut()?
            .iter_mut()
            .find(|child| &child.id == id)?;
        current = Arc::make_mut(child);
    }
    current.is_container().then_some(current)
}

/// Give `template` and all of its descendants fresh ids, keeping children canonical.
fn regenerate(mut template: Node, stamp: u64) -> Node {
    template.id = hasher::fresh_id();
    if let Some(children) = template.children_mut() {
        let previous = std::mem::take(children);
        *children = previous
            .into_iter()
            .map(|child| {
                let mut fresh = regenerate(Arc::unwrap_or_clone(child), stamp);
                if fresh.created_at == 0 {
                    fresh.created_at = stamp;
                }
                if fresh.modified_at == 0 {
                    fresh.modified_at = stamp;
                }
                Arc::new(fresh)
            })
            .collect();
    }
    template.sort_children();
    template
}

fn subtree_ids_present(root: &Node, node: &Node) -> bool {
    find_by_id(root, &node.id).is_some()
        || node
            .children()
            .iter()
            .any(|child| subtree_ids_present(root, child))
}

fn free_name(parent: &Node, name: &str, kind: NodeKind) -> String {
    let (base, ext) = match (kind, name.rfind('.')) {
        (NodeKind::File, Some(dot)) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    let mut counter = 1u32;
    loop {
        let candidate = format!("{}_{}{}", base, counter, ext);
        if parent.child_named(&candidate, kind).is_none() {
            return candidate;
        }
        counter += 1;
    }
}
