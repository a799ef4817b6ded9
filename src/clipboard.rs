//! Clipboard
//!
//! Cut and yank capture node snapshots; paste replays them into a destination directory as a
//! batch built from the mutation layer. A batch stops at its first failing item and keeps
//! everything pasted before it.

use crate::error::FsError;
use crate::policy::Action;
use crate::tree::mutation::{add_with_rename, delete, insert_preserving_ids};
use crate::tree::node::Node;
use crate::tree::query::{find_by_id, find_path_by_id, resolve_by_id_path};
use crate::types::{IdPath, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// What a paste does with the captured nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardAction {
    /// Move: remove from the source, insert at the destination
    Cut,
    /// Copy: insert a fresh-id duplicate at the destination
    Yank,
}

impl fmt::Display for ClipboardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardAction::Cut => f.write_str("cut"),
            ClipboardAction::Yank => f.write_str("yank"),
        }
    }
}

/// One captured node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub node: Arc<Node>,
    /// Where the node actually lives, when it differs from the clipboard origin
    pub source_parent: Option<IdPath>,
}

/// Snapshot of captured nodes plus the action and the directory they were taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub entries: Vec<ClipboardEntry>,
    pub action: ClipboardAction,
    pub origin: IdPath,
}

impl ClipboardItem {
    /// Capture the children `ids` of the directory at `origin`.
    ///
    /// Fails with `InvalidPath` when `origin` does not resolve and `NotFound` when an id is not
    /// one of its children.
    pub fn capture(
        root: &Node,
        origin: IdPath,
        ids: &[NodeId],
        action: ClipboardAction,
    ) -> Result<Self, FsError> {
        let parent = resolve_by_id_path(root, &origin).ok_or(FsError::InvalidPath)?;
        let entries = ids
            .iter()
            .map(|id| {
                parent.child(id).map(|node| ClipboardEntry {
                    node: Arc::clone(node),
                    source_parent: None,
                })
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(FsError::NotFound)?;
        Ok(Self {
            entries,
            action,
            origin,
        })
    }

    /// Capture nodes anywhere in the tree by id, recording each one's actual parent.
    ///
    /// Used when nodes are grabbed from search results rather than a single listing.
    pub fn capture_by_id(
        root: &Node,
        origin: IdPath,
        ids: &[NodeId],
        action: ClipboardAction,
    ) -> Result<Self, FsError> {
        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let node = find_by_id(root, id).ok_or(FsError::NotFound)?;
            let mut path = find_path_by_id(root, id).ok_or(FsError::NotFound)?;
            path.pop();
            if path.is_empty() {
                // The root has no parent to move it out of.
                return Err(FsError::InvalidPath);
            }
            entries.push(ClipboardEntry {
                node: Arc::new(node.clone()),
                source_parent: Some(path),
            });
        }
        Ok(Self {
            entries,
            action,
            origin,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.node.name.as_str()).collect()
    }

    fn source_of<'a>(&'a self, entry: &'a ClipboardEntry) -> &'a [NodeId] {
        entry.source_parent.as_deref().unwrap_or(&self.origin)
    }
}

/// The item a paste batch stopped at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteFailure {
    pub index: usize,
    pub name: String,
    pub error: FsError,
}

impl fmt::Display for PasteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Paste failed for \"{}\": {}", self.name, self.error)
    }
}

/// Result of a paste batch
#[derive(Debug, Clone)]
pub struct PasteReport {
    /// Tree after every item that succeeded
    pub root: Arc<Node>,
    /// Names the pasted items ended up under, in batch order
    pub pasted: Vec<String>,
    pub failure: Option<PasteFailure>,
}

impl PasteReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Paste every clipboard entry into the directory at `dest`.
///
/// Cut entries are first removed from their source under the `cut` protection key; a source
/// that no longer holds the node is treated as already moved. Moves keep node ids, copies get
/// fresh ones, and name clashes at the destination resolve to `base_N.ext`. An entry whose
/// insert fails after its removal leaves the tree as it was before that entry.
pub fn paste(
    root: &Arc<Node>,
    clipboard: &ClipboardItem,
    dest: &[NodeId],
    auth_level: i64,
) -> PasteReport {
    let mut current = Arc::clone(root);
    let mut pasted = Vec::with_capacity(clipboard.len());

    for (index, entry) in clipboard.entries.iter().enumerate() {
        match paste_entry(&current, clipboard, entry, dest, auth_level) {
            Ok((next, name)) => {
                current = next;
                pasted.push(name);
            }
            Err(error) => {
                warn!(
                    index,
                    name = %entry.node.name,
                    %error,
                    "paste stopped at failing item"
                );
                return PasteReport {
                    root: current,
                    pasted,
                    failure: Some(PasteFailure {
                        index,
                        name: entry.node.name.clone(),
                        error,
                    }),
                };
            }
        }
    }

    info!(
        action = %clipboard.action,
        count = pasted.len(),
        "paste complete"
    );
    PasteReport {
        root: current,
        pasted,
        failure: None,
    }
}

fn paste_entry(
    root: &Arc<Node>,
    clipboard: &ClipboardItem,
    entry: &ClipboardEntry,
    dest: &[NodeId],
    auth_level: i64,
) -> Result<(Arc<Node>, String), FsError> {
    let node = entry.node.as_ref().clone();
    match clipboard.action {
        ClipboardAction::Cut => {
            let source = clipboard.source_of(entry);
            let removed = match delete(root, source, &node.id, Action::Cut, auth_level, false) {
                Ok(next) => next,
                Err(FsError::NotFound) => Arc::clone(root),
                Err(err) => return Err(err),
            };
            insert_preserving_ids(&removed, dest, node)
        }
        ClipboardAction::Yank => add_with_rename(root, dest, node),
    }
}
