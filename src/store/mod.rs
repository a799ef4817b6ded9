//! Snapshot Store
//!
//! A snapshot is the root node serialized as JSON in the shape of [`Node`]. Decoding validates
//! the structure before handing the tree to the engine.

pub mod persistence;

pub use persistence::{FileSnapshotStore, SnapshotStore};

use crate::error::ApiError;
use crate::tree::node::{canonical_cmp, Node};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Result of structural validation over a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub node_count: usize,
    pub max_depth: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Check the invariants every tree must hold.
///
/// Errors: the root does not carry the reserved id or is not a directory, an id appears twice,
/// two siblings share name and kind. Warnings: siblings out of canonical order, empty names,
/// names containing `/`.
pub fn validate(root: &Node) -> ValidationReport {
    let mut report = ValidationReport::default();
    if !root.id.is_root() {
        report.add_error(format!("Root node has id '{}', expected 'root'", root.id));
    }
    if root.kind() != crate::tree::NodeKind::Directory {
        report.add_error(format!("Root node is a {}, expected a directory", root.kind()));
    }

    let mut seen = HashSet::new();
    walk(root, "", 0, &mut seen, &mut report);
    report
}

fn walk<'a>(
    node: &'a Node,
    parent_display: &str,
    depth: usize,
    seen: &mut HashSet<&'a str>,
    report: &mut ValidationReport,
) {
    report.node_count += 1;
    report.max_depth = report.max_depth.max(depth);
    let display = if depth == 0 {
        "/".to_string()
    } else if parent_display == "/" {
        format!("/{}", node.name)
    } else {
        format!("{}/{}", parent_display, node.name)
    };

    if !seen.insert(node.id.as_str()) {
        report.add_error(format!("Duplicate id '{}' at {}", node.id, display));
    }
    if depth > 0 && node.name.is_empty() {
        report.add_warning(format!("Node '{}' under {} has an empty name", node.id, parent_display));
    }
    if depth > 0 && node.name.contains('/') {
        report.add_warning(format!(
            "Node '{}' under {} has a name containing '/': '{}'",
            node.id, parent_display, node.name
        ));
    }

    let children = node.children();
    for pair in children.windows(2) {
        if canonical_cmp(&pair[0], &pair[1]) == Ordering::Greater {
            report.add_warning(format!(
                "Children of {} are not in canonical order ('{}' before '{}')",
                display, pair[0].name, pair[1].name
            ));
            break;
        }
    }
    let mut names = HashSet::new();
    for child in children {
        if !names.insert((child.name.as_str(), child.kind())) {
            report.add_error(format!(
                "Name collision in {}: {} '{}' appears twice",
                display,
                child.kind(),
                child.name
            ));
        }
    }

    for child in children {
        walk(child, &display, depth + 1, seen, report);
    }
}

/// Serialize a tree to pretty-printed JSON.
pub fn encode(root: &Node) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(root)?)
}

/// Parse a snapshot and report on it without rejecting anything.
///
/// The raw JSON is checked for payload fields that do not belong to the node's type (a file
/// with `children`, a directory or archive with `content`) before it is deserialized, since
/// deserializing would silently drop them.
pub fn inspect(json: &str) -> Result<(Node, ValidationReport), ApiError> {
    let value: Value = serde_json::from_str(json).map_err(malformed)?;
    let mut shape_errors = Vec::new();
    check_payload_fields(&value, "", 0, &mut shape_errors);

    let root: Node = serde_json::from_value(value).map_err(malformed)?;
    let mut report = validate(&root);
    shape_errors.append(&mut report.errors);
    report.errors = shape_errors;
    Ok((root, report))
}

fn malformed(err: serde_json::Error) -> ApiError {
    ApiError::Snapshot(format!("Malformed snapshot: {}", err))
}

fn check_payload_fields(value: &Value, parent_display: &str, depth: usize, errors: &mut Vec<String>) {
    let Some(object) = value.as_object() else {
        return;
    };
    let name = object.get("name").and_then(Value::as_str).unwrap_or_default();
    let display = if depth == 0 {
        "/".to_string()
    } else if parent_display == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent_display, name)
    };

    match object.get("type").and_then(Value::as_str) {
        Some("file") if object.contains_key("children") => {
            errors.push(format!("File {} carries children", display));
        }
        Some("dir") | Some("archive") if object.contains_key("content") => {
            errors.push(format!("Container {} carries content", display));
        }
        _ => {}
    }

    if let Some(children) = object.get("children").and_then(Value::as_array) {
        for child in children {
            check_payload_fields(child, &display, depth + 1, errors);
        }
    }
}

/// Parse and validate a JSON snapshot.
///
/// Children out of canonical order are re-sorted; structural errors reject the snapshot.
pub fn decode(json: &str) -> Result<Arc<Node>, ApiError> {
    let (mut root, report) = inspect(json)?;
    if !report.is_valid() {
        return Err(ApiError::Snapshot(report.errors.join("; ")));
    }
    if !report.warnings.is_empty() {
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }
        canonicalize(&mut root);
    }
    Ok(Arc::new(root))
}

fn canonicalize(node: &mut Node) {
    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            canonicalize(Arc::make_mut(child));
        }
    }
    node.sort_children();
}
