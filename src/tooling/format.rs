//! Text rendering for CLI output.

use crate::search::RankedEntry;
use crate::store::ValidationReport;
use crate::tree::node::{Node, NodeKind};
use crate::tree::query::DirectoryEntry;
use crate::views::{visible_children, ViewOptions};
use chrono::{TimeZone, Utc};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::sync::Arc;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn format_timestamp(millis: u64) -> String {
    if millis == 0 {
        return "-".to_string();
    }
    i64::try_from(millis)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn format_size(node: &Node) -> String {
    match node.kind() {
        NodeKind::File => format!("{} B", node.size()),
        _ => format!("{} items", node.size()),
    }
}

fn protection_marker(node: &Node) -> &'static str {
    match &node.protection {
        Some(p) if p.permanently_protected => "locked",
        Some(p) if !p.rules.is_empty() => "guarded",
        _ => "",
    }
}

/// Directory listing as a table.
pub fn format_listing_text(display_path: &str, label: &str, nodes: &[Arc<Node>]) -> String {
    let mut out = format!(
        "{}  ({})\n\n",
        format_section_heading(display_path),
        label
    );
    if nodes.is_empty() {
        out.push_str("  (empty)\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Type", "Size", "Modified", "Protection"]);
    for node in nodes {
        let name = match node.kind() {
            NodeKind::File => node.name.clone(),
            _ => format!("{}/", node.name),
        };
        table.add_row(vec![
            name,
            node.kind().to_string(),
            format_size(node),
            format_timestamp(node.modified_at),
            protection_marker(node).to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Directory listing as JSON rows.
pub fn format_listing_json(nodes: &[Arc<Node>]) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = nodes
        .iter()
        .map(|n| {
            serde_json::json!({
                "id": n.id,
                "name": n.name,
                "type": n.kind(),
                "size": n.size(),
                "modifiedAt": n.modified_at,
                "protected": n.protection.is_some(),
            })
        })
        .collect();
    serde_json::Value::Array(rows)
}

/// Indented tree drawing below `node`.
pub fn format_tree_text(node: &Node, options: &ViewOptions) -> String {
    fn walk(node: &Node, prefix: &str, options: &ViewOptions, out: &mut String) {
        let children = visible_children(node, options);
        let count = children.len();
        for (i, child) in children.iter().enumerate() {
            let last = i + 1 == count;
            let branch = if last { "└── " } else { "├── " };
            out.push_str(prefix);
            out.push_str(branch);
            match child.kind() {
                NodeKind::Directory => out.push_str(&format!("{}/", child.name.blue().bold())),
                NodeKind::Archive => out.push_str(&format!("{}", child.name.yellow())),
                NodeKind::File => out.push_str(&child.name),
            }
            out.push('\n');
            if child.is_container() {
                let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
                walk(child, &next, options, out);
            }
        }
    }

    let mut out = format!("{}\n", node.name.blue().bold());
    walk(node, "", options, &mut out);
    out
}

/// All directories, one per line.
pub fn format_directories(entries: &[DirectoryEntry]) -> String {
    entries
        .iter()
        .map(|e| e.display_path.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Search results as a table.
pub fn format_search_results(query: &str, results: &[RankedEntry]) -> String {
    if results.is_empty() {
        return format!("No matches for '{}'", query);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Score", "Path", "Type"]);
    for r in results {
        table.add_row(vec![
            r.score.to_string(),
            r.entry.display_path.clone(),
            r.entry.kind.to_string(),
        ]);
    }
    table.to_string()
}

/// Validation summary.
pub fn format_validation_text(report: &ValidationReport) -> String {
    if report.errors.is_empty() && report.warnings.is_empty() {
        return format!(
            "Validation passed:\n  Nodes: {}\n  Depth: {}\n  All checks passed",
            report.node_count, report.max_depth
        );
    }
    let mut s = format!(
        "Validation completed with issues:\n  Nodes: {}\n  Depth: {}",
        report.node_count, report.max_depth
    );
    if !report.errors.is_empty() {
        s.push_str(&format!("\n\n{} ({}):", "Errors".red(), report.errors.len()));
        for e in &report.errors {
            s.push_str(&format!("\n  - {}", e));
        }
    }
    if !report.warnings.is_empty() {
        s.push_str(&format!("\n\n{} ({}):", "Warnings".yellow(), report.warnings.len()));
        for w in &report.warnings {
            s.push_str(&format!("\n  - {}", w));
        }
    }
    s
}
