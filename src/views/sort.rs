//! Sort Specification
//!
//! Five sort keys, each ascending or descending. Descending is always the exact reversal of
//! the ascending list.

use crate::tree::node::{canonical_cmp, Node};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Sort key for directory listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Directories, then archives, then files; by name within each class
    #[default]
    Natural,
    /// By name, ignoring kind; names starting with `_` go last
    Alphabetical,
    /// By modification time, then name
    Modified,
    /// By child count or content length; ties keep their relative order
    Size,
    /// By lowercased extension, then name
    Extension,
}

impl SortBy {
    pub const ALL: [SortBy; 5] = [
        SortBy::Natural,
        SortBy::Alphabetical,
        SortBy::Modified,
        SortBy::Size,
        SortBy::Extension,
    ];

    /// Parse a sort key; unknown keys fall back to [`SortBy::Natural`].
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "alphabetical" => SortBy::Alphabetical,
            "modified" => SortBy::Modified,
            "size" => SortBy::Size,
            "extension" => SortBy::Extension,
            _ => SortBy::Natural,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Natural => "natural",
            SortBy::Alphabetical => "alphabetical",
            SortBy::Modified => "modified",
            SortBy::Size => "size",
            SortBy::Extension => "extension",
        }
    }
}

impl FromStr for SortBy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortBy::parse(s))
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction; anything but `desc` is ascending.
    pub fn parse(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Sort a listing by `sort_by`, then reverse it for descending order.
pub fn sort_nodes(
    nodes: &[Arc<Node>],
    sort_by: SortBy,
    direction: SortDirection,
) -> Vec<Arc<Node>> {
    let mut sorted = nodes.to_vec();
    // `sort_by` is stable, which the size key relies on for ties.
    match sort_by {
        SortBy::Natural => sorted.sort_by(|a, b| canonical_cmp(a, b)),
        SortBy::Alphabetical => sorted.sort_by(|a, b| alphabetical_cmp(&a.name, &b.name)),
        SortBy::Modified => sorted.sort_by(|a, b| {
            a.modified_at
                .cmp(&b.modified_at)
                .then_with(|| a.name.cmp(&b.name))
        }),
        SortBy::Size => sorted.sort_by_key(|node| node.size()),
        SortBy::Extension => sorted.sort_by(|a, b| {
            extension_key(&a.name)
                .cmp(&extension_key(&b.name))
                .then_with(|| a.name.cmp(&b.name))
        }),
    }
    if direction == SortDirection::Desc {
        sorted.reverse();
    }
    sorted
}

/// Label shown in the status line, e.g. `A-Z ↓`.
pub fn sort_label(sort_by: SortBy, direction: SortDirection) -> String {
    let name = match sort_by {
        SortBy::Natural => "Natural",
        SortBy::Alphabetical => "A-Z",
        SortBy::Modified => "Modified",
        SortBy::Size => "Size",
        SortBy::Extension => "Extension",
    };
    format!("{} {}", name, direction.arrow())
}

fn alphabetical_cmp(a: &str, b: &str) -> Ordering {
    a.starts_with('_')
        .cmp(&b.starts_with('_'))
        .then_with(|| a.cmp(b))
}

/// Lowercased text after the last `.`, or the whole lowercased name without one.
fn extension_key(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}
