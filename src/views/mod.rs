//! Directory Views
//!
//! Projects a directory's children into what a listing shows: hidden entries dropped,
//! smart-case name filter applied, then sorted. Views never modify the tree.

pub mod sort;

pub use sort::{sort_label, sort_nodes, SortBy, SortDirection};

use crate::config::ViewConfig;
use crate::tree::node::Node;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Listing options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Include entries whose names start with `.`
    pub show_hidden: bool,
    /// Smart-case substring filter; empty matches everything
    pub filter_text: String,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
}

impl ViewOptions {
    pub fn with_filter(mut self, filter_text: impl Into<String>) -> Self {
        self.filter_text = filter_text.into();
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy, sort_direction: SortDirection) -> Self {
        self.sort_by = sort_by;
        self.sort_direction = sort_direction;
        self
    }

    pub fn show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }
}

impl From<&ViewConfig> for ViewOptions {
    fn from(config: &ViewConfig) -> Self {
        Self {
            show_hidden: config.show_hidden,
            filter_text: String::new(),
            sort_by: SortBy::parse(&config.sort_by),
            sort_direction: SortDirection::parse(&config.sort_direction),
        }
    }
}

/// Smart-case substring match.
///
/// A filter containing any uppercase character matches case-sensitively; an all-lowercase
/// filter matches case-insensitively.
pub fn filter_matches(name: &str, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    if filter.chars().any(char::is_uppercase) {
        name.contains(filter)
    } else {
        name.to_lowercase().contains(filter)
    }
}

/// Names starting with `.` are hidden.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// The children of `dir` that a listing with `options` shows, in display order.
///
/// Files have no children and always project to an empty listing.
pub fn visible_children(dir: &Node, options: &ViewOptions) -> Vec<Arc<Node>> {
    let visible: Vec<Arc<Node>> = dir
        .children()
        .iter()
        .filter(|child| options.show_hidden || !is_hidden(&child.name))
        .filter(|child| filter_matches(&child.name, &options.filter_text))
        .cloned()
        .collect();
    sort_nodes(&visible, options.sort_by, options.sort_direction)
}
