//! Fuzzy Search
//!
//! Case-insensitive scoring of slash-joined paths against a query, and ranking of the nodes
//! below a directory.

use crate::tree::node::Node;
use crate::tree::query::{list_recursive_descendants, DescendantEntry};
use crate::types::NodeId;
use serde::Serialize;

/// Score for a query equal to the whole path
pub const EXACT_SCORE: i64 = 300;
/// Base score for a contiguous substring match
pub const CONTIGUOUS_SCORE: i64 = 100;
/// Score returned when not every query character occurs in order
pub const NO_MATCH: i64 = -1;

const START_BONUS: i64 = 50;
const AFTER_SEPARATOR_BONUS: i64 = 30;
const SEQUENTIAL_CHAR_SCORE: i64 = 10;
const CONSECUTIVE_BONUS: i64 = 5;
const SEQUENTIAL_SEPARATOR_BONUS: i64 = 10;

/// Score `path` against `query`; higher is better.
///
/// An exact match scores 300. A contiguous match scores 100, plus 50 at the start of the path
/// or 30 right after a `/`. Otherwise each query character found in order scores 10, plus 5
/// when it directly follows the previous match and 10 when it follows a `/`. Returns -1 when
/// the query does not match and 0 for an empty query.
pub fn fuzzy_score(path: &str, query: &str) -> i64 {
    if query.is_empty() {
        return 0;
    }
    let path = path.to_lowercase();
    let query = query.to_lowercase();
    if path == query {
        return EXACT_SCORE;
    }

    if let Some(byte_idx) = path.find(&query) {
        let mut score = CONTIGUOUS_SCORE;
        if byte_idx == 0 {
            score += START_BONUS;
        } else if path[..byte_idx].ends_with('/') {
            score += AFTER_SEPARATOR_BONUS;
        }
        return score;
    }

    let path: Vec<char> = path.chars().collect();
    let query: Vec<char> = query.chars().collect();
    let mut score = 0;
    let mut matched = 0;
    // Starts at -1 so a match on the first character counts as consecutive.
    let mut last_match: isize = -1;
    for (i, c) in path.iter().enumerate() {
        if matched == query.len() {
            break;
        }
        if *c != query[matched] {
            continue;
        }
        score += SEQUENTIAL_CHAR_SCORE;
        if last_match == i as isize - 1 {
            score += CONSECUTIVE_BONUS;
        }
        if i > 0 && path[i - 1] == '/' {
            score += SEQUENTIAL_SEPARATOR_BONUS;
        }
        last_match = i as isize;
        matched += 1;
    }

    if matched < query.len() {
        NO_MATCH
    } else {
        score
    }
}

/// Whether every character of `query` occurs in `path`, in order, ignoring case.
pub fn fuzzy_matches(path: &str, query: &str) -> bool {
    fuzzy_score(path, query) >= 0
}

/// How a query matched, for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Contiguous,
    Fuzzy,
}

/// Character indices of `text` to highlight for `query`.
pub fn match_indices(text: &str, query: &str) -> (MatchKind, Vec<usize>) {
    if query.is_empty() {
        return (MatchKind::Contiguous, Vec::new());
    }
    let text = text.to_lowercase();
    let query = query.to_lowercase();

    if let Some(byte_idx) = text.find(&query) {
        let start = text[..byte_idx].chars().count();
        let len = query.chars().count();
        return (MatchKind::Contiguous, (start..start + len).collect());
    }

    let query: Vec<char> = query.chars().collect();
    let mut indices = Vec::new();
    for (i, c) in text.chars().enumerate() {
        if indices.len() == query.len() {
            break;
        }
        if c == query[indices.len()] {
            indices.push(i);
        }
    }
    (MatchKind::Fuzzy, indices)
}

/// A descendant with its match score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub entry: DescendantEntry,
    pub score: i64,
}

/// Every node below `start` whose relative display path matches `query`, best first.
///
/// Ties are broken by display path. An empty query matches everything with score 0.
pub fn rank_descendants(root: &Node, start: &[NodeId], query: &str) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = list_recursive_descendants(root, start)
        .into_iter()
        .filter_map(|entry| {
            let score = fuzzy_score(&entry.display_path, query);
            (score >= 0).then_some(RankedEntry { entry, score })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.entry.display_path.cmp(&b.entry.display_path))
    });
    ranked
}
