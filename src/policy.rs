//! Protection Policy
//!
//! Nodes may carry a [`Protection`] rule set keyed by action kind. Rules stay in force while
//! the caller's authorization level is below the rule's release level; permanently protected
//! nodes block every action.

use crate::tree::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Release level meaning "never released".
pub const ALWAYS_BLOCKED: i64 = -1;

/// Message surfaced for permanently protected nodes.
pub const PERMANENT_LOCK_MESSAGE: &str = "System integrity protection: node is permanently locked";

/// Structural action a protection rule can gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Delete,
    Cut,
    Rename,
    Add,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Delete => "delete",
            Action::Cut => "cut",
            Action::Rename => "rename",
            Action::Add => "add",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protection rules attached to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protection {
    /// Block message per action kind
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<Action, String>,
    /// Authorization level at which the rules lift; `None` or [`ALWAYS_BLOCKED`] never lifts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_level: Option<i64>,
    /// Blocks every action regardless of level
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub permanently_protected: bool,
}

impl Protection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A rule set that blocks everything, forever.
    pub fn permanent() -> Self {
        Self {
            permanently_protected: true,
            ..Self::default()
        }
    }

    pub fn block(mut self, action: Action, message: impl Into<String>) -> Self {
        self.rules.insert(action, message.into());
        self
    }

    pub fn release_at(mut self, level: i64) -> Self {
        self.release_level = Some(level);
        self
    }

    /// Decide whether `action` is blocked at `auth_level`, returning the block reason.
    pub fn evaluate(&self, action: Action, auth_level: i64) -> Option<String> {
        if self.permanently_protected {
            return Some(PERMANENT_LOCK_MESSAGE.to_string());
        }
        let message = self.rules.get(&action)?;
        match self.release_level {
            None | Some(ALWAYS_BLOCKED) => Some(message.clone()),
            Some(release) if auth_level < release => Some(message.clone()),
            Some(_) => None,
        }
    }
}

/// Evaluate the node's protection for `action` at `auth_level`.
///
/// Returns the human-readable block reason, or `None` when the action is permitted.
pub fn evaluate_protection(node: &Node, action: Action, auth_level: i64) -> Option<String> {
    node.protection
        .as_ref()
        .and_then(|protection| protection.evaluate(action, auth_level))
}

/// Whether `action` stays blocked no matter what level the caller holds.
///
/// Operations that take no authorization level (add, path creation) only honour these
/// unconditional locks.
pub fn locked_unconditionally(node: &Node, action: Action) -> Option<String> {
    evaluate_protection(node, action, i64::MAX)
}
