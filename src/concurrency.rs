//! Shared tree ownership
//!
//! The engine itself is a set of pure functions over immutable roots. [`SharedTree`] is the
//! single state owner that serializes writers: each write runs against the latest root while
//! holding the write lock and swaps in the returned root only on success. Readers take a
//! snapshot (a cheap `Arc` clone) and never block on each other.

use crate::tree::node::Node;
use parking_lot::RwLock;
use std::sync::Arc;

struct State {
    root: Arc<Node>,
    generation: u64,
}

/// Current tree reference shared between threads
#[derive(Clone)]
pub struct SharedTree {
    state: Arc<RwLock<State>>,
}

impl SharedTree {
    pub fn new(root: Arc<Node>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                root,
                generation: 0,
            })),
        }
    }

    /// The latest root. Later writes never change a snapshot already taken.
    pub fn snapshot(&self) -> Arc<Node> {
        Arc::clone(&self.state.read().root)
    }

    /// Number of successful writes so far
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Run `op` against the latest root and install its result.
    ///
    /// Writers are serialized; a failing `op` leaves the current root in place.
    pub fn apply<F, E>(&self, op: F) -> Result<Arc<Node>, E>
    where
        F: FnOnce(&Arc<Node>) -> Result<Arc<Node>, E>,
    {
        let mut state = self.state.write();
        let next = op(&state.root)?;
        state.root = Arc::clone(&next);
        state.generation += 1;
        Ok(next)
    }

    /// Install `next` only if the current root is still `expected`.
    ///
    /// For callers that compute a new root outside the lock: returns `false` when another
    /// writer got there first, in which case the caller recomputes against a fresh snapshot.
    pub fn compare_and_swap(&self, expected: &Arc<Node>, next: Arc<Node>) -> bool {
        let mut state = self.state.write();
        if !Arc::ptr_eq(&state.root, expected) {
            return false;
        }
        state.root = next;
        state.generation += 1;
        true
    }
}

impl std::fmt::Debug for SharedTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SharedTree")
            .field("root", &state.root.id)
            .field("generation", &state.generation)
            .finish()
    }
}
