//! Identity and time sources for new nodes
//!
//! Fresh ids are blake3 digests over a per-process salt and a counter, so an id is never
//! handed out twice. The logical clock is wall-clock milliseconds forced strictly monotonic.

use crate::types::NodeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Number of digest bytes kept in an id (hex-encoded to twice as many chars)
const ID_BYTES: usize = 6;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);
static LAST_TICK: AtomicU64 = AtomicU64::new(0);
static SALT: OnceLock<[u8; 32]> = OnceLock::new();

fn salt() -> &'static [u8; 32] {
    SALT.get_or_init(|| {
        let mut hasher = blake3::Hasher::new();
        let started = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default();
        hasher.update(&started.to_le_bytes());
        hasher.update(&std::process::id().to_le_bytes());
        *hasher.finalize().as_bytes()
    })
}

/// Allocate a new, never-before-issued node id.
pub fn fresh_id() -> NodeId {
    let sequence = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt());
    hasher.update(&sequence.to_le_bytes());
    let digest = hasher.finalize();
    NodeId::new(hex::encode(&digest.as_bytes()[..ID_BYTES]))
}

/// Current logical timestamp in milliseconds; strictly greater than any previous reading.
pub fn now() -> u64 {
    let wall = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let previous = LAST_TICK
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(wall.max(last + 1))
        })
        .unwrap_or(wall);
    wall.max(previous + 1)
}
