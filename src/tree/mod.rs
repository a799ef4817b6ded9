//! Virtual filesystem tree
//!
//! The node model, read-only queries, and copy-on-write mutations over an `Arc<Node>` root.

pub mod hasher;
pub mod mutation;
pub mod node;
pub mod query;

pub use mutation::{
    add, add_with_rename, create_by_path_string, delete, ensure_child, ensure_path,
    insert_preserving_ids, rename, stamp_timestamps, write_content, PathCreation,
};
pub use node::{canonical_cmp, Node, NodeBody, NodeKind};
pub use query::{
    find_by_id, find_by_name, find_parent, find_path_by_id, list_all_directories,
    list_recursive_descendants, resolve_by_id_path, to_display_path, DescendantEntry,
    DirectoryEntry,
};
