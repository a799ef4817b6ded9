use std::sync::Arc;

use strata::policy::{Action, Protection};
use strata::tree::{find_by_name, find_path_by_id, Node};
use strata::types::IdPath;

/// /home/guest with a datastore, protocols, a protected key, and some loose files.
pub fn guest_tree() -> Arc<Node> {
    Arc::new(Node::root_with(vec![Node::directory(
        "home",
        vec![Node::directory(
            "guest",
            vec![
                Node::directory(
                    "datastore",
                    vec![Node::archive("legacy_data.tar", vec![])],
                ),
                Node::directory("protocols", vec![]),
                Node::file("access_key.pem", "-----BEGIN KEY-----").with_protection(
                    Protection::new()
                        .block(Action::Delete, "Critical asset. Deletion prohibited.")
                        .block(Action::Cut, "Critical asset. Cannot be moved.")
                        .release_at(9),
                ),
                Node::file("notes.txt", "todo"),
                Node::file(".profile", "export PS1"),
            ],
        )],
    )]))
}

/// Id path of the first node called `name`.
pub fn path_of(root: &Node, name: &str) -> IdPath {
    let node = find_by_name(root, name).unwrap_or_else(|| panic!("no node named {}", name));
    find_path_by_id(root, &node.id).unwrap()
}

/// Id path of the parent of the first node called `name`.
pub fn parent_of(root: &Node, name: &str) -> IdPath {
    let mut path = path_of(root, name);
    path.pop();
    path
}

pub fn child_names(root: &Node, dir: &IdPath) -> Vec<String> {
    strata::tree::resolve_by_id_path(root, dir)
        .unwrap()
        .children()
        .iter()
        .map(|c| c.name.clone())
        .collect()
}
