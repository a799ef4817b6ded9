use std::sync::Arc;

use strata::error::{FsError, FsErrorKind};
use strata::policy::Action;
use strata::tree::{
    add, create_by_path_string, delete, rename, resolve_by_id_path, Node, NodeKind, PathCreation,
};
use strata::types::id_path;

use super::support::{child_names, guest_tree, path_of};

#[test]
fn second_add_of_same_name_and_kind_collides() {
    let root = guest_tree();
    let guest = path_of(&root, "guest");

    let once = add(&root, &guest, Node::file("report.md", "v1")).unwrap();
    let before = child_names(&once, &guest).len();
    let err = add(&once, &guest, Node::file("report.md", "v2")).unwrap_err();

    assert_eq!(err.kind(), FsErrorKind::Collision);
    assert_eq!(err, FsError::Collision { name: "report.md".to_string() });
    assert_eq!(child_names(&once, &guest).len(), before);

    // Same name, different kind is fine.
    let both = add(&once, &guest, Node::directory("report.md", vec![])).unwrap();
    assert_eq!(child_names(&both, &guest).len(), before + 1);
}

#[test]
fn mutation_leaves_old_root_untouched_and_shares_siblings() {
    let root = guest_tree();
    let protocols = path_of(&root, "protocols");
    let datastore = path_of(&root, "datastore");
    let old_protocols = resolve_by_id_path(&root, &protocols).unwrap() as *const Node;

    let next = add(&root, &protocols, Node::file("uplink_v1.conf", "")).unwrap();

    let new_protocols = resolve_by_id_path(&next, &protocols).unwrap() as *const Node;
    assert_ne!(old_protocols, new_protocols);
    assert!(resolve_by_id_path(&root, &protocols).unwrap().children().is_empty());
    assert_eq!(
        resolve_by_id_path(&root, &datastore),
        resolve_by_id_path(&next, &datastore)
    );
    assert!(!Arc::ptr_eq(&root, &next));
}

#[test]
fn adds_and_renames_keep_canonical_order() {
    let top = id_path(&["root"]);
    let mut root = Arc::new(Node::root());
    for template in [
        Node::file("data.txt", ""),
        Node::archive("data.zip", vec![]),
        Node::directory("data", vec![]),
        Node::file("Data.md", ""),
        Node::directory("archive", vec![]),
        Node::archive("data", vec![]),
    ] {
        root = add(&root, &top, template).unwrap();
    }
    let expected = vec!["archive", "data", "data", "data.zip", "Data.md", "data.txt"];
    assert_eq!(child_names(&root, &top), expected);

    let zip = root
        .child_named("data.zip", NodeKind::Archive)
        .unwrap()
        .id
        .clone();
    let root = rename(&root, &top, &zip, "a.zip", 0, false).unwrap();
    assert_eq!(
        child_names(&root, &top),
        vec!["archive", "data", "a.zip", "data", "Data.md", "data.txt"]
    );
}

#[test]
fn rename_to_own_name_is_a_value_level_no_op() {
    let root = guest_tree();
    let guest = path_of(&root, "guest");
    let notes_id = path_of(&root, "notes.txt").pop().unwrap();

    let next = rename(&root, &guest, &notes_id, "notes.txt", 0, false).unwrap();

    let strip = |node: &Node| {
        let mut n = node.clone();
        n.modified_at = 0;
        n
    };
    let before = resolve_by_id_path(&root, &guest).unwrap();
    let after = resolve_by_id_path(&next, &guest).unwrap();
    assert_eq!(child_names(&root, &guest), child_names(&next, &guest));
    for (old, new) in before.children().iter().zip(after.children()) {
        assert_eq!(strip(old.as_ref()), strip(new.as_ref()));
    }
}

#[test]
fn delete_of_missing_child_and_bad_parent() {
    let root = guest_tree();
    let guest = path_of(&root, "guest");
    let notes_id = path_of(&root, "notes.txt").pop().unwrap();

    assert_eq!(
        delete(&root, &id_path(&["root", "nope"]), &notes_id, Action::Delete, 0, false),
        Err(FsError::InvalidPath)
    );
    let next = delete(&root, &guest, &notes_id, Action::Delete, 0, false).unwrap();
    assert_eq!(
        delete(&next, &guest, &notes_id, Action::Delete, 0, false),
        Err(FsError::NotFound)
    );
}

#[test]
fn create_by_path_builds_intermediate_directories() {
    let root = guest_tree();
    let guest = path_of(&root, "guest");

    let created = create_by_path_string(&root, &guest, "projects/alpha/readme.md");
    assert_eq!(created.created_name(), Some("readme.md"));
    let root = created.into_root();
    let projects = path_of(&root, "alpha");
    assert_eq!(child_names(&root, &projects), vec!["readme.md"]);

    match create_by_path_string(&root, &guest, "projects/alpha/readme.md") {
        PathCreation::Collision { existing, .. } => assert_eq!(existing.name, "readme.md"),
        other => panic!("expected collision, got {:?}", other),
    }

    let blocked = create_by_path_string(&root, &guest, "notes.txt/inner.txt");
    assert_eq!(
        blocked.error(),
        Some("Cannot create directory inside file: notes.txt")
    );
}
