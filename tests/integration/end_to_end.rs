use std::sync::Arc;

use strata::tree::{
    add, find_by_name, find_path_by_id, rename, resolve_by_id_path, Node, NodeKind,
};
use strata::types::{id_path, NodeId};

fn datastore_tree() -> Arc<Node> {
    Arc::new(Node::root_with(vec![Node::directory(
        "datastore",
        vec![
            Node::archive("legacy_data.tar", vec![]),
            Node::directory("protocols", vec![]).with_id("protocols"),
        ],
    )
    .with_id("datastore")]))
}

#[test]
fn uplink_config_added_found_and_renamed_past_archive() {
    let root = datastore_tree();
    let protocols = id_path(&["root", "datastore", "protocols"]);

    let root = add(&root, &protocols, Node::file("uplink_v1.conf", "band=ka")).unwrap();
    let uplink = find_by_name(&root, "uplink_v1.conf").expect("uplink resolvable by name");
    let uplink_id = uplink.id.clone();
    assert_eq!(uplink.kind(), NodeKind::File);
    assert_eq!(
        find_path_by_id(&root, &uplink_id),
        Some(id_path(&["root", "datastore", "protocols", uplink_id.as_str()]))
    );

    let root = rename(&root, &protocols, &uplink_id, "legacy_data.tar", 0, false).unwrap();
    let renamed = resolve_by_id_path(&root, &[NodeId::root(), "datastore".into(), "protocols".into(), uplink_id.clone()])
        .unwrap();
    assert_eq!(renamed.name, "legacy_data.tar");
    assert_eq!(renamed.kind(), NodeKind::File);
}

#[test]
fn file_and_archive_share_a_name_in_one_directory() {
    let root = datastore_tree();
    let datastore = id_path(&["root", "datastore"]);

    let root = add(&root, &datastore, Node::file("uplink_v1.conf", "")).unwrap();
    let uplink_id = resolve_by_id_path(&root, &datastore)
        .unwrap()
        .child_named("uplink_v1.conf", NodeKind::File)
        .unwrap()
        .id
        .clone();

    // Kinds differ, so the archive does not collide with the renamed file.
    let root = rename(&root, &datastore, &uplink_id, "legacy_data.tar", 0, false).unwrap();
    let dir = resolve_by_id_path(&root, &datastore).unwrap();
    let listing: Vec<(NodeKind, &str)> = dir
        .children()
        .iter()
        .map(|c| (c.kind(), c.name.as_str()))
        .collect();
    assert_eq!(
        listing,
        vec![
            (NodeKind::Directory, "protocols"),
            (NodeKind::Archive, "legacy_data.tar"),
            (NodeKind::File, "legacy_data.tar"),
        ]
    );
}

#[test]
fn unresolvable_id_path_is_none() {
    let root = datastore_tree();
    assert!(resolve_by_id_path(&root, &id_path(&["root", "nonexistent"])).is_none());
    assert!(resolve_by_id_path(&root, &[]).is_none());
}
