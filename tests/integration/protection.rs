use strata::error::FsErrorKind;
use strata::policy::{evaluate_protection, Action, Protection, PERMANENT_LOCK_MESSAGE};
use strata::tree::{add, create_by_path_string, delete, rename, Node};

use super::support::{guest_tree, parent_of, path_of};

#[test]
fn delete_is_gated_by_release_level_and_force() {
    let root = guest_tree();
    let guest = parent_of(&root, "access_key.pem");
    let key = path_of(&root, "access_key.pem").pop().unwrap();

    let err = delete(&root, &guest, &key, Action::Delete, 8, false).unwrap_err();
    assert_eq!(err.kind(), FsErrorKind::Protected);
    assert_eq!(
        err.protection_message(),
        Some("Critical asset. Deletion prohibited.")
    );
    assert_eq!(err.to_string(), "PROTECTED: Critical asset. Deletion prohibited.");

    assert!(delete(&root, &guest, &key, Action::Delete, 9, false).is_ok());
    assert!(delete(&root, &guest, &key, Action::Delete, 0, true).is_ok());
}

#[test]
fn rules_are_keyed_by_action() {
    let root = guest_tree();
    let guest = parent_of(&root, "access_key.pem");
    let key = path_of(&root, "access_key.pem").pop().unwrap();

    // No rename rule: renaming is allowed at any level.
    assert!(rename(&root, &guest, &key, "old_key.pem", 0, false).is_ok());
    let err = delete(&root, &guest, &key, Action::Cut, 0, false).unwrap_err();
    assert_eq!(err.protection_message(), Some("Critical asset. Cannot be moved."));
}

#[test]
fn permanent_protection_ignores_level_but_not_force() {
    let root = guest_tree();
    let guest = path_of(&root, "guest");
    let root = add(
        &root,
        &guest,
        Node::file("kernel.img", "").with_protection(Protection::permanent()),
    )
    .unwrap();
    let kernel = path_of(&root, "kernel.img").pop().unwrap();

    let err = rename(&root, &guest, &kernel, "k.img", i64::MAX, false).unwrap_err();
    assert_eq!(err.protection_message(), Some(PERMANENT_LOCK_MESSAGE));
    assert!(delete(&root, &guest, &kernel, Action::Delete, 0, true).is_ok());
}

#[test]
fn unconditional_add_lock_blocks_add_and_path_creation() {
    let vault = Node::directory("vault", vec![])
        .with_protection(Protection::new().block(Action::Add, "Vault is sealed"));
    let root = std::sync::Arc::new(Node::root_with(vec![vault]));
    let vault_path = path_of(&root, "vault");

    let err = add(&root, &vault_path, Node::file("loot", "")).unwrap_err();
    assert_eq!(err.protection_message(), Some("Vault is sealed"));

    let created = create_by_path_string(&root, &path_of(&root, "/"), "vault/loot");
    assert_eq!(
        created.error(),
        Some("Cannot create in protected directory 'vault': Vault is sealed")
    );
}

#[test]
fn releasable_add_lock_does_not_block_add() {
    let dir = Node::directory("inbox", vec![]).with_protection(
        Protection::new()
            .block(Action::Add, "Inbox locked until level 2")
            .release_at(2),
    );
    assert!(evaluate_protection(&dir, Action::Add, 1).is_some());

    let root = std::sync::Arc::new(Node::root_with(vec![dir]));
    let inbox = path_of(&root, "inbox");
    assert!(add(&root, &inbox, Node::file("mail", "")).is_ok());
}
