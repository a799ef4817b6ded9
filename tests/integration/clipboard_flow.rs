use strata::clipboard::{paste, ClipboardAction, ClipboardItem};
use strata::error::FsErrorKind;
use strata::tree::find_path_by_id;

use super::support::{child_names, guest_tree, parent_of, path_of};

#[test]
fn cut_batch_stops_at_protected_key_and_keeps_earlier_moves() {
    let root = guest_tree();
    let guest = path_of(&root, "guest");
    let notes = path_of(&root, "notes.txt").pop().unwrap();
    let key = path_of(&root, "access_key.pem").pop().unwrap();
    let protocols = path_of(&root, "protocols");

    let clipboard =
        ClipboardItem::capture(&root, guest.clone(), &[notes.clone(), key], ClipboardAction::Cut)
            .unwrap();
    let report = paste(&root, &clipboard, &protocols, 0);

    let failure = report.failure.as_ref().unwrap();
    assert_eq!(failure.index, 1);
    assert_eq!(failure.error.kind(), FsErrorKind::Protected);
    assert_eq!(
        failure.to_string(),
        "Paste failed for \"access_key.pem\": PROTECTED: Critical asset. Cannot be moved."
    );
    assert_eq!(child_names(&report.root, &protocols), vec!["notes.txt"]);
    // Identity survives the move.
    let moved = find_path_by_id(&report.root, &notes).unwrap();
    assert_eq!(moved[..moved.len() - 1], protocols[..]);
}

#[test]
fn copy_into_same_directory_gets_numbered_name() {
    let root = guest_tree();
    let guest = parent_of(&root, "notes.txt");
    let notes = path_of(&root, "notes.txt").pop().unwrap();

    let clipboard =
        ClipboardItem::capture(&root, guest.clone(), &[notes], ClipboardAction::Yank).unwrap();
    let once = paste(&root, &clipboard, &guest, 0);
    let twice = paste(&once.root, &clipboard, &guest, 0);

    assert_eq!(once.pasted, vec!["notes_1.txt"]);
    assert_eq!(twice.pasted, vec!["notes_2.txt"]);
    let names = child_names(&twice.root, &guest);
    assert!(names.contains(&"notes.txt".to_string()));
    assert!(names.contains(&"notes_2.txt".to_string()));
}

#[test]
fn cut_released_with_sufficient_level() {
    let root = guest_tree();
    let guest = path_of(&root, "guest");
    let key = path_of(&root, "access_key.pem").pop().unwrap();
    let datastore = path_of(&root, "datastore");

    let clipboard = ClipboardItem::capture(&root, guest, &[key], ClipboardAction::Cut).unwrap();
    let report = paste(&root, &clipboard, &datastore, 9);
    assert!(report.is_complete());
    assert_eq!(
        child_names(&report.root, &datastore),
        vec!["legacy_data.tar", "access_key.pem"]
    );
}
