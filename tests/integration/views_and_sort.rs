use strata::search::rank_descendants;
use strata::tree::{list_all_directories, resolve_by_id_path, Node};
use strata::views::{
    filter_matches, sort_label, sort_nodes, visible_children, SortBy, SortDirection, ViewOptions,
};

use super::support::{guest_tree, path_of};

#[test]
fn smart_case_filter() {
    assert!(filter_matches("CLAUDE.md", "c"));
    assert!(!filter_matches("claude.md", "C"));
    assert!(filter_matches("Config.TOML", "C"));
    assert!(filter_matches("Config.TOML", "toml"));
    assert!(!filter_matches("Config.TOML", "Toml"));
}

#[test]
fn listing_hides_dotfiles_and_sorts_naturally() {
    let root = guest_tree();
    let guest = resolve_by_id_path(&root, &path_of(&root, "guest")).unwrap();

    let names: Vec<String> = visible_children(guest, &ViewOptions::default())
        .iter()
        .map(|n| n.name.clone())
        .collect();
    assert_eq!(names, vec!["datastore", "protocols", "access_key.pem", "notes.txt"]);

    let with_hidden = visible_children(guest, &ViewOptions::default().show_hidden(true));
    assert!(with_hidden.iter().any(|n| n.name == ".profile"));
}

#[test]
fn desc_is_reverse_of_asc_for_every_key() {
    let root = guest_tree();
    let guest = resolve_by_id_path(&root, &path_of(&root, "guest")).unwrap();
    let children = guest.children().to_vec();

    for key in SortBy::ALL {
        let mut asc: Vec<_> = sort_nodes(&children, key, SortDirection::Asc)
            .iter()
            .map(|n| n.id.clone())
            .collect();
        let desc: Vec<_> = sort_nodes(&children, key, SortDirection::Desc)
            .iter()
            .map(|n| n.id.clone())
            .collect();
        asc.reverse();
        assert_eq!(asc, desc, "{}", sort_label(key, SortDirection::Asc));
    }
}

#[test]
fn directories_exclude_archives() {
    let root = guest_tree();
    let paths: Vec<String> = list_all_directories(&root)
        .into_iter()
        .map(|d| d.display_path)
        .collect();
    assert_eq!(
        paths,
        vec![
            "/",
            "/home",
            "/home/guest",
            "/home/guest/datastore",
            "/home/guest/protocols"
        ]
    );
}

#[test]
fn fuzzy_search_reaches_into_archives() {
    let root = std::sync::Arc::new(Node::root_with(vec![Node::directory(
        "datastore",
        vec![Node::archive("legacy_data.tar", vec![Node::file("dump.sql", "")])],
    )]));
    let ranked = rank_descendants(&root, &path_of(&root, "/"), "dump");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].entry.display_path, "datastore/legacy_data.tar/dump.sql");
}
