use std::path::Path;

use strata::config::StrataConfig;
use strata::error::ApiError;
use strata::policy::{Action, Protection};
use strata::store::{FileSnapshotStore, SnapshotStore};
use strata::tooling::cli::{CliContext, Commands};
use strata::tree::Node;
use tempfile::TempDir;

fn context(snapshot: &Path) -> CliContext {
    CliContext::with_config(snapshot.to_path_buf(), StrataConfig::default())
}

fn ls(path: &str) -> Commands {
    Commands::Ls {
        path: Some(path.to_string()),
        all: false,
        filter: None,
        sort: None,
        desc: false,
        format: "json".to_string(),
    }
}

fn listed_names(output: &str) -> Vec<String> {
    let rows: serde_json::Value = serde_json::from_str(output).unwrap();
    rows.as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

fn seeded(dir: &TempDir) -> CliContext {
    let snapshot = dir.path().join("tree.json");
    let root = Node::root_with(vec![Node::directory(
        "vault",
        vec![
            Node::file("secret.key", "k").with_protection(
                Protection::new()
                    .block(Action::Delete, "Secrets stay")
                    .release_at(5),
            ),
            Node::file("readme.md", "hi"),
        ],
    )]);
    FileSnapshotStore::new(&snapshot).save(&root).unwrap();
    context(&snapshot)
}

#[test]
fn init_then_create_and_list() {
    let dir = TempDir::new().unwrap();
    let cli = context(&dir.path().join("tree.json"));

    cli.execute(&Commands::Init { force: false, demo: false }).unwrap();
    let again = cli.execute(&Commands::Init { force: false, demo: false });
    assert!(matches!(again, Err(ApiError::InvalidOperation(_))));

    let out = cli
        .execute(&Commands::Create {
            path: "docs/guides/intro.md".to_string(),
            base: "/".to_string(),
        })
        .unwrap();
    assert_eq!(out, "Created intro.md");
    cli.execute(&Commands::Create {
        path: "assets/".to_string(),
        base: "/".to_string(),
    })
    .unwrap();

    assert_eq!(listed_names(&cli.execute(&ls("/")).unwrap()), vec!["assets", "docs"]);
    assert_eq!(
        listed_names(&cli.execute(&ls("/docs/guides")).unwrap()),
        vec!["intro.md"]
    );

    let dup = cli.execute(&Commands::Create {
        path: "docs/guides/intro.md".to_string(),
        base: "/".to_string(),
    });
    assert!(matches!(dup, Err(ApiError::Fs(_))));
}

#[test]
fn rm_respects_protection_and_auth_level() {
    let dir = TempDir::new().unwrap();
    let cli = seeded(&dir);

    let err = cli
        .execute(&Commands::Rm {
            paths: vec!["/vault/secret.key".to_string()],
            force: false,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "PROTECTED: Secrets stay");

    let cli = cli.with_auth_level(Some(5));
    cli.execute(&Commands::Rm {
        paths: vec!["/vault/secret.key".to_string()],
        force: false,
    })
    .unwrap();
    assert_eq!(listed_names(&cli.execute(&ls("/vault")).unwrap()), vec!["readme.md"]);
}

#[test]
fn rm_batch_keeps_earlier_removals() {
    let dir = TempDir::new().unwrap();
    let cli = seeded(&dir);

    let result = cli.execute(&Commands::Rm {
        paths: vec!["/vault/readme.md".to_string(), "/vault/secret.key".to_string()],
        force: false,
    });
    assert!(result.is_err());
    assert_eq!(listed_names(&cli.execute(&ls("/vault")).unwrap()), vec!["secret.key"]);
}

#[test]
fn mv_and_cp_between_directories() {
    let dir = TempDir::new().unwrap();
    let cli = seeded(&dir);
    cli.execute(&Commands::Create {
        path: "archive/".to_string(),
        base: "/".to_string(),
    })
    .unwrap();

    let out = cli
        .execute(&Commands::Cp {
            sources: vec!["/vault/readme.md".to_string()],
            dest: "/archive".to_string(),
        })
        .unwrap();
    assert_eq!(out, "Copied readme.md to /archive");

    let out = cli
        .execute(&Commands::Mv {
            sources: vec!["/vault/readme.md".to_string()],
            dest: "/archive".to_string(),
        })
        .unwrap();
    assert_eq!(out, "Moved readme_1.md to /archive");
    assert_eq!(
        listed_names(&cli.execute(&ls("/archive")).unwrap()),
        vec!["readme.md", "readme_1.md"]
    );
    assert_eq!(listed_names(&cli.execute(&ls("/vault")).unwrap()), vec!["secret.key"]);
}

#[test]
fn rename_write_and_find() {
    let dir = TempDir::new().unwrap();
    let cli = seeded(&dir);

    cli.execute(&Commands::Rename {
        path: "/vault/readme.md".to_string(),
        new_name: "README.md".to_string(),
        force: false,
    })
    .unwrap();
    cli.execute(&Commands::Write {
        path: "/vault/README.md".to_string(),
        content: "updated".to_string(),
    })
    .unwrap();

    let found = cli
        .execute(&Commands::Find {
            query: "readme".to_string(),
            base: "/".to_string(),
            limit: 10,
        })
        .unwrap();
    assert!(found.contains("vault/README.md"));

    let missing = cli.execute(&ls("/nowhere"));
    assert!(matches!(missing, Err(ApiError::PathNotFound(_))));
}

#[test]
fn validate_reports_structural_errors() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("broken.json");
    std::fs::write(
        &snapshot,
        r#"{"id":"root","name":"/","type":"dir","children":[
            {"id":"a","name":"x","type":"file"},
            {"id":"a","name":"y","type":"file"}
        ]}"#,
    )
    .unwrap();
    let cli = context(&snapshot);

    let out = cli
        .execute(&Commands::Validate {
            format: "json".to_string(),
        })
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["node_count"], 3);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);

    // Loading for any other command rejects the snapshot.
    assert!(matches!(cli.execute(&Commands::Dirs), Err(ApiError::Snapshot(_))));
}

#[test]
fn demo_tree_and_config_rendering() {
    let dir = TempDir::new().unwrap();
    let cli = context(&dir.path().join("demo.json"));
    cli.execute(&Commands::Init { force: true, demo: true }).unwrap();

    let dirs = cli.execute(&Commands::Dirs).unwrap();
    assert!(dirs.lines().any(|l| l == "/home/guest/datastore/protocols"));

    let config = cli.execute(&Commands::Config).unwrap();
    assert!(config.contains("[view]"));
    assert!(config.contains("sort_by = \"natural\""));
}

#[test]
fn rename_refuses_unaddressable_names() {
    let dir = TempDir::new().unwrap();
    let cli = seeded(&dir);

    for bad in ["a/b", "", ".."] {
        let result = cli.execute(&Commands::Rename {
            path: "/vault/readme.md".to_string(),
            new_name: bad.to_string(),
            force: false,
        });
        assert!(matches!(result, Err(ApiError::InvalidOperation(_))), "{:?}", bad);
    }
    assert_eq!(
        listed_names(&cli.execute(&ls("/vault")).unwrap()),
        vec!["readme.md", "secret.key"]
    );
}

#[test]
fn validate_flags_payload_foreign_to_kind() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("smuggled.json");
    std::fs::write(
        &snapshot,
        r#"{"id":"root","name":"/","type":"dir","children":[
            {"id":"f","name":"notes.txt","type":"file","content":"x",
             "children":[{"id":"hidden","name":"secret.txt","type":"file"}]}
        ]}"#,
    )
    .unwrap();
    let cli = context(&snapshot);

    let out = cli
        .execute(&Commands::Validate {
            format: "json".to_string(),
        })
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["errors"][0], "File /notes.txt carries children");
    assert!(matches!(cli.execute(&Commands::Dirs), Err(ApiError::Snapshot(_))));
}
