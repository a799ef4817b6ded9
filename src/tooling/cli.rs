//! CLI Tooling
//!
//! Command-line interface over a tree kept in a JSON snapshot file. Every command loads the
//! snapshot, runs engine operations against it, and saves the new root when it changed.
//! Paths on the command line are slash-joined names, resolved to id paths against the loaded
//! tree.

use crate::clipboard::{paste, ClipboardAction, ClipboardItem};
use crate::config::{ConfigLoader, StrataConfig};
use crate::error::{ApiError, FsError};
use crate::logging::LoggingConfig;
use crate::policy::{Action, Protection};
use crate::search::rank_descendants;
use crate::store::{self, FileSnapshotStore, SnapshotStore};
use crate::tree::hasher;
use crate::tree::mutation::{
    create_by_path_string, delete, ensure_child, ensure_path, rename, stamp_timestamps,
    write_content, PathCreation,
};
use crate::tree::node::Node;
use crate::tree::query::{list_all_directories, resolve_by_id_path, to_display_path};
use crate::tooling::format::{
    format_directories, format_listing_json, format_listing_text, format_search_results,
    format_tree_text, format_validation_text,
};
use crate::types::{IdPath, NodeId};
use crate::views::{sort_label, visible_children, SortBy, SortDirection, ViewOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Strata CLI - simulated filesystem tree with copy-on-write edits
#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Inspect and edit a simulated filesystem tree stored as a JSON snapshot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Snapshot file holding the tree
    #[arg(long, short, default_value = "strata.json")]
    pub snapshot: PathBuf,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Authorization level for protected operations (overrides policy.auth_level)
    #[arg(long)]
    pub auth_level: Option<i64>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line logging flags on top of the configured settings.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new snapshot holding an empty root
    Init {
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
        /// Seed a small demo tree instead of an empty root
        #[arg(long)]
        demo: bool,
    },
    /// List a directory
    Ls {
        /// Directory to list (default: /)
        path: Option<String>,
        /// Include dot-files
        #[arg(long, short)]
        all: bool,
        /// Smart-case name filter
        #[arg(long)]
        filter: Option<String>,
        /// Sort key: natural, alphabetical, modified, size, extension
        #[arg(long)]
        sort: Option<String>,
        /// Reverse the sort
        #[arg(long)]
        desc: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Draw the tree below a directory
    Tree {
        /// Directory to draw (default: /)
        path: Option<String>,
        /// Include dot-files
        #[arg(long, short)]
        all: bool,
    },
    /// Create files and directories; a trailing '/' makes the last segment a directory
    Create {
        /// Slash-separated path, relative to --in
        path: String,
        /// Directory the path is relative to
        #[arg(long = "in", default_value = "/")]
        base: String,
    },
    /// Replace a file's content
    Write {
        path: String,
        content: String,
    },
    /// Delete nodes
    Rm {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Ignore protection rules
        #[arg(long)]
        force: bool,
    },
    /// Rename a node in place
    Rename {
        path: String,
        new_name: String,
        /// Ignore protection and replace a same-named sibling
        #[arg(long)]
        force: bool,
    },
    /// Copy nodes into a directory
    Cp {
        #[arg(required = true)]
        sources: Vec<String>,
        dest: String,
    },
    /// Move nodes into a directory
    Mv {
        #[arg(required = true)]
        sources: Vec<String>,
        dest: String,
    },
    /// Fuzzy-find nodes below a directory
    Find {
        query: String,
        /// Directory to search (default: /)
        #[arg(long = "in", default_value = "/")]
        base: String,
        /// Maximum number of results
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// List every directory
    Dirs,
    /// Check the snapshot's structure
    Validate {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the effective configuration
    Config,
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Init { .. } => "init",
        Commands::Ls { .. } => "ls",
        Commands::Tree { .. } => "tree",
        Commands::Create { .. } => "create",
        Commands::Write { .. } => "write",
        Commands::Rm { .. } => "rm",
        Commands::Rename { .. } => "rename",
        Commands::Cp { .. } => "cp",
        Commands::Mv { .. } => "mv",
        Commands::Find { .. } => "find",
        Commands::Dirs => "dirs",
        Commands::Validate { .. } => "validate",
        Commands::Config => "config",
    }
}

/// Resolve a slash-joined display path to an id path.
///
/// Empty segments and `.` are skipped, `..` steps up (never above the root). When a directory
/// shares its name with an archive or file, the directory wins.
pub fn resolve_display_path(root: &Node, path: &str) -> Result<IdPath, ApiError> {
    let mut ids = vec![root.id.clone()];
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                if ids.len() > 1 {
                    ids.pop();
                }
                continue;
            }
            _ => {}
        }
        let current = resolve_by_id_path(root, &ids)
            .ok_or_else(|| ApiError::PathNotFound(path.to_string()))?;
        // Children are in canonical order, so the first match is the highest-ranked kind.
        let child = current
            .children()
            .iter()
            .find(|child| child.name == segment)
            .ok_or_else(|| ApiError::PathNotFound(path.to_string()))?;
        ids.push(child.id.clone());
    }
    Ok(ids)
}

/// Split a node's id path into its parent's path and its own id.
fn split_parent(path: &str, mut ids: IdPath) -> Result<(IdPath, NodeId), ApiError> {
    if ids.len() < 2 {
        return Err(ApiError::InvalidOperation(format!(
            "Cannot modify the root directory ('{}')",
            path
        )));
    }
    let id = ids.pop().ok_or(FsError::InvalidPath)?;
    Ok((ids, id))
}

/// Reject names that a display path could never address.
fn check_node_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(ApiError::InvalidOperation(format!(
            "Invalid name '{}': names must be non-empty, not '.' or '..', and contain no '/'",
            name
        )));
    }
    Ok(())
}

/// Small tree used by `init --demo`.
pub fn demo_tree() -> Result<Arc<Node>, ApiError> {
    let invalid = ApiError::InvalidOperation;
    let mut root = Arc::new(Node::root());
    for path in [
        "home/guest/datastore/protocols/",
        "home/guest/incoming/",
        "etc/",
        "tmp/",
    ] {
        root = ensure_path(&root, &[NodeId::root()], path).map_err(invalid)?;
    }

    let guest = resolve_display_path(&root, "/home/guest")?;
    root = ensure_child(&root, &guest, Node::file("notes.txt", "Remember to rotate the uplink keys."))?;
    root = ensure_child(&root, &guest, Node::file(".bashrc", "alias ll='ls -l'"))?;

    let datastore = resolve_display_path(&root, "/home/guest/datastore")?;
    root = ensure_child(
        &root,
        &datastore,
        Node::archive("legacy_data.tar", vec![Node::file("dump.sql", "-- empty")]),
    )?;

    let etc = resolve_display_path(&root, "/etc")?;
    root = ensure_child(
        &root,
        &etc,
        Node::file("hosts", "127.0.0.1 localhost").with_protection(
            Protection::new()
                .block(Action::Delete, "Name resolution depends on this file")
                .block(Action::Rename, "Name resolution depends on this file")
                .release_at(3),
        ),
    )?;
    root = ensure_child(
        &root,
        &etc,
        Node::file("shadow", "root:*:19000:0:99999:7:::").with_protection(Protection::permanent()),
    )?;

    Ok(Arc::new(stamp_timestamps(&root, hasher::now())))
}

/// CLI context holding the snapshot location and effective configuration
pub struct CliContext {
    store: FileSnapshotStore,
    config: StrataConfig,
    auth_level: i64,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(snapshot: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self::with_config(snapshot, config))
    }

    /// Create a context from an already-loaded configuration
    pub fn with_config(snapshot: PathBuf, config: StrataConfig) -> Self {
        let auth_level = config.policy.auth_level;
        Self {
            store: FileSnapshotStore::new(snapshot),
            config,
            auth_level,
        }
    }

    /// Override the configured authorization level
    pub fn with_auth_level(mut self, auth_level: Option<i64>) -> Self {
        if let Some(level) = auth_level {
            self.auth_level = level;
        }
        self
    }

    pub fn config(&self) -> &StrataConfig {
        &self.config
    }

    pub fn auth_level(&self) -> i64 {
        self.auth_level
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        tracing::debug!(command = command_name(command), "executing command");
        match command {
            Commands::Init { force, demo } => self.handle_init(*force, *demo),
            Commands::Ls {
                path,
                all,
                filter,
                sort,
                desc,
                format,
            } => {
                let mut options = ViewOptions::from(&self.config.view);
                if *all {
                    options.show_hidden = true;
                }
                if let Some(filter) = filter {
                    options.filter_text = filter.clone();
                }
                if let Some(sort) = sort {
                    options.sort_by = SortBy::parse(sort);
                }
                if *desc {
                    options.sort_direction = SortDirection::Desc;
                }
                self.handle_ls(path.as_deref().unwrap_or("/"), &options, format)
            }
            Commands::Tree { path, all } => {
                let root = self.store.load()?;
                let ids = resolve_display_path(&root, path.as_deref().unwrap_or("/"))?;
                let node = resolve_by_id_path(&root, &ids).ok_or(FsError::InvalidPath)?;
                let options = ViewOptions::from(&self.config.view)
                    .show_hidden(*all || self.config.view.show_hidden);
                Ok(format_tree_text(node, &options))
            }
            Commands::Create { path, base } => self.handle_create(path, base),
            Commands::Write { path, content } => {
                let root = self.store.load()?;
                let (parent, id) = split_parent(path, resolve_display_path(&root, path)?)?;
                let next = write_content(&root, &parent, &id, content.as_str())?;
                self.store.save(&next)?;
                Ok(format!("Wrote {} bytes to {}", content.len(), path))
            }
            Commands::Rm { paths, force } => self.handle_rm(paths, *force),
            Commands::Rename {
                path,
                new_name,
                force,
            } => {
                check_node_name(new_name)?;
                let root = self.store.load()?;
                let (parent, id) = split_parent(path, resolve_display_path(&root, path)?)?;
                let next = rename(&root, &parent, &id, new_name, self.auth_level, *force)?;
                self.store.save(&next)?;
                Ok(format!("Renamed {} to {}", path, new_name))
            }
            Commands::Cp { sources, dest } => {
                self.handle_paste(sources, dest, ClipboardAction::Yank)
            }
            Commands::Mv { sources, dest } => self.handle_paste(sources, dest, ClipboardAction::Cut),
            Commands::Find { query, base, limit } => {
                let root = self.store.load()?;
                let start = resolve_display_path(&root, base)?;
                let mut results = rank_descendants(&root, &start, query);
                results.truncate(*limit);
                Ok(format_search_results(query, &results))
            }
            Commands::Dirs => {
                let root = self.store.load()?;
                Ok(format_directories(&list_all_directories(&root)))
            }
            Commands::Validate { format } => self.handle_validate(format),
            Commands::Config => ConfigLoader::to_toml(&self.config),
        }
    }

    fn handle_init(&self, force: bool, demo: bool) -> Result<String, ApiError> {
        if self.store.exists() && !force {
            return Err(ApiError::InvalidOperation(format!(
                "Snapshot already exists: {} (use --force to overwrite)",
                self.store.path().display()
            )));
        }
        let root = if demo {
            demo_tree()?
        } else {
            Arc::new(stamp_timestamps(&Node::root(), hasher::now()))
        };
        self.store.save(&root)?;
        info!(path = %self.store.path().display(), demo, "snapshot initialized");
        Ok(format!(
            "Initialized snapshot at {}",
            self.store.path().display()
        ))
    }

    fn handle_ls(&self, path: &str, options: &ViewOptions, format: &str) -> Result<String, ApiError> {
        let root = self.store.load()?;
        let ids = resolve_display_path(&root, path)?;
        let dir = resolve_by_id_path(&root, &ids).ok_or(FsError::InvalidPath)?;
        if !dir.is_container() {
            return Err(ApiError::InvalidOperation(format!("Not a directory: {}", path)));
        }
        let nodes = visible_children(dir, options);
        match format {
            "json" => Ok(serde_json::to_string_pretty(&format_listing_json(&nodes))?),
            _ => Ok(format_listing_text(
                &to_display_path(&root, &ids),
                &sort_label(options.sort_by, options.sort_direction),
                &nodes,
            )),
        }
    }

    fn handle_create(&self, path: &str, base: &str) -> Result<String, ApiError> {
        let root = self.store.load()?;
        let base_ids = resolve_display_path(&root, base)?;
        match create_by_path_string(&root, &base_ids, path) {
            PathCreation::Created { root, created_name } => {
                self.store.save(&root)?;
                Ok(match created_name {
                    Some(name) => format!("Created {}", name),
                    None => "Nothing to create".to_string(),
                })
            }
            PathCreation::Collision { existing, .. } => Err(FsError::Collision {
                name: existing.name.clone(),
            }
            .into()),
            PathCreation::Rejected { reason, .. } => Err(ApiError::InvalidOperation(reason)),
        }
    }

    fn handle_rm(&self, paths: &[String], force: bool) -> Result<String, ApiError> {
        let mut root = self.store.load()?;
        let mut removed = Vec::new();
        let mut failure = None;
        for path in paths {
            let step = resolve_display_path(&root, path)
                .and_then(|ids| split_parent(path, ids))
                .and_then(|(parent, id)| {
                    Ok(delete(&root, &parent, &id, Action::Delete, self.auth_level, force)?)
                });
            match step {
                Ok(next) => {
                    root = next;
                    removed.push(path.as_str());
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        if !removed.is_empty() {
            self.store.save(&root)?;
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(format!("Removed {}", removed.join(", "))),
        }
    }

    fn handle_paste(
        &self,
        sources: &[String],
        dest: &str,
        action: ClipboardAction,
    ) -> Result<String, ApiError> {
        let root = self.store.load()?;
        let dest_ids = resolve_display_path(&root, dest)?;
        let ids = sources
            .iter()
            .map(|source| {
                resolve_display_path(&root, source)
                    .and_then(|path| path.last().cloned().ok_or(FsError::InvalidPath.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let clipboard = ClipboardItem::capture_by_id(&root, vec![NodeId::root()], &ids, action)?;

        let report = paste(&root, &clipboard, &dest_ids, self.auth_level);
        if !report.pasted.is_empty() {
            self.store.save(&report.root)?;
        }
        if let Some(failure) = report.failure {
            return Err(ApiError::InvalidOperation(failure.to_string()));
        }
        let verb = match action {
            ClipboardAction::Cut => "Moved",
            ClipboardAction::Yank => "Copied",
        };
        Ok(format!("{} {} to {}", verb, report.pasted.join(", "), dest))
    }

    fn handle_validate(&self, format: &str) -> Result<String, ApiError> {
        let json = std::fs::read_to_string(self.store.path())?;
        let (_, report) = store::inspect(&json)?;
        match format {
            "json" => Ok(serde_json::to_string_pretty(&report)?),
            _ => Ok(format_validation_text(&report)),
        }
    }
}
