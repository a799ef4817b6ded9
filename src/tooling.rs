//! Tooling & Integration Layer
//!
//! Command-line access to a tree stored in a JSON snapshot file.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
