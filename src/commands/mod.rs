//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `mgit` command-line tool. Each subcommand is defined in its own file to
//! keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the shared
//!   [`crate::cli::App`] state and performs the command's logic, returning
//!   the aggregate outcome across the selected repositories.
//!
//! The `execute` functions build `GitCommand` templates, resolve refs where
//! the command is ref-sensitive, and hand everything to the `multigit`
//! library's executor.

pub mod branch;
pub mod checkout;
pub mod clean;
pub mod clone;
pub mod completions;
pub mod fetch;
pub mod init;
pub mod list;
pub mod pull;
pub mod push;
pub mod remote;
pub mod reset;
pub mod tag;

use std::fs;
use std::path::Path;

use anyhow::Result;
use log::debug;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions, ExecContext};

/// Write the sparse-checkout specification into every repo and enable
/// `core.sparseCheckout`. Runs synchronously before any dispatch that reads
/// the files.
pub fn apply_sparse_paths(ctx: &ExecContext, repos: &[String], sparse_paths: &[String]) -> Result<()> {
    let body = sparse_paths.join("\n");
    debug!("Sparse paths: {}", body);
    for repo in repos {
        let file = Path::new(repo).join(".git").join("info").join("sparse-checkout");
        debug!("Writing sparse paths to {}", file.display());
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, &body)?;
    }
    let cmd = GitCommand::new("config").arg("core.sparseCheckout").arg("true");
    executor::collect_from_repos(ctx, repos, &cmd, &[], DispatchOptions::default())?;
    Ok(())
}
