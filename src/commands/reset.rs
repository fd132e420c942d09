//! # Reset Command Implementation
//!
//! Sets HEAD, index and/or working tree to a particular commit across the
//! selected repositories. The source goes through the reference resolver;
//! unlike `checkout`, origin-prefixed remote refs are not consulted.

use anyhow::Result;
use clap::Args;
use log::debug;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;
use multigit::resolver;

use crate::cli::App;
use crate::commands::apply_sparse_paths;

/// Reset HEAD, index and/or working tree
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Do not touch the index file nor the working tree at all
    #[arg(long, group = "mode")]
    pub soft: bool,

    /// Reset the index but not the working tree (this is the default)
    #[arg(long, group = "mode")]
    pub mixed: bool,

    /// Reset the index and the working tree
    #[arg(long, group = "mode")]
    pub hard: bool,

    /// Check out only the specified comma-separated paths
    #[arg(long, value_delimiter = ',', value_name = "PATHS")]
    pub sparse_paths: Vec<String>,

    /// Enforce sparse checkout in these repos only
    #[arg(long, value_delimiter = ',', value_name = "REPOS")]
    pub rw_repos: Vec<String>,

    /// Fall back to the closest matching branch if the source doesn't exist
    #[arg(long)]
    pub force: bool,

    /// The name of the branch or tag to reset to
    #[arg(value_name = "BRANCH_OR_TAG")]
    pub source: Option<String>,
}

/// Execute the `reset` command.
pub fn execute(args: ResetArgs, app: &App) -> Result<bool> {
    let mut repos = app.repos.clone();
    if !args.rw_repos.is_empty() {
        repos.retain(|repo| args.rw_repos.contains(&repo.dest));
        debug!(
            "Sparse checkout enabled repos: {}",
            Repo::clone_paths(&repos).join(", ")
        );
    }
    let paths = Repo::clone_paths(&repos);

    if !args.sparse_paths.is_empty() {
        apply_sparse_paths(&app.ctx, &paths, &args.sparse_paths)?;
    }

    let mode = if args.soft {
        "--soft"
    } else if args.hard {
        "--hard"
    } else {
        "--mixed"
    };
    let cmd = GitCommand::new("reset").arg(mode);

    if let Some(source) = &args.source {
        let cmd = cmd.placeholder();
        return Ok(resolver::run_command_for_ref(
            &app.ctx, &repos, &cmd, source, false, args.force,
        )?);
    }

    Ok(executor::run_in_repos(
        &app.ctx,
        &paths,
        &cmd,
        &[],
        DispatchOptions::default(),
    )?)
}
