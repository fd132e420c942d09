//! # Fetch Command Implementation
//!
//! Fetches upstream references for the selected repositories.

use anyhow::Result;
use clap::Args;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;

use crate::cli::App;

/// Fetch upstream references
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Fetch a history truncated to the specified number of revisions
    #[arg(long, value_name = "DEPTH", group = "submodules")]
    pub depth: Option<u32>,

    /// Recursively fetch all submodules within, using their default settings
    #[arg(long = "recurse-submodules", group = "submodules")]
    pub recursive: bool,

    /// Fetch the full history of a shallow-cloned repo
    #[arg(long)]
    pub unshallow: bool,

    /// Prune remote-tracking references that no longer exist in the remote
    #[arg(long)]
    pub prune: bool,

    /// Fetch all remote branches from the remote named origin
    #[arg(long)]
    pub heads: bool,

    /// Fetch all remote tags
    #[arg(long)]
    pub tags: bool,
}

/// Execute the `fetch` command.
pub fn execute(args: FetchArgs, app: &App) -> Result<bool> {
    let mut cmd = GitCommand::new("fetch");
    if let Some(depth) = args.depth {
        cmd = cmd
            .arg("--depth")
            .arg(depth.to_string())
            .arg("--no-recurse-submodules");
    } else if args.recursive {
        cmd = cmd.arg("--recurse-submodules");
    }
    if args.unshallow {
        cmd = cmd.arg("--unshallow");
    }
    if args.prune {
        cmd = cmd.arg("--prune");
    }
    if args.tags {
        cmd = cmd.arg("--tags");
    }
    if args.heads {
        cmd = cmd.arg("origin").arg("+refs/heads/*:refs/remotes/origin/*");
    }

    let paths = Repo::clone_paths(&app.repos);
    Ok(executor::run_in_repos(
        &app.ctx,
        &paths,
        &cmd,
        &[],
        DispatchOptions::default(),
    )?)
}
