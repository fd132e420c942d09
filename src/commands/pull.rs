//! # Pull Command Implementation
//!
//! Fetches and merges branches in the selected repositories.

use anyhow::Result;
use clap::Args;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;

use crate::cli::App;

/// Fetch and merge branches
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Pull a history truncated to the specified number of revisions
    #[arg(long, value_name = "DEPTH")]
    pub depth: Option<u32>,

    /// Recursively pull all submodules within, using their default settings
    #[arg(long = "recurse-submodules")]
    pub recursive: bool,

    /// Allow only fast-forward merges; equivalent to --ff-only
    #[arg(long, group = "ff_mode")]
    pub ff: bool,

    /// Create a merge commit even when the merge resolves as a fast-forward
    #[arg(long, group = "ff_mode")]
    pub no_ff: bool,

    /// Refuse to merge unless the merge can be resolved as fast-forward
    #[arg(long, group = "ff_mode")]
    pub ff_only: bool,

    /// Rebase instead of creating a merge commit
    #[arg(long)]
    pub rebase: bool,

    /// Pull from the specified upstream repository
    pub upstream: Option<String>,

    /// Merge the specified branch or tag into the current branch
    #[arg(value_name = "BRANCH_OR_TAG")]
    pub source: Option<String>,
}

/// Execute the `pull` command.
pub fn execute(args: PullArgs, app: &App) -> Result<bool> {
    let mut cmd = GitCommand::new("pull");
    if let Some(depth) = args.depth {
        cmd = cmd.arg("--depth").arg(depth.to_string());
    }
    if args.recursive {
        cmd = cmd.arg("--recurse-submodules");
    }
    if args.rebase {
        cmd = cmd.arg("--rebase");
    }
    if args.ff_only {
        cmd = cmd.arg("--ff-only");
    } else if args.no_ff {
        cmd = cmd.arg("--no-ff");
    } else if args.ff {
        cmd = cmd.arg("--ff");
    }
    if let Some(upstream) = &args.upstream {
        cmd = cmd.arg(upstream);
        if let Some(source) = &args.source {
            cmd = cmd.arg(source);
        }
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
