//! # Clone Command Implementation
//!
//! Clones every selected repository from the configured server root. When a
//! branch is requested, each repository gets the longest-prefix matching
//! branch its own remote actually has, falling back to the reference the
//! schema pinned it to; repositories therefore may check out different
//! branches from one invocation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use log::info;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;
use multigit::resolver::{self, GitRefProbe};

use crate::cli::App;

/// Clone the workspace repositories
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Create a shallow clone with a history truncated to the specified
    /// number of revisions
    #[arg(long, value_name = "DEPTH")]
    pub depth: Option<u32>,

    /// After clone, initialize all submodules with their default settings
    #[arg(long)]
    pub recursive: bool,

    /// Don't checkout HEAD after cloning
    #[arg(short = 'n', long)]
    pub no_checkout: bool,

    /// Checkout the provided branch, or the longest-prefix matching branch
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Only clone missing repositories and ignore already-cloned repos
    #[arg(long)]
    pub missing: bool,
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs, app: &App) -> Result<bool> {
    let server = &app.config.server;

    let mut cmd = GitCommand::new("clone");
    if let Some(depth) = args.depth {
        cmd = cmd.arg("--depth").arg(depth.to_string());
    }
    if args.recursive {
        cmd = cmd.arg("--recursive");
    }
    if args.no_checkout {
        cmd = cmd.arg("--no-checkout");
    }
    // branch, clone URL, destination
    cmd = cmd.arg("--branch").placeholder().placeholder().placeholder();

    let targets: Vec<Repo> = app
        .repos
        .iter()
        .filter(|repo| !args.missing || !Path::new(&repo.dest).is_dir())
        .cloned()
        .collect();
    if targets.is_empty() {
        info!("All repositories are already cloned");
        return Ok(true);
    }

    // One branch per repo: either the closest match its remote has for the
    // requested branch, or the schema-pinned baseline.
    let branches: BTreeMap<String, String> = match &args.branch {
        Some(requested) => {
            let probe = GitRefProbe::new(&app.ctx);
            resolver::lpm_remote(&probe, server, &targets, requested)?
        }
        None => targets
            .iter()
            .map(|repo| (repo.dest.clone(), repo.baseline_ref.clone()))
            .collect(),
    };

    let dests = Repo::clone_paths(&targets);
    let branch_col: Vec<String> = targets.iter().map(|r| branches[&r.dest].clone()).collect();
    let url_col: Vec<String> = targets.iter().map(|r| r.clone_url(server)).collect();
    let dest_col = dests.clone();

    Ok(executor::run_in_repos(
        &app.ctx,
        &dests,
        &cmd,
        &[branch_col, url_col, dest_col],
        DispatchOptions {
            change_dir: false,
            ..Default::default()
        },
    )?)
}
