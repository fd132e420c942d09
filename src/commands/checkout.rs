//! # Checkout Command Implementation
//!
//! Checks a branch or tag out across the selected repositories. The source
//! goes through the reference resolver: an exact tag scopes the checkout to
//! the repos carrying it, a branch name is longest-prefix matched per repo
//! with each repo's schema baseline as the fallback.
//!
//! Sparse-checkout specification files are written synchronously before any
//! git process launches, so the subsequent checkout never races the file.

use anyhow::Result;
use clap::Args;
use log::{debug, error};

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;
use multigit::resolver;

use crate::cli::App;
use crate::commands::apply_sparse_paths;

/// Check out a branch or tag across the repos
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Create new_branch if it doesn't exist, using the source argument as
    /// a starting point
    #[arg(short = 'b', value_name = "NEW_BRANCH", group = "new")]
    pub new_branch: Option<String>,

    /// Create or overwrite new_branch, using the source argument as a
    /// starting point
    #[arg(short = 'B', value_name = "NEW_BRANCH", group = "new")]
    pub new_branch_force: Option<String>,

    /// Create a new orphan branch with no history
    #[arg(long, value_name = "NEW_BRANCH", group = "new")]
    pub orphan: Option<String>,

    /// Fall back to the closest matching branch if the source doesn't exist
    #[arg(long)]
    pub force: bool,

    /// Check out only the specified comma-separated paths
    #[arg(long, value_delimiter = ',', value_name = "PATHS")]
    pub sparse_paths: Vec<String>,

    /// Enforce sparse checkout in these repos only
    #[arg(long, value_delimiter = ',', value_name = "REPOS")]
    pub rw_repos: Vec<String>,

    /// The name of the branch or tag to check out, or starting point to
    /// create from
    pub source: Option<String>,
}

/// Execute the `checkout` command.
pub fn execute(args: CheckoutArgs, app: &App) -> Result<bool> {
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

    let mut cmd = GitCommand::new("checkout");
    if let Some(branch) = &args.new_branch {
        cmd = cmd.arg("-b").arg(branch);
    } else if let Some(branch) = &args.new_branch_force {
        cmd = cmd.arg("-B").arg(branch);
    } else if let Some(branch) = &args.orphan {
        cmd = cmd.arg("--orphan").arg(branch);
    }

    let Some(source) = &args.source else {
        if args.new_branch.is_none() && args.new_branch_force.is_none() && args.orphan.is_none() {
            error!("You must provide a new branch to create or a source to checkout.");
            return Ok(false);
        }
        return Ok(executor::run_in_repos(
            &app.ctx,
            &paths,
            &cmd,
            &[],
            DispatchOptions::default(),
        )?);
    };

    let cmd = cmd.placeholder();
    Ok(resolver::run_command_for_ref(
        &app.ctx, &repos, &cmd, source, true, args.force,
    )?)
}
