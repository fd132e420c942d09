//! # Branch Command Implementation
//!
//! Lists, creates, deletes or renames branches across the selected
//! repositories. Creating from a source goes through the reference
//! resolver; `--delete-pattern` first collects the matching branch names
//! per repo, then deletes each repo's own matches.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use log::{debug, error, info};

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;
use multigit::resolver;

use crate::cli::App;

/// List, create, delete or rename branches
#[derive(Args, Debug)]
pub struct BranchArgs {
    /// Show all branches, including remotes
    #[arg(short = 'a', long, group = "action")]
    pub all: bool,

    /// Show the currently checked out branch
    #[arg(long, group = "action")]
    pub current: bool,

    /// Show remote branches
    #[arg(short = 'r', long, group = "action")]
    pub remotes: bool,

    /// Delete the specified branch(es), provided they are fully merged
    /// upstream
    #[arg(short = 'd', long, value_name = "BRANCH", num_args = 1.., group = "action")]
    pub delete: Vec<String>,

    /// Delete the specified branch(es), regardless whether they are fully
    /// merged upstream or not
    #[arg(short = 'D', value_name = "BRANCH", num_args = 1.., group = "action")]
    pub force_delete: Vec<String>,

    /// Delete all branches matching the given glob pattern, except if it is
    /// checked out
    #[arg(long, value_name = "PATTERN", group = "action")]
    pub delete_pattern: Option<String>,

    /// Move/rename a branch
    #[arg(short = 'm', long = "move", value_names = ["OLD", "NEW"], num_args = 2, group = "action")]
    pub move_branch: Vec<String>,

    /// Move/rename a branch, even if the new branch name already exists
    #[arg(short = 'M', value_names = ["OLD", "NEW"], num_args = 2, group = "action")]
    pub force_move: Vec<String>,

    /// Unset the specified branch's upstream branch
    #[arg(long, value_name = "BRANCH", group = "action")]
    pub unset_upstream: Option<String>,

    /// Set up the branch's tracking information to the specified upstream
    /// branch
    #[arg(short = 'u', long, value_name = "UPSTREAM")]
    pub set_upstream_to: Option<String>,

    /// Mark the start-point branch as upstream from the new branch
    #[arg(short = 't', long, overrides_with = "no_track")]
    pub track: bool,

    /// Do not mark the start-point branch as upstream from the new branch
    #[arg(long, overrides_with = "track")]
    pub no_track: bool,

    /// Force creation of a branch, even if it already exists or the source
    /// does not exist
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Name of the branch to create
    pub branch: Option<String>,

    /// Branch or tag to use as a starting point when creating the branch
    #[arg(value_name = "BRANCH_OR_TAG")]
    pub source: Option<String>,
}

impl BranchArgs {
    fn action(&self) -> &'static str {
        if !self.delete.is_empty() || !self.force_delete.is_empty() || self.delete_pattern.is_some()
        {
            "delete"
        } else if !self.move_branch.is_empty() || !self.force_move.is_empty() {
            "move"
        } else if self.unset_upstream.is_some() {
            "unset-upstream"
        } else if self.all || self.remotes {
            "list"
        } else if self.current {
            "current"
        } else {
            "create"
        }
    }
}

/// Validate that no create-only arguments were combined with another action.
fn validate_args(args: &BranchArgs) -> bool {
    let action = args.action();
    if action == "create" {
        return true;
    }
    let mut success = true;
    if let Some(branch) = &args.branch {
        error!("Unexpected argument: {}", branch);
        success = false;
    }
    if let Some(source) = &args.source {
        error!("Unexpected argument: {}", source);
        success = false;
    }
    if args.set_upstream_to.is_some() {
        error!(
            "The --set-upstream-to/-u argument is inconsistent with the {} action",
            action
        );
        success = false;
    }
    if args.track {
        error!(
            "The --track/-t argument is inconsistent with the {} action",
            action
        );
        success = false;
    }
    success
}

/// Execute the `branch` command.
pub fn execute(args: BranchArgs, app: &App) -> Result<bool> {
    let paths = Repo::clone_paths(&app.repos);
    if !validate_args(&args) {
        return Ok(false);
    }

    let mut cmd = GitCommand::new("branch");
    if args.all {
        cmd = cmd.arg("-a");
    } else if args.remotes {
        cmd = cmd.arg("-r");
    } else if !args.delete.is_empty() {
        cmd = cmd.arg("-d").args(&args.delete);
    } else if !args.force_delete.is_empty() {
        cmd = cmd.arg("-D").args(&args.force_delete);
    } else if args.delete_pattern.is_some() {
        cmd = cmd.arg("-D").placeholder_list();
    } else if !args.move_branch.is_empty() {
        cmd = cmd.arg("-m").args(&args.move_branch);
    } else if !args.force_move.is_empty() {
        cmd = cmd.arg("-M").args(&args.force_move);
    } else if let Some(branch) = &args.unset_upstream {
        cmd = cmd.arg("--unset-upstream").arg(branch);
    }
    if args.force {
        cmd = cmd.arg("-f");
    }
    if let Some(upstream) = &args.set_upstream_to {
        cmd = cmd.arg("-u").arg(upstream);
    }
    if args.track {
        cmd = cmd.arg("--track");
    }
    if let Some(branch) = &args.branch {
        cmd = cmd.arg(branch);
    }

    if let Some(source) = &args.source {
        let cmd = cmd.placeholder();
        return Ok(resolver::run_command_for_ref(
            &app.ctx, &app.repos, &cmd, source, false, args.force,
        )?);
    }

    if args.current {
        cmd = GitCommand::new("symbolic-ref").arg("HEAD");
    }

    if let Some(pattern) = &args.delete_pattern {
        let find = GitCommand::new("for-each-ref")
            .arg("--format")
            .arg("%(refname:short)")
            .arg(format!("refs/heads/{}", pattern));
        let data =
            executor::collect_from_repos(&app.ctx, &paths, &find, &[], DispatchOptions::default())?;
        let matching: BTreeMap<String, String> = data
            .iter()
            .filter(|(_, result)| result.exit_code == Some(0) && !result.stdout.trim().is_empty())
            .map(|(repo, result)| {
                let branches = result.stdout.trim().lines().collect::<Vec<_>>().join(" ");
                (repo.clone(), branches)
            })
            .collect();
        debug!("{}", serde_json::to_string_pretty(&matching)?);
        if matching.is_empty() {
            info!("No branches match '{}'", pattern);
            return Ok(true);
        }
        let repos: Vec<String> = matching.keys().cloned().collect();
        let branches: Vec<String> = matching.values().cloned().collect();
        return Ok(executor::run_in_repos(
            &app.ctx,
            &repos,
            &cmd,
            &[branches],
            DispatchOptions::default(),
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
