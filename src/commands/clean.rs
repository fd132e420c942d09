//! # Clean Command Implementation
//!
//! Cleans untracked files out of the selected repositories.

use anyhow::Result;
use clap::Args;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;

use crate::cli::App;

/// Clean out non-repo files
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Remove untracked directories in addition to untracked files
    #[arg(short = 'd')]
    pub directory: bool,

    /// Clean even if the Git configuration variable clean.requireForce is
    /// set to false
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Don't actually remove anything, just show what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Remove ignored files
    #[arg(short = 'x', group = "ignored")]
    pub clean_ignored: bool,

    /// Remove only ignored files
    #[arg(short = 'X', group = "ignored")]
    pub only_ignored: bool,
}

/// Execute the `clean` command.
pub fn execute(args: CleanArgs, app: &App) -> Result<bool> {
    let mut cmd = GitCommand::new("clean");
    if args.directory {
        cmd = cmd.arg("-d");
    }
    if args.force {
        cmd = cmd.arg("--force");
    }
    if args.dry_run {
        cmd = cmd.arg("--dry-run");
    }
    if args.clean_ignored {
        cmd = cmd.arg("-x");
    } else if args.only_ignored {
        cmd = cmd.arg("-X");
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
