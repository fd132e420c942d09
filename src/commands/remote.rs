//! # Remote Command Implementation
//!
//! Restores remote configuration for the local repos: points
//! `remote.origin.url` back at the configured server and resets the fetch
//! refspec.

use anyhow::Result;
use clap::Args;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;

use crate::cli::App;

/// Restore remote configuration for the local repos
#[derive(Args, Debug)]
pub struct RemoteArgs {
    /// The remote sub-command to execute
    #[arg(value_parser = ["fix"])]
    pub command: String,
}

/// Execute the `remote` command.
pub fn execute(_args: RemoteArgs, app: &App) -> Result<bool> {
    let paths = Repo::clone_paths(&app.repos);
    let urls: Vec<String> = app
        .repos
        .iter()
        .map(|repo| repo.clone_url(&app.config.server))
        .collect();

    let cmd = GitCommand::new("config").arg("remote.origin.url").placeholder();
    let mut result = executor::run_in_repos(&app.ctx, &paths, &cmd, &[urls], DispatchOptions::default())?;
    if result {
        let cmd = GitCommand::new("config")
            .arg("remote.origin.fetch")
            .arg("+refs/heads/*:refs/remotes/origin/*");
        result = executor::run_in_repos(&app.ctx, &paths, &cmd, &[], DispatchOptions::default())?;
    }

    Ok(result)
}
