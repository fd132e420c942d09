//! # Init Command Implementation
//!
//! Creates every clone path named by the schema and initializes an empty
//! git repository in each one.

use std::fs;

use anyhow::Result;
use clap::Args;
use log::debug;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;

use crate::cli::App;

/// Initialize empty repositories at every clone path
#[derive(Args, Debug)]
pub struct InitArgs {}

/// Execute the `init` command.
pub fn execute(_args: InitArgs, app: &App) -> Result<bool> {
    let paths = Repo::clone_paths(&app.repos);
    for path in &paths {
        fs::create_dir_all(path)?;
    }
    debug!("Repo paths created: {:?}", paths);

    let cmd = GitCommand::new("init").arg("-q");
    Ok(executor::run_in_repos(
        &app.ctx,
        &paths,
        &cmd,
        &[],
        DispatchOptions::default(),
    )?)
}
