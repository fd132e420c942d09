//! # Push Command Implementation
//!
//! Pushes references upstream in the selected repositories. A single source
//! ref goes through the reference resolver, which scopes the push to the
//! repos that actually carry the ref (an exact tag scopes to the tagged
//! subset); multiple sources are passed through verbatim.

use anyhow::Result;
use clap::Args;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;
use multigit::resolver;

use crate::cli::App;

/// Push references upstream
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Delete the specified branch/tag in the upstream repository
    #[arg(long)]
    pub delete: bool,

    /// The name of the remote repository to push to
    pub upstream: Option<String>,

    /// The branch or tag to be pushed
    #[arg(value_name = "BRANCH_OR_TAG")]
    pub source: Vec<String>,
}

/// Execute the `push` command.
pub fn execute(args: PushArgs, app: &App) -> Result<bool> {
    let mut cmd = GitCommand::new("push");
    if args.delete {
        cmd = cmd.arg("--delete");
    }
    if let Some(upstream) = &args.upstream {
        cmd = cmd.arg(upstream);
    }

    if args.source.len() == 1 {
        let cmd = cmd.placeholder();
        return Ok(resolver::run_command_for_ref(
            &app.ctx,
            &app.repos,
            &cmd,
            &args.source[0],
            false,
            false,
        )?);
    }
    cmd = cmd.args(&args.source);

    let paths = Repo::clone_paths(&app.repos);
    Ok(executor::run_in_repos(
        &app.ctx,
        &paths,
        &cmd,
        &[],
        DispatchOptions::default(),
    )?)
}
