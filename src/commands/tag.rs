//! # Tag Command Implementation
//!
//! Lists, creates, or deletes tags across the selected repositories.
//! Creating from a source goes through the reference resolver so the tag
//! lands on the closest matching branch each repo actually has.

use anyhow::Result;
use clap::Args;
use log::error;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;
use multigit::resolver;

use crate::cli::App;

/// List, create, or delete tags
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Make an annotated tag object
    #[arg(short = 'a', long)]
    pub annotate: bool,

    /// Use the given tag message
    #[arg(short = 'm', long, value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Force creation of a tag, even if it already exists
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Delete the specified tag names
    #[arg(short = 'd', long, value_name = "TAG", num_args = 1..)]
    pub delete: Vec<String>,

    /// List tags with names that match the given pattern
    #[arg(short = 'l', long, value_name = "PATTERN")]
    pub list: Option<String>,

    /// Sort in a specific order
    #[arg(
        long,
        value_name = "KEY",
        value_parser = ["authordate", "creatordate", "committerdate", "refname", "taggerdate"]
    )]
    pub sort: Option<String>,

    /// Name of the tag to create
    pub tag: Option<String>,

    /// Starting point branch or tag from which to create the tag
    #[arg(value_name = "BRANCH_OR_TAG")]
    pub source: Option<String>,
}

/// Execute the `tag` command.
pub fn execute(args: TagArgs, app: &App) -> Result<bool> {
    let paths = Repo::clone_paths(&app.repos);

    let mut cmd = GitCommand::new("tag");
    if args.annotate {
        cmd = cmd.arg("-a");
    }
    if let Some(message) = &args.message {
        cmd = cmd.arg("-m").arg(message);
    }
    if let Some(pattern) = &args.list {
        cmd = cmd.arg("-l").arg(pattern);
    }
    if let Some(key) = &args.sort {
        cmd = cmd.arg("--sort").arg(key);
    }
    if args.force {
        cmd = cmd.arg("-f");
    }
    if !args.delete.is_empty() {
        let mut exit = false;
        if args.annotate {
            error!("Unexpected argument: '-a'");
            exit = true;
        }
        if args.message.is_some() {
            error!("Unexpected argument: '-m'");
            exit = true;
        }
        if args.tag.is_some() {
            error!("Unexpected argument: tag");
            exit = true;
        }
        if exit {
            return Ok(false);
        }
        cmd = cmd.arg("-d").args(&args.delete);
    }
    if let Some(tag) = &args.tag {
        cmd = cmd.arg(tag);
    }

    if let Some(source) = &args.source {
        let cmd = cmd.placeholder();
        return Ok(resolver::run_command_for_ref(
            &app.ctx, &app.repos, &cmd, source, false, false,
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
