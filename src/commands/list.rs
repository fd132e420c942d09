//! # List Command Implementation
//!
//! Prints the selected repos and related info. The `--filter-success` and
//! `--filter-failure` options narrow the set to repos where a given git
//! command succeeds or fails, which makes the command usable as a building
//! block in scripts ("which repos have local changes?").

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use log::debug;

use multigit::command::GitCommand;
use multigit::executor::{self, DispatchOptions};
use multigit::repo::Repo;

use crate::cli::App;

/// Print the list of repos and related info
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output just the URL of each repo
    #[arg(long, group = "output")]
    pub url: bool,

    /// Output just the destination path
    #[arg(long, group = "output")]
    pub dest: bool,

    /// Output just the gitrefs path configured for each repo
    #[arg(long)]
    pub gitrefs_path: bool,

    /// Return only repos that return successfully from the specified command
    #[arg(long, value_name = "CMD")]
    pub filter_success: Vec<String>,

    /// Return only repos that return unsuccessfully from the specified
    /// command
    #[arg(long, value_name = "CMD")]
    pub filter_failure: Vec<String>,
}

/// Keep the repos where `command` exits zero (`success`) or non-zero.
fn filter_repos(app: &App, repos: Vec<Repo>, command: &str, success: bool) -> Result<Vec<Repo>> {
    let cmd = GitCommand::from_cli_str(command)?;
    let paths = Repo::clone_paths(&repos);
    let data = executor::collect_from_repos(&app.ctx, &paths, &cmd, &[], DispatchOptions::default())?;

    let codes: BTreeMap<&String, Option<i32>> =
        data.iter().map(|(repo, result)| (repo, result.exit_code)).collect();
    debug!("{}", serde_json::to_string_pretty(&codes)?);

    Ok(repos
        .into_iter()
        .filter(|repo| {
            data.get(&repo.dest)
                .is_some_and(|result| (result.exit_code == Some(0)) == success)
        })
        .collect())
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, app: &App) -> Result<bool> {
    let mut repos = app.repos.clone();
    for command in &args.filter_success {
        repos = filter_repos(app, repos, command, true)?;
    }
    for command in &args.filter_failure {
        repos = filter_repos(app, repos, command, false)?;
    }

    let server = &app.config.server;
    let lines: Vec<String> = if args.dest {
        repos.iter().map(|repo| repo.dest.clone()).collect()
    } else if args.url {
        repos.iter().map(|repo| repo.clone_url(server)).collect()
    } else if args.gitrefs_path {
        repos
            .iter()
            .filter_map(|repo| repo.gitrefs_path.clone())
            .collect()
    } else {
        repos
            .iter()
            .map(|repo| format!("{}:{} {}", server, repo.url, repo.dest))
            .collect()
    };

    if lines.is_empty() {
        return Ok(false);
    }
    println!("{}", lines.join("\n"));
    Ok(true)
}
