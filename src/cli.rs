//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use multigit::config::{self, Config};
use multigit::executor::ExecContext;
use multigit::output::OutputConfig;
use multigit::repo::{self, Repo, Selection};

use crate::commands;

/// Git operations across multiple repos
#[derive(Parser, Debug)]
#[command(name = "mgit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Override default location of the yaml config file
    #[arg(long, global = true, value_name = "FILE", default_value = "mgit.yaml")]
    config_file: PathBuf,

    /// Schema file with the per-product repository lists
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = ".multigit/schema.yaml"
    )]
    schema_file: PathBuf,

    /// Suppress per-repo status lines
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable DEBUG logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Limit operations to repos of the specified product(s)
    #[arg(long, global = true, value_delimiter = ',', value_name = "PRODUCTS")]
    products: Vec<String>,

    /// Limit operations to the specified repo clone path(s)
    #[arg(long, global = true, value_delimiter = ',', value_name = "PATHS")]
    repos: Vec<String>,

    /// Limit operations to the specified repo url(s)
    #[arg(long, global = true, value_delimiter = ',', value_name = "URLS")]
    repo_urls: Vec<String>,

    /// Run in every repo defined by the schema and fail if a workspace is
    /// missing, instead of skipping it
    #[arg(long, global = true)]
    require_all: bool,

    /// Bound on concurrently running git processes
    #[arg(long, global = true, value_name = "N")]
    jobs: Option<usize>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize empty repositories at every clone path
    Init(commands::init::InitArgs),
    /// Clone the workspace repositories
    Clone(commands::clone::CloneArgs),
    /// Check out a branch or tag across the repos
    Checkout(commands::checkout::CheckoutArgs),
    /// List, create, delete or rename branches
    Branch(commands::branch::BranchArgs),
    /// List, create, or delete tags
    Tag(commands::tag::TagArgs),
    /// Fetch upstream references
    Fetch(commands::fetch::FetchArgs),
    /// Fetch and merge branches
    Pull(commands::pull::PullArgs),
    /// Push references upstream
    Push(commands::push::PushArgs),
    /// Clean out non-repo files
    Clean(commands::clean::CleanArgs),
    /// Reset HEAD, index and/or working tree
    Reset(commands::reset::ResetArgs),
    /// Restore remote configuration for the local repos
    Remote(commands::remote::RemoteArgs),
    /// Print the list of repos and related info
    List(commands::list::ListArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Everything a subcommand needs: the parsed configuration, the selected
/// repository descriptors, and the execution context.
pub struct App {
    pub config: Config,
    pub repos: Vec<Repo>,
    pub ctx: ExecContext,
}

impl Cli {
    /// Execute the CLI command. Returns the aggregate outcome: `false`
    /// means at least one in-scope repository failed.
    pub fn execute(self) -> Result<bool> {
        let level = if self.verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .format_timestamp(None)
            .try_init()
            .ok();

        // Completions needs neither config nor schema.
        if let Commands::Completions(args) = &self.command {
            commands::completions::execute(args)?;
            return Ok(true);
        }

        let config = config::from_file(&self.config_file).with_context(|| {
            format!("Failed to load config from {}", self.config_file.display())
        })?;
        let schema = repo::schema_from_file(&self.schema_file).with_context(|| {
            format!("Failed to load schema from {}", self.schema_file.display())
        })?;
        let selection = Selection {
            products: self.products,
            repos: self.repos,
            repo_urls: self.repo_urls,
        };
        let repos = repo::select(&schema, &selection)?;
        let ctx = ExecContext {
            quiet: self.quiet,
            ignore_missing: !self.require_all,
            jobs: self.jobs,
            output: OutputConfig::from_env_and_flag(&self.color),
        };
        let app = App { config, repos, ctx };

        match self.command {
            Commands::Init(args) => commands::init::execute(args, &app),
            Commands::Clone(args) => commands::clone::execute(args, &app),
            Commands::Checkout(args) => commands::checkout::execute(args, &app),
            Commands::Branch(args) => commands::branch::execute(args, &app),
            Commands::Tag(args) => commands::tag::execute(args, &app),
            Commands::Fetch(args) => commands::fetch::execute(args, &app),
            Commands::Pull(args) => commands::pull::execute(args, &app),
            Commands::Push(args) => commands::push::execute(args, &app),
            Commands::Clean(args) => commands::clean::execute(args, &app),
            Commands::Reset(args) => commands::reset::execute(args, &app),
            Commands::Remote(args) => commands::remote::execute(args, &app),
            Commands::List(args) => commands::list::execute(args, &app),
            Commands::Completions(_) => unreachable!("handled above"),
        }
    }
}
