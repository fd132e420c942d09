//! # Concurrent Command Executor
//!
//! This module fans a `GitCommand` template out across a set of
//! repositories, substitutes per-repo arguments, and aggregates success or
//! failure, captured output, and timing into a single report.
//!
//! ## Entry Points
//!
//! - [`run_in_repos`]: boolean aggregate with live console reporting - one
//!   status line per repo as it finishes, then a trailing timing table. The
//!   return value is the AND of every dispatched repo's success.
//! - [`collect_from_repos`]: structured collection - no console reporting,
//!   returns the per-repo [`ExecutionResult`] map for callers that need the
//!   exit codes and captured output (ref probing, repo filtering).
//!
//! Both share one dispatch core. Failures are always local to a repo and
//! never abort sibling work; only construction-time errors (template arity)
//! propagate, before any process is spawned.
//!
//! ## Concurrency
//!
//! Dispatch runs one task per eligible repo on a rayon pool, bounded by
//! `ExecContext::jobs` when set. The shared timing log and the console are
//! the only shared mutable state, guarded by a single mutex so each repo's
//! status line and timing row are appended atomically; the relative order
//! across repos is completion order. There is no cancellation: once
//! dispatched, every git process runs to completion.
//!
//! ## Missing Workspaces
//!
//! A repo whose working directory does not exist on disk is skipped by
//! `run_in_repos` unconditionally, but by `collect_from_repos` only when
//! `ExecContext::ignore_missing` is set - otherwise the spawn fails in the
//! nonexistent directory and is recorded as that repo's `Error` result.
//! This asymmetry is inherited behavior, kept as observed; unifying the two
//! paths needs a product decision first.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;

use chrono::{DateTime, Local};
use log::{debug, error};
use rayon::prelude::*;

use crate::command::GitCommand;
use crate::error::{Error, Result};
use crate::output::{sanitize, OutputConfig, RunStatus};

/// Immutable per-invocation execution configuration, threaded explicitly
/// through every dispatch instead of living in process-wide state.
#[derive(Debug, Clone)]
pub struct ExecContext {
    /// Suppress per-repo status lines and blank separators (never the
    /// captured stdout/stderr bodies themselves).
    pub quiet: bool,
    /// Whether structured collection skips repos missing from disk.
    pub ignore_missing: bool,
    /// Bound on concurrently running git processes; `None` uses the rayon
    /// default.
    pub jobs: Option<usize>,
    /// Color/terminal policy for rendered status lines.
    pub output: OutputConfig,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self {
            quiet: false,
            ignore_missing: true,
            jobs: None,
            output: OutputConfig::default(),
        }
    }
}

/// Per-dispatch switches.
#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    /// Run repos concurrently; when false the same per-repo work executes
    /// sequentially on the caller's thread with identical output.
    pub parallel: bool,
    /// Use each repo's directory as the working directory of its git
    /// process; when false every process runs in the invoking process's
    /// current directory (used by `clone`, which creates the directories).
    pub change_dir: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            change_dir: true,
        }
    }
}

/// Outcome of one git process in one repository.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Process exit code; `None` when the process never started (or was
    /// terminated by a signal).
    pub exit_code: Option<i32>,
    /// Captured stdout, exactly as produced (never sanitized).
    pub stdout: String,
    /// Captured stderr, or the spawn error text when the process could not
    /// be started.
    pub stderr: String,
    /// Wall-clock start of the attempt.
    pub started: DateTime<Local>,
    /// Wall-clock end of the attempt.
    pub finished: DateTime<Local>,
    /// Classified outcome.
    pub status: RunStatus,
}

/// One row of the shared timing log, appended as each repo finishes.
struct TimingRow {
    repo: String,
    started: DateTime<Local>,
    finished: DateTime<Local>,
    elapsed_secs: f64,
    status: RunStatus,
}

struct PlanUnit {
    repo: String,
    argv: Vec<String>,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn debug_echo_enabled() -> bool {
    std::env::var_os("DEBUG").is_some_and(|v| !v.is_empty())
}

/// Dispatch `cmd` across `repos` and reduce to a single boolean: the AND of
/// every dispatched repo's success. Repos skipped for being absent from
/// disk contribute neither success nor failure.
///
/// Prints one status line per repo as it completes, the captured output
/// bodies, and a trailing timing table.
pub fn run_in_repos(
    ctx: &ExecContext,
    repos: &[String],
    cmd: &GitCommand,
    columns: &[Vec<String>],
    opts: DispatchOptions,
) -> Result<bool> {
    let (results, rows) = dispatch(ctx, repos, cmd, columns, opts, true)?;
    let ok = results.iter().all(|(_, result)| result.status.succeeded());
    print_timing_table(&ctx.output, &rows);
    if !ok {
        error!("Command failed in one or more repos: {}", cmd.display());
    }
    Ok(ok)
}

/// Dispatch `cmd` across `repos` and return the per-repo results keyed by
/// repo path, without console reporting.
pub fn collect_from_repos(
    ctx: &ExecContext,
    repos: &[String],
    cmd: &GitCommand,
    columns: &[Vec<String>],
    opts: DispatchOptions,
) -> Result<BTreeMap<String, ExecutionResult>> {
    let (results, _) = dispatch(ctx, repos, cmd, columns, opts, false)?;
    Ok(results.into_iter().collect())
}

/// Shared dispatch core. `report` selects live console reporting (boolean
/// mode) versus silent collection (structured mode).
fn dispatch(
    ctx: &ExecContext,
    repos: &[String],
    cmd: &GitCommand,
    columns: &[Vec<String>],
    opts: DispatchOptions,
    report: bool,
) -> Result<(Vec<(String, ExecutionResult)>, Vec<TimingRow>)> {
    let rendered = cmd.render_for_repos(repos.len(), columns)?;

    let mut plan = Vec::with_capacity(repos.len());
    for (repo, argv) in repos.iter().zip(rendered) {
        if opts.change_dir && !Path::new(repo).is_dir() {
            // Boolean mode always skips a missing workspace; structured
            // mode only under ignore_missing (inherited asymmetry, see the
            // module docs).
            if report || ctx.ignore_missing {
                debug!("Skipping missing workspace {}", repo);
                continue;
            }
        }
        plan.push(PlanUnit {
            repo: repo.clone(),
            argv,
        });
    }

    let debug_echo = debug_echo_enabled();
    let timing: Mutex<Vec<TimingRow>> = Mutex::new(Vec::with_capacity(plan.len()));

    let worker = |unit: &PlanUnit| -> (String, ExecutionResult) {
        let cwd_display = if opts.change_dir { unit.repo.as_str() } else { "." };
        debug!("CMD {}: git {}", cwd_display, unit.argv.join(" "));

        let started = Local::now();
        let mut command = Command::new("git");
        command.args(&unit.argv);
        if opts.change_dir {
            command.current_dir(&unit.repo);
        }
        let outcome = command.output();
        let finished = Local::now();

        let result = match outcome {
            Ok(out) => {
                let status = if out.status.success() {
                    RunStatus::Ok
                } else {
                    RunStatus::Fail
                };
                ExecutionResult {
                    exit_code: out.status.code(),
                    stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                    started,
                    finished,
                    status,
                }
            }
            Err(spawn_err) => ExecutionResult {
                exit_code: None,
                stdout: String::new(),
                stderr: spawn_err.to_string(),
                started,
                finished,
                status: RunStatus::Error,
            },
        };

        let elapsed_secs = (finished - started).num_milliseconds() as f64 / 1000.0;

        // Single critical section: the timing row and this repo's console
        // output are appended atomically with respect to sibling repos.
        let mut log = timing.lock().unwrap();
        log.push(TimingRow {
            repo: unit.repo.clone(),
            started,
            finished,
            elapsed_secs,
            status: result.status,
        });
        if debug_echo {
            println!("Ran in {}: git {}", cwd_display, unit.argv.join(" "));
        }
        if report {
            if !ctx.quiet {
                println!("{}", ctx.output.format_status_line(&unit.repo, result.status));
            }
            let body = result.stdout.trim_end_matches('\n');
            if !body.is_empty() {
                println!("{}", sanitize(body));
            }
            let err_body = result.stderr.trim_end_matches('\n');
            if !err_body.is_empty() {
                eprintln!("{}", err_body);
            }
            if !ctx.quiet && (!body.is_empty() || !err_body.is_empty()) {
                println!();
            }
        }
        drop(log);

        (unit.repo.clone(), result)
    };

    let results: Vec<(String, ExecutionResult)> = if opts.parallel {
        match ctx.jobs {
            Some(bound) if bound > 0 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(bound)
                    .build()
                    .map_err(|e| Error::WorkerPool {
                        message: e.to_string(),
                    })?;
                pool.install(|| plan.par_iter().map(worker).collect())
            }
            _ => plan.par_iter().map(worker).collect(),
        }
    } else {
        plan.iter().map(worker).collect()
    };

    let rows = timing.into_inner().unwrap();
    Ok((results, rows))
}

/// Print the trailing per-repo timing table in completion order.
fn print_timing_table(output: &OutputConfig, rows: &[TimingRow]) {
    if rows.is_empty() {
        return;
    }
    println!(
        "{:<50}{:<21}{:<21}{:<16}{}",
        "Thread", "Start Time", "End Time", "Total Time (s)", "Status"
    );
    for row in rows {
        println!(
            "{:<50}{:<21}{:<21}{:<16.3}{}",
            row.repo,
            row.started.format(TIMESTAMP_FORMAT).to_string(),
            row.finished.format(TIMESTAMP_FORMAT).to_string(),
            row.elapsed_secs,
            output.status_token(row.status),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet_ctx() -> ExecContext {
        ExecContext {
            quiet: true,
            ignore_missing: true,
            jobs: Some(4),
            output: OutputConfig::without_color(),
        }
    }

    fn dirs(temps: &[&TempDir]) -> Vec<String> {
        temps
            .iter()
            .map(|t| t.path().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_arity_error_raised_before_any_spawn() {
        let ctx = quiet_ctx();
        let cmd = GitCommand::new("version").placeholder();
        // No columns supplied for one placeholder: construction error.
        let err = run_in_repos(&ctx, &["somewhere".to_string()], &cmd, &[], DispatchOptions::default());
        assert!(matches!(err, Err(Error::TemplateArity { .. })));
    }

    #[test]
    fn test_aggregate_is_and_of_exit_codes() {
        let ctx = quiet_ctx();
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let repos = dirs(&[&a, &b]);

        let ok = run_in_repos(
            &ctx,
            &repos,
            &GitCommand::new("version"),
            &[],
            DispatchOptions::default(),
        )
        .unwrap();
        assert!(ok);

        // An unknown git subcommand exits non-zero everywhere.
        let ok = run_in_repos(
            &ctx,
            &repos,
            &GitCommand::new("definitely-not-a-subcommand"),
            &[],
            DispatchOptions::default(),
        )
        .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_one_failure_fails_aggregate_but_not_siblings() {
        let ctx = quiet_ctx();
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let repos = dirs(&[&a, &b]);

        // Same failing command everywhere: siblings all still produce results.
        let results = collect_from_repos(
            &ctx,
            &repos,
            &GitCommand::new("definitely-not-a-subcommand"),
            &[],
            DispatchOptions::default(),
        )
        .unwrap();
        assert_eq!(results.len(), 2);
        for result in results.values() {
            assert_eq!(result.status, RunStatus::Fail);
            assert_ne!(result.exit_code, Some(0));
        }
    }

    #[test]
    fn test_boolean_mode_skips_missing_workspace() {
        let ctx = quiet_ctx();
        let a = TempDir::new().unwrap();
        let mut repos = dirs(&[&a]);
        repos.push("does/not/exist".to_string());

        // The missing repo is excluded from the AND: aggregate stays true.
        let ok = run_in_repos(
            &ctx,
            &repos,
            &GitCommand::new("version"),
            &[],
            DispatchOptions::default(),
        )
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_structured_mode_skip_depends_on_ignore_missing() {
        let a = TempDir::new().unwrap();
        let mut repos = dirs(&[&a]);
        repos.push("does/not/exist".to_string());

        let skipping = quiet_ctx();
        let results = collect_from_repos(
            &skipping,
            &repos,
            &GitCommand::new("version"),
            &[],
            DispatchOptions::default(),
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results.contains_key("does/not/exist"));

        let strict = ExecContext {
            ignore_missing: false,
            ..quiet_ctx()
        };
        let results = collect_from_repos(
            &strict,
            &repos,
            &GitCommand::new("version"),
            &[],
            DispatchOptions::default(),
        )
        .unwrap();
        assert_eq!(results.len(), 2);
        let missing = &results["does/not/exist"];
        assert_eq!(missing.status, RunStatus::Error);
        assert_eq!(missing.exit_code, None);
        assert!(!missing.stderr.is_empty());
    }

    #[test]
    fn test_collect_preserves_unsanitized_output() {
        let ctx = quiet_ctx();
        let a = TempDir::new().unwrap();
        let repos = dirs(&[&a]);

        let results = collect_from_repos(
            &ctx,
            &repos,
            &GitCommand::new("version"),
            &[],
            DispatchOptions::default(),
        )
        .unwrap();
        let result = results.values().next().unwrap();
        assert_eq!(result.status, RunStatus::Ok);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("git version"));
    }

    #[test]
    fn test_sequential_dispatch_matches_parallel() {
        let ctx = quiet_ctx();
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let repos = dirs(&[&a, &b]);

        let opts = DispatchOptions {
            parallel: false,
            ..Default::default()
        };
        let results = collect_from_repos(&ctx, &repos, &GitCommand::new("version"), &[], opts).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.values().all(|r| r.status == RunStatus::Ok));
    }

    #[test]
    fn test_per_repo_columns_reach_each_repo() {
        let ctx = quiet_ctx();
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let repos = dirs(&[&a, &b]);

        // `git version <garbage>` still exits zero while `git <garbage>`
        // does not, so probe substitution through a real subcommand flag.
        let cmd = GitCommand::new("-c").placeholder().arg("version");
        let columns = vec![vec!["alias.x=y".to_string(), "alias.y=z".to_string()]];
        let results = collect_from_repos(&ctx, &repos, &cmd, &columns, DispatchOptions::default()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.values().all(|r| r.status == RunStatus::Ok));
    }

    #[test]
    fn test_timestamps_are_ordered() {
        let ctx = quiet_ctx();
        let a = TempDir::new().unwrap();
        let repos = dirs(&[&a]);
        let results = collect_from_repos(
            &ctx,
            &repos,
            &GitCommand::new("version"),
            &[],
            DispatchOptions::default(),
        )
        .unwrap();
        let result = results.values().next().unwrap();
        assert!(result.finished >= result.started);
    }
}
