//! # Reference Resolver
//!
//! Given a requested branch/tag name and each repository's pinned baseline
//! reference, this module decides, independently for every repository,
//! which concrete reference to use.
//!
//! Resolution is a two-step policy:
//!
//! 1. **Exact tag**: if the requested name exists as a tag anywhere, the
//!    operation is scoped to exactly the repos that have it and the literal
//!    name is reused. Tags are never prefix-matched.
//! 2. **Longest-prefix match**: otherwise the name is treated as a branch
//!    and progressively shortened - dropping one trailing token per round -
//!    until each repo has matched some prefix, locally or against its own
//!    remote. Repos that never match fall back to their own baseline,
//!    rewritten to share the requested name's root segment where one exists.
//!
//! The search is deterministic for a fixed local/remote ref state.
//!
//! All git probing goes through the [`RefProbe`] trait; the default
//! [`GitRefProbe`] routes every probe through the command executor's
//! structured entry point, so the executor remains the only component that
//! touches the process boundary. Tests substitute an in-memory probe.

use std::collections::BTreeMap;

use log::debug;

use crate::command::GitCommand;
use crate::error::{Error, Result};
use crate::executor::{self, DispatchOptions, ExecContext};
use crate::repo::Repo;

/// Roots that never grow a `/develop` probe and end the search on their own.
const RESERVED_ROOTS: [&str; 2] = ["origin", "next"];

/// Existence probes for local and remote references.
pub trait RefProbe {
    /// Subset of `repos` (by clone path, input order preserved) where the
    /// exact tag `refs/tags/<name>` exists.
    fn repos_with_tag(&self, repos: &[String], name: &str) -> Result<Vec<String>>;

    /// Subset of `repos` where `name` exists as a branch: local heads,
    /// remote-tracking refs, and `origin/<name>` when `check_origin`.
    fn repos_with_branch(&self, repos: &[String], name: &str, check_origin: bool)
        -> Result<Vec<String>>;

    /// Subset of `repos` where `candidate` exists under any local ref
    /// namespace (heads, remotes, tags; plus `refs/remotes/origin/` when
    /// `check_origin`).
    fn repos_with_local_ref(
        &self,
        repos: &[String],
        candidate: &str,
        check_origin: bool,
    ) -> Result<Vec<String>>;

    /// Whether the remote at `url` advertises `candidate` as a head.
    fn remote_has_ref(&self, url: &str, candidate: &str) -> Result<bool>;
}

/// The default probe: every check is one git invocation dispatched through
/// the executor's structured collection path.
pub struct GitRefProbe<'a> {
    ctx: &'a ExecContext,
}

impl<'a> GitRefProbe<'a> {
    pub fn new(ctx: &'a ExecContext) -> Self {
        Self { ctx }
    }

    /// Run `cmd` in every repo and keep the repos that exited zero.
    fn repos_passing(&self, repos: &[String], cmd: &GitCommand) -> Result<Vec<String>> {
        let results =
            executor::collect_from_repos(self.ctx, repos, cmd, &[], DispatchOptions::default())?;
        Ok(repos
            .iter()
            .filter(|repo| {
                results
                    .get(*repo)
                    .is_some_and(|r| r.exit_code == Some(0))
            })
            .cloned()
            .collect())
    }
}

impl RefProbe for GitRefProbe<'_> {
    fn repos_with_tag(&self, repos: &[String], name: &str) -> Result<Vec<String>> {
        let cmd = GitCommand::new("show-ref")
            .arg("--verify")
            .arg("--quiet")
            .arg(format!("refs/tags/{}", name));
        self.repos_passing(repos, &cmd)
    }

    fn repos_with_branch(
        &self,
        repos: &[String],
        name: &str,
        check_origin: bool,
    ) -> Result<Vec<String>> {
        let mut cmd = GitCommand::new("show-ref")
            .arg("--quiet")
            .arg(format!("refs/heads/{}", name))
            .arg(format!("refs/remotes/{}", name));
        if check_origin {
            cmd = cmd.arg(format!("refs/remotes/origin/{}", name));
        }
        self.repos_passing(repos, &cmd)
    }

    fn repos_with_local_ref(
        &self,
        repos: &[String],
        candidate: &str,
        check_origin: bool,
    ) -> Result<Vec<String>> {
        let mut cmd = GitCommand::new("show-ref")
            .arg("--quiet")
            .arg(format!("refs/heads/{}", candidate))
            .arg(format!("refs/remotes/{}", candidate))
            .arg(format!("refs/tags/{}", candidate));
        if check_origin {
            cmd = cmd.arg(format!("refs/remotes/origin/{}", candidate));
        }
        self.repos_passing(repos, &cmd)
    }

    fn remote_has_ref(&self, url: &str, candidate: &str) -> Result<bool> {
        let cmd = GitCommand::new("ls-remote")
            .arg("--heads")
            .arg(url)
            .arg(candidate);
        let repos = vec![url.to_string()];
        let results = executor::collect_from_repos(
            self.ctx,
            &repos,
            &cmd,
            &[],
            DispatchOptions {
                change_dir: false,
                ..Default::default()
            },
        )?;
        Ok(results
            .get(url)
            .is_some_and(|r| r.exit_code == Some(0) && !r.stdout.trim().is_empty()))
    }
}

/// One delimiter-preserving segment of a reference name.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    /// The delimiter preceding this token; `None` for the first segment.
    delim: Option<char>,
    text: String,
}

/// A reference name tokenized on `/` and `-`, delimiters retained so any
/// prefix can be reconstructed exactly. Prefix shrinking drops the last
/// (delimiter, token) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefParts {
    segments: Vec<Segment>,
}

impl RefParts {
    pub fn parse(reference: &str) -> Self {
        let mut segments = Vec::new();
        let mut delim = None;
        let mut text = String::new();
        for c in reference.chars() {
            if c == '/' || c == '-' {
                segments.push(Segment {
                    delim,
                    text: std::mem::take(&mut text),
                });
                delim = Some(c);
            } else {
                text.push(c);
            }
        }
        segments.push(Segment { delim, text });
        Self { segments }
    }

    /// Reconstruct the current candidate string.
    pub fn join(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if let Some(delim) = segment.delim {
                out.push(delim);
            }
            out.push_str(&segment.text);
        }
        out
    }

    /// Drop the last (delimiter, token) pair; returns false when already
    /// reduced to a single token.
    pub fn shrink(&mut self) -> bool {
        if self.segments.len() <= 1 {
            return false;
        }
        self.segments.pop();
        true
    }

    /// Whether no delimiter is left.
    pub fn is_single(&self) -> bool {
        self.segments.len() == 1
    }

    /// The first token of the reference.
    pub fn leading_token(&self) -> &str {
        &self.segments[0].text
    }
}

/// The fallback candidate a repo receives when no probe succeeds: its own
/// baseline, rewritten to share the requested ref's root segment.
///
/// When the baseline has no `/` (nothing to substitute into) or the
/// requested ref has no root, the baseline is kept unchanged. An `origin/`
/// prefix on the requested ref is stripped before taking its root and
/// re-added to the rewritten default.
fn default_candidate(requested: &str, baseline: &str) -> String {
    let (stripped, from_origin) = match requested.strip_prefix("origin/") {
        Some(rest) => (rest, true),
        None => (requested, false),
    };
    let requested_root = match stripped.rsplit_once('/') {
        Some((root, _)) => root,
        None => return baseline.to_string(),
    };
    match baseline.rsplit_once('/') {
        Some((_, leaf)) => {
            if from_origin {
                format!("origin/{}/{}", requested_root, leaf)
            } else {
                format!("{}/{}", requested_root, leaf)
            }
        }
        None => baseline.to_string(),
    }
}

/// Longest-prefix-match search core. `probe_round` reports which of the
/// still-unresolved repos match the current candidate.
fn lpm_search<F>(repos: &[Repo], requested: &str, mut probe_round: F) -> Result<BTreeMap<String, String>>
where
    F: FnMut(&[&Repo], &str) -> Result<Vec<String>>,
{
    let mut resolved: BTreeMap<String, String> = BTreeMap::new();
    let mut unresolved: Vec<&Repo> = repos.iter().collect();
    let mut parts = RefParts::parse(requested);

    let mut record = |matched: Vec<String>, candidate: &str, unresolved: &mut Vec<&Repo>| {
        if matched.is_empty() {
            return;
        }
        unresolved.retain(|repo| !matched.contains(&repo.dest));
        for dest in matched {
            resolved.insert(dest, candidate.to_string());
        }
    };

    loop {
        if unresolved.is_empty() {
            break;
        }
        let candidate = parts.join();
        if candidate.is_empty() {
            break;
        }
        debug!("Probing candidate '{}' in {} repo(s)", candidate, unresolved.len());
        let matched = probe_round(&unresolved, &candidate)?;
        record(matched, &candidate, &mut unresolved);
        if unresolved.is_empty() {
            break;
        }

        if parts.is_single() {
            let token = parts.leading_token();
            if !RESERVED_ROOTS.contains(&token) {
                // A bare release-line name conventionally carries a
                // development branch underneath it; tried at most once.
                let fallback = format!("{}/develop", token);
                debug!("Probing develop fallback '{}'", fallback);
                let matched = probe_round(&unresolved, &fallback)?;
                record(matched, &fallback, &mut unresolved);
            }
            break;
        }
        parts.shrink();
    }

    for repo in unresolved {
        resolved.insert(repo.dest.clone(), default_candidate(requested, &repo.baseline_ref));
    }
    Ok(resolved)
}

/// Longest-prefix-match against each repo's local refs.
pub fn lpm_local(
    probe: &dyn RefProbe,
    repos: &[Repo],
    requested: &str,
    check_origin: bool,
) -> Result<BTreeMap<String, String>> {
    lpm_search(repos, requested, |unresolved, candidate| {
        let dests: Vec<String> = unresolved.iter().map(|r| r.dest.clone()).collect();
        probe.repos_with_local_ref(&dests, candidate, check_origin)
    })
}

/// Longest-prefix-match against each repo's own remote; different repos may
/// succeed on different rounds.
pub fn lpm_remote(
    probe: &dyn RefProbe,
    server: &str,
    repos: &[Repo],
    requested: &str,
) -> Result<BTreeMap<String, String>> {
    lpm_search(repos, requested, |unresolved, candidate| {
        let mut matched = Vec::new();
        for repo in unresolved {
            if probe.remote_has_ref(&repo.clone_url(server), candidate)? {
                matched.push(repo.dest.clone());
            }
        }
        Ok(matched)
    })
}

/// Resolve a requested ref for a set of repos.
///
/// Returns the target repos and, positionally aligned, the reference each
/// one should use: the exact-tag subset with the literal name when the ref
/// is a tag somewhere, otherwise every repo with its longest-prefix match
/// (or baseline fallback). When the ref is neither a tag nor a branch
/// anywhere and `allow_force` is off, resolution fails before any dispatch.
pub fn resolve_tag_or_branch(
    probe: &dyn RefProbe,
    repos: &[Repo],
    reference: &str,
    allow_force: bool,
    check_origin: bool,
) -> Result<(Vec<String>, Vec<String>)> {
    let dests = Repo::clone_paths(repos);

    let tagged = probe.repos_with_tag(&dests, reference)?;
    if !tagged.is_empty() {
        debug!("'{}' is a tag in {} repo(s)", reference, tagged.len());
        let refs = vec![reference.to_string(); tagged.len()];
        return Ok((tagged, refs));
    }

    let branched = probe.repos_with_branch(&dests, reference, check_origin)?;
    if branched.is_empty() && !allow_force {
        return Err(Error::UnresolvableReference {
            reference: reference.to_string(),
        });
    }

    let map = lpm_local(probe, repos, reference, check_origin)?;
    let resolved = dests.iter().map(|dest| map[dest].clone()).collect();
    Ok((dests, resolved))
}

/// Resolve `reference` and dispatch `cmd` with the per-repo resolved ref as
/// its single placeholder column.
pub fn run_command_for_ref(
    ctx: &ExecContext,
    repos: &[Repo],
    cmd: &GitCommand,
    reference: &str,
    check_origin: bool,
    allow_force: bool,
) -> Result<bool> {
    let probe = GitRefProbe::new(ctx);
    let (targets, refs) = resolve_tag_or_branch(&probe, repos, reference, allow_force, check_origin)?;
    executor::run_in_repos(ctx, &targets, cmd, &[refs], DispatchOptions::default())
}
