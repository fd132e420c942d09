//! # Multigit Library
//!
//! This library provides the core functionality for operating on multiple
//! git repositories together as one logical workspace. It is designed to be
//! used by the `mgit` command-line tool but can also be integrated into
//! other applications that need uniform multi-repository git dispatch.
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Registry (`repo`, `config`)**: The workspace schema names every
//!   managed repository - its clone path, its URL suffix against the
//!   configured server root, and the baseline reference it was pinned to.
//!   A selection filter narrows the ordered list per invocation.
//! - **Command Templates (`command`)**: A structured git command - verb plus
//!   literal and placeholder arguments - rendered directly to one process
//!   argument vector per repository, with the template/column arity checked
//!   before anything is spawned.
//! - **Concurrent Executor (`executor`)**: Fans a command template out
//!   across the repositories on a bounded worker pool, captures each git
//!   process's exit code and output, and folds the outcomes into either a
//!   single boolean (with live status lines and a timing table) or a
//!   structured per-repo result map.
//! - **Reference Resolver (`resolver`)**: Turns one requested branch/tag
//!   name into a per-repo reference map: exact tags scope the operation to
//!   the repos that have them; branch names are longest-prefix matched per
//!   repo with a deterministic baseline fallback.
//!
//! ## Execution Flow
//!
//! A subcommand obtains its repositories from the registry, builds a
//! command template, and - when the command is ref-sensitive - asks the
//! resolver for a per-repo reference column. It then hands template and
//! argument columns to the executor, which is the only component that
//! touches the process boundary.

pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod output;
pub mod repo;
pub mod resolver;
