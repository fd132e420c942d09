//! # Structured Git Command Templates
//!
//! A `GitCommand` is the template for one git invocation fanned out across a
//! set of repositories: a subcommand verb followed by an ordered list of
//! arguments, each either a literal string or a positional placeholder to be
//! filled from a per-repo argument column at dispatch time.
//!
//! The template is rendered directly to a process argument vector, so there
//! is no shell string and no quoting step anywhere between the caller and
//! `std::process::Command`.
//!
//! ## Arity Contract
//!
//! Binding K argument columns requires the template to carry exactly K
//! placeholders, and every column must have one value per target repository.
//! A violation is a construction error (`Error::TemplateArity`) raised
//! before any process is spawned.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Literal(String),
    Placeholder,
    /// A placeholder whose column value is a whitespace-separated list,
    /// rendered as one argument per element. Git ref names cannot contain
    /// whitespace, so the encoding is unambiguous.
    PlaceholderList,
}

/// A git command template with positional placeholders.
#[derive(Debug, Clone)]
pub struct GitCommand {
    args: Vec<Arg>,
}

impl GitCommand {
    /// Start a template for the given git subcommand (`clone`, `branch`, ...).
    pub fn new(subcommand: &str) -> Self {
        Self {
            args: vec![Arg::Literal(subcommand.to_string())],
        }
    }

    /// Append a literal argument.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(Arg::Literal(value.into()));
        self
    }

    /// Append several literal arguments.
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.args.push(Arg::Literal(value.into()));
        }
        self
    }

    /// Append a positional placeholder, filled per repo from the next
    /// argument column at render time.
    pub fn placeholder(mut self) -> Self {
        self.args.push(Arg::Placeholder);
        self
    }

    /// Append a positional placeholder that expands a whitespace-separated
    /// column value into one argument per element.
    pub fn placeholder_list(mut self) -> Self {
        self.args.push(Arg::PlaceholderList);
        self
    }

    /// Build a template from a user-supplied command string, split on
    /// whitespace. A leading `git` token is stripped so both
    /// `"git diff --quiet"` and `"diff --quiet"` are accepted.
    pub fn from_cli_str(command: &str) -> Result<Self> {
        let mut tokens = command.split_whitespace().peekable();
        if tokens.peek() == Some(&"git") {
            tokens.next();
        }
        let verb = tokens.next().ok_or_else(|| Error::TemplateArity {
            message: format!("empty command string: '{}'", command),
        })?;
        Ok(Self::new(verb).args(tokens))
    }

    /// Number of placeholders this template consumes.
    pub fn placeholders(&self) -> usize {
        self.args
            .iter()
            .filter(|a| matches!(a, Arg::Placeholder | Arg::PlaceholderList))
            .count()
    }

    /// Render one argument vector per repository, substituting each repo's
    /// argument tuple into the placeholders in positional order.
    ///
    /// Fails with `Error::TemplateArity` when the number of columns does not
    /// equal the number of placeholders, or any column's length differs from
    /// `repo_count`.
    pub fn render_for_repos(
        &self,
        repo_count: usize,
        columns: &[Vec<String>],
    ) -> Result<Vec<Vec<String>>> {
        if columns.len() != self.placeholders() {
            return Err(Error::TemplateArity {
                message: format!(
                    "template '{}' has {} placeholder(s) but {} argument column(s) were supplied",
                    self.display(),
                    self.placeholders(),
                    columns.len()
                ),
            });
        }
        for (index, column) in columns.iter().enumerate() {
            if column.len() != repo_count {
                return Err(Error::TemplateArity {
                    message: format!(
                        "argument column {} has {} value(s) for {} target repo(s)",
                        index,
                        column.len(),
                        repo_count
                    ),
                });
            }
        }

        let mut rendered = Vec::with_capacity(repo_count);
        for repo_index in 0..repo_count {
            let mut column_index = 0;
            let mut argv = Vec::with_capacity(self.args.len());
            for arg in &self.args {
                match arg {
                    Arg::Literal(value) => argv.push(value.clone()),
                    Arg::Placeholder => {
                        argv.push(columns[column_index][repo_index].clone());
                        column_index += 1;
                    }
                    Arg::PlaceholderList => {
                        argv.extend(
                            columns[column_index][repo_index]
                                .split_whitespace()
                                .map(str::to_string),
                        );
                        column_index += 1;
                    }
                }
            }
            rendered.push(argv);
        }
        Ok(rendered)
    }

    /// Human-readable form of the template, placeholders shown as `{}`.
    pub fn display(&self) -> String {
        let mut out = String::from("git");
        for arg in &self.args {
            out.push(' ');
            match arg {
                Arg::Literal(value) => out.push_str(value),
                Arg::Placeholder => out.push_str("{}"),
                Arg::PlaceholderList => out.push_str("{*}"),
            }
        }
        out
    }
}
