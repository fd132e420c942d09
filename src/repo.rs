//! # Repository Registry
//!
//! The workspace schema describes, per product, the repositories that make
//! up the logical workspace: where each one is cloned (`path`), the URL
//! suffix it is fetched from (`repo`), and the reference it was pinned to
//! (`ref`). This module parses that schema and turns the selected entries
//! into immutable [`Repo`] descriptors for the rest of the tool.
//!
//! A selection filter (by product, by clone path, or by URL suffix) narrows
//! the ordered repository list before it reaches the executor or resolver.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use std::collections::HashSet;

use crate::error::{Error, Result};

/// One repository entry as written in the schema YAML.
///
/// The optional keys `enable_submodule`, `lfs_fetch` and `skip_build` are
/// presence flags: any value, including null, turns them on.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    /// URL suffix appended to the configured server root.
    pub repo: String,
    /// Clone path relative to the workspace root.
    pub path: String,
    /// Pinned baseline reference (branch or tag).
    pub r#ref: String,
    #[serde(default)]
    pub symlink: Option<String>,
    #[serde(default)]
    pub enable_submodule: Option<serde_yaml::Value>,
    #[serde(default)]
    pub lfs_fetch: Option<serde_yaml::Value>,
    #[serde(default)]
    pub gitrefs_path: Option<String>,
    #[serde(default)]
    pub skip_build: Option<serde_yaml::Value>,
    #[serde(default)]
    pub config_file_repo: Option<String>,
}

/// One product block: a name and its repositories.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub product: String,
    pub repos: Vec<RepoEntry>,
}

/// The whole schema: an ordered list of products.
pub type SchemaData = Vec<Product>;

/// One managed repository, constructed once per invocation from schema data
/// and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Repo {
    /// Unique relative clone path; also the key for per-repo results.
    pub dest: String,
    /// URL suffix appended to the server root to form the clone URL.
    pub url: String,
    /// The reference this repo was pinned to by the schema.
    pub baseline_ref: String,
    pub has_submodules: bool,
    pub fetch_lfs: bool,
    pub symlink_target: Option<String>,
    pub gitrefs_path: Option<String>,
    pub skip_build: bool,
    pub config_file_repo: Option<String>,
}

impl Repo {
    fn from_entry(entry: &RepoEntry) -> Self {
        Self {
            dest: entry.path.clone(),
            url: entry.repo.clone(),
            baseline_ref: entry.r#ref.clone(),
            has_submodules: entry.enable_submodule.is_some(),
            fetch_lfs: entry.lfs_fetch.is_some(),
            symlink_target: entry.symlink.clone(),
            gitrefs_path: entry.gitrefs_path.clone(),
            skip_build: entry.skip_build.is_some(),
            config_file_repo: entry.config_file_repo.clone(),
        }
    }

    /// Full clone URL for this repo against a server root.
    pub fn clone_url(&self, server: &str) -> String {
        format!("{}{}", server, self.url)
    }

    /// The clone paths of a repo set, in order.
    pub fn clone_paths(repos: &[Repo]) -> Vec<String> {
        repos.iter().map(|r| r.dest.clone()).collect()
    }
}

/// Narrowing filter applied to the schema before the core sees the repos.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Keep only repos belonging to these products (empty keeps all).
    pub products: Vec<String>,
    /// Keep only repos with these clone paths.
    pub repos: Vec<String>,
    /// Keep only repos with these URL suffixes.
    pub repo_urls: Vec<String>,
}

impl Selection {
    fn keeps_product(&self, product: &str) -> bool {
        self.products.is_empty() || self.products.iter().any(|p| p == product)
    }

    fn keeps_repo(&self, entry: &RepoEntry) -> bool {
        if self.repos.is_empty() && self.repo_urls.is_empty() {
            return true;
        }
        self.repos.iter().any(|p| p == &entry.path)
            || self.repo_urls.iter().any(|u| u == &entry.repo)
    }
}

/// Parse schema YAML.
pub fn parse_schema(content: &str) -> Result<SchemaData> {
    serde_yaml::from_str(content).map_err(|e| Error::Schema {
        message: e.to_string(),
    })
}

/// Load and parse a schema file.
pub fn schema_from_file(path: &Path) -> Result<SchemaData> {
    let content = fs::read_to_string(path).map_err(|e| Error::Schema {
        message: format!("unable to read {}: {}", path.display(), e),
    })?;
    parse_schema(&content)
}

/// Apply a selection filter and build the ordered descriptor list.
///
/// Fails when two selected entries share a clone path: the executor keys
/// results by `dest`, so duplicates would silently collapse.
pub fn select(schema: &SchemaData, selection: &Selection) -> Result<Vec<Repo>> {
    let mut repos = Vec::new();
    let mut seen = HashSet::new();
    for product in schema {
        if !selection.keeps_product(&product.product) {
            continue;
        }
        for entry in &product.repos {
            if !selection.keeps_repo(entry) {
                continue;
            }
            if !seen.insert(entry.path.clone()) {
                return Err(Error::Schema {
                    message: format!("duplicate clone path '{}'", entry.path),
                });
            }
            repos.push(Repo::from_entry(entry));
        }
    }
    Ok(repos)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
- product: platform
  repos:
    - repo: platform/core.git
      path: core
      ref: release/1.0/develop
    - repo: platform/tools.git
      path: tools
      ref: next/develop
      enable_submodule:
      skip_build:
- product: apps
  repos:
    - repo: apps/frontend.git
      path: apps/frontend
      ref: main
      lfs_fetch: true
      symlink: links/frontend
      gitrefs_path: refs/apps
"#;

    #[test]
    fn test_parse_schema_entries() {
        let schema = parse_schema(SCHEMA).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0].product, "platform");
        assert_eq!(schema[0].repos.len(), 2);
    }

    #[test]
    fn test_presence_flags() {
        let schema = parse_schema(SCHEMA).unwrap();
        let repos = select(&schema, &Selection::default()).unwrap();
        let tools = repos.iter().find(|r| r.dest == "tools").unwrap();
        assert!(tools.has_submodules);
        assert!(tools.skip_build);
        assert!(!tools.fetch_lfs);

        let frontend = repos.iter().find(|r| r.dest == "apps/frontend").unwrap();
        assert!(frontend.fetch_lfs);
        assert_eq!(frontend.symlink_target.as_deref(), Some("links/frontend"));
        assert_eq!(frontend.gitrefs_path.as_deref(), Some("refs/apps"));
    }

    #[test]
    fn test_select_keeps_schema_order() {
        let schema = parse_schema(SCHEMA).unwrap();
        let repos = select(&schema, &Selection::default()).unwrap();
        let dests: Vec<&str> = repos.iter().map(|r| r.dest.as_str()).collect();
        assert_eq!(dests, vec!["core", "tools", "apps/frontend"]);
    }

    #[test]
    fn test_select_by_product() {
        let schema = parse_schema(SCHEMA).unwrap();
        let selection = Selection {
            products: vec!["apps".to_string()],
            ..Default::default()
        };
        let repos = select(&schema, &selection).unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].dest, "apps/frontend");
    }

    #[test]
    fn test_select_by_path_or_url() {
        let schema = parse_schema(SCHEMA).unwrap();
        let selection = Selection {
            repos: vec!["core".to_string()],
            repo_urls: vec!["apps/frontend.git".to_string()],
            ..Default::default()
        };
        let repos = select(&schema, &selection).unwrap();
        let dests: Vec<&str> = repos.iter().map(|r| r.dest.as_str()).collect();
        assert_eq!(dests, vec!["core", "apps/frontend"]);
    }

    #[test]
    fn test_duplicate_dest_rejected() {
        let schema = parse_schema(
            r#"
- product: p
  repos:
    - { repo: a.git, path: same, ref: main }
    - { repo: b.git, path: same, ref: main }
"#,
        )
        .unwrap();
        let err = select(&schema, &Selection::default()).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn test_clone_url_concatenates_suffix() {
        let schema = parse_schema(SCHEMA).unwrap();
        let repos = select(&schema, &Selection::default()).unwrap();
        assert_eq!(
            repos[0].clone_url("ssh://git.example.com/"),
            "ssh://git.example.com/platform/core.git"
        );
    }
}
