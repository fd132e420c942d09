//! Shared test utilities for the E2E tests.
//!
//! This module provides a workspace fixture and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_config().with_schema(common::schemas::TWO_REPOS);
//!     fixture.mgit(&["list"]).assert().success();
//! }
//! ```

use std::path::Path;
use std::process::Command;

use assert_fs::prelude::*;
use assert_fs::TempDir;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::schemas;
    pub use super::TestFixture;
}

/// Common schema YAML snippets for testing.
#[allow(dead_code)]
pub mod schemas {
    /// Two repositories in one product.
    pub const TWO_REPOS: &str = r#"
- product: platform
  repos:
    - repo: platform/core.git
      path: core
      ref: main
    - repo: platform/tools.git
      path: tools
      ref: main
"#;

    /// Two products, three repositories, mixed baselines.
    pub const TWO_PRODUCTS: &str = r#"
- product: platform
  repos:
    - repo: platform/core.git
      path: core
      ref: release/1.0/develop
    - repo: platform/tools.git
      path: tools
      ref: next/develop
- product: apps
  repos:
    - repo: apps/frontend.git
      path: apps/frontend
      ref: main
"#;
}

/// A scratch workspace with an `mgit.yaml`, a schema file, and optionally
/// real git repositories at the schema's clone paths.
pub struct TestFixture {
    pub temp: TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write an `mgit.yaml` with a server root inside the fixture.
    pub fn with_config(self) -> Self {
        let server = format!("{}/remotes/", self.temp.path().display());
        self.temp
            .child("mgit.yaml")
            .write_str(&format!("server: {}\n", server))
            .unwrap();
        self
    }

    /// Write the workspace schema.
    pub fn with_schema(self, schema: &str) -> Self {
        self.temp
            .child(".multigit/schema.yaml")
            .write_str(schema)
            .unwrap();
        self
    }

    /// Initialize a real git repository with one commit at `dest`.
    pub fn with_git_repo(self, dest: &str) -> Self {
        let dir = self.temp.child(dest);
        dir.create_dir_all().unwrap();
        git(dir.path(), &["init", "-q", "-b", "main"]);
        dir.child("README.md").write_str("test repo\n").unwrap();
        git(dir.path(), &["add", "."]);
        git(
            dir.path(),
            &[
                "-c",
                "user.email=mgit-tests@example.com",
                "-c",
                "user.name=mgit tests",
                "commit",
                "-q",
                "-m",
                "initial",
            ],
        );
        self
    }

    /// Create a branch in the repository at `dest`.
    pub fn with_branch(self, dest: &str, branch: &str) -> Self {
        git(self.temp.child(dest).path(), &["branch", branch]);
        self
    }

    /// Create a tag in the repository at `dest`.
    pub fn with_tag(self, dest: &str, tag: &str) -> Self {
        git(self.temp.child(dest).path(), &["tag", tag]);
        self
    }

    /// Create a bare remote at `remotes/<suffix>` carrying `main` plus the
    /// given branches, so local-path clones can resolve against it.
    pub fn with_remote(self, suffix: &str, branches: &[&str]) -> Self {
        let work = self.temp.child(format!(".work-{}", suffix.replace('/', "-")));
        work.create_dir_all().unwrap();
        git(work.path(), &["init", "-q", "-b", "main"]);
        work.child("README.md").write_str("remote repo\n").unwrap();
        git(work.path(), &["add", "."]);
        git(
            work.path(),
            &[
                "-c",
                "user.email=mgit-tests@example.com",
                "-c",
                "user.name=mgit tests",
                "commit",
                "-q",
                "-m",
                "initial",
            ],
        );
        for branch in branches {
            git(work.path(), &["branch", branch]);
        }
        let bare = self.temp.child(format!("remotes/{}", suffix));
        if let Some(parent) = bare.path().parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        git(
            self.temp.path(),
            &[
                "clone",
                "-q",
                "--bare",
                work.path().to_str().unwrap(),
                bare.path().to_str().unwrap(),
            ],
        );
        self
    }

    /// An `mgit` command with the fixture as its working directory.
    pub fn mgit(&self, args: &[&str]) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("mgit").unwrap();
        cmd.current_dir(self.temp.path()).env("NO_COLOR", "1");
        for arg in args {
            cmd.arg(arg);
        }
        cmd
    }
}

/// Run a git command in `dir`, panicking on failure.
#[allow(dead_code)]
fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}
