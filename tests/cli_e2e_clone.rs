//! End-to-end tests for the `clone` command against local bare remotes

use std::process::Command;

mod common;
use common::prelude::*;

fn current_branch(fixture: &TestFixture, dest: &str) -> String {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(fixture.temp.child(dest).path())
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Without --branch every repo is cloned at its schema baseline
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_clone_uses_baseline_refs() {
    let fixture = TestFixture::new()
        .with_config()
        .with_schema(common::schemas::TWO_REPOS)
        .with_remote("platform/core.git", &[])
        .with_remote("platform/tools.git", &[]);
    fixture.mgit(&["clone"]).assert().success();

    fixture.temp.child("core/.git").assert(predicate::path::is_dir());
    fixture.temp.child("tools/.git").assert(predicate::path::is_dir());
    assert_eq!(current_branch(&fixture, "core"), "main");
    assert_eq!(current_branch(&fixture, "tools"), "main");
}

/// --branch resolves per remote: each repo gets the longest prefix its own
/// remote has, or its baseline when nothing matches
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_clone_branch_resolved_per_remote() {
    let fixture = TestFixture::new()
        .with_config()
        .with_schema(common::schemas::TWO_REPOS)
        .with_remote("platform/core.git", &["release/2.0"])
        .with_remote("platform/tools.git", &[]);
    fixture
        .mgit(&["clone", "--branch", "release/2.0/hotfix"])
        .assert()
        .success();

    assert_eq!(current_branch(&fixture, "core"), "release/2.0");
    assert_eq!(current_branch(&fixture, "tools"), "main");
}

/// --missing clones only the repos absent from disk
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_clone_missing_skips_existing() {
    let fixture = TestFixture::new()
        .with_config()
        .with_schema(common::schemas::TWO_REPOS)
        .with_remote("platform/core.git", &[])
        .with_remote("platform/tools.git", &[])
        .with_git_repo("core");
    fixture.mgit(&["clone", "--missing"]).assert().success();

    // `tools` was cloned, `core` kept its local-only repository.
    fixture.temp.child("tools/.git").assert(predicate::path::is_dir());
    let origin = Command::new("git")
        .args(["config", "remote.origin.url"])
        .current_dir(fixture.temp.child("core").path())
        .output()
        .unwrap();
    assert!(!origin.status.success());
}
