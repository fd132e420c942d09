//! End-to-end tests for the `init` command

mod common;
use common::prelude::*;

/// init creates every clone path and an empty repository inside it
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_init_creates_repositories() {
    let fixture = TestFixture::new()
        .with_config()
        .with_schema(common::schemas::TWO_REPOS);
    fixture.mgit(&["init"]).assert().success();

    fixture.temp.child("core/.git").assert(predicate::path::is_dir());
    fixture.temp.child("tools/.git").assert(predicate::path::is_dir());
}

/// init prints a status line per repo and the timing table
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_init_reports_per_repo_status() {
    let fixture = TestFixture::new()
        .with_config()
        .with_schema(common::schemas::TWO_REPOS);
    fixture
        .mgit(&["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[  OK  ]").count(2))
        .stdout(predicate::str::contains("Thread"))
        .stdout(predicate::str::contains("Total Time (s)"));
}

/// --quiet suppresses the status lines but not the timing table
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_init_quiet_suppresses_status_lines() {
    let fixture = TestFixture::new()
        .with_config()
        .with_schema(common::schemas::TWO_REPOS);
    fixture
        .mgit(&["--quiet", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[  OK  ]").not())
        .stdout(predicate::str::contains("Thread"));
}

/// DEBUG echoes each dispatched command even under --quiet
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_init_debug_echoes_commands() {
    let fixture = TestFixture::new()
        .with_config()
        .with_schema(common::schemas::TWO_REPOS);
    fixture
        .mgit(&["--quiet", "init"])
        .env("DEBUG", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("git init -q"));
}
