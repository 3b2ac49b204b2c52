mod common;

use common::TestProject;
use predicates::prelude::*;

#[test]
fn test_cleanup_removes_preview_stack() {
    let project = TestProject::new();

    project
        .cmd()
        .args(["rewrite", "--app-path"])
        .arg(project.app_path())
        .args(["--tag", "abc123", "--pr-number", "42", "--repo-owner", "acme"])
        .assert()
        .success();
    assert!(project.temp_path(42).exists());

    project
        .cmd()
        .args(["cleanup", "--app-path"])
        .arg(project.app_path())
        .args(["--pr-number", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    assert!(!project.temp_path(42).exists());
    assert!(project.app_path().join("docker-compose.yml").exists());
}

/// 一時スタックがなくても成功する
#[test]
fn test_cleanup_missing_stack() {
    let project = TestProject::new();

    project
        .cmd()
        .args(["cleanup", "--app-path"])
        .arg(project.app_path())
        .args(["--pr-number", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist"));
}
