#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn git(dir: &Path, args: &[&str]) -> bool {
    std::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .status()
        .is_ok_and(|s| s.success())
}

fn previewflow(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("previewflow").unwrap();
    cmd.current_dir(dir);
    cmd
}

/// ステージするものがなければコミットもプッシュもしない
#[test]
fn test_git_push_no_changes() {
    let repo = tempfile::tempdir().unwrap();
    if !git(repo.path(), &["init", "-b", "main"]) {
        // git が使えない環境
        return;
    }

    previewflow(repo.path())
        .args(["git-push", "--message", "nothing", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$ git add -A"))
        .stdout(predicate::str::contains("No changes to commit"))
        .stdout(predicate::str::contains("git push").not());
}

/// 存在しないパスのステージは失敗として扱う
#[test]
fn test_git_push_unknown_path_fails() {
    let repo = tempfile::tempdir().unwrap();
    if !git(repo.path(), &["init", "-b", "main"]) {
        return;
    }

    previewflow(repo.path())
        .args(["git-push", "--message", "update", "--paths", "no-such-file.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("git add"));
}

/// プッシュ失敗後の rebase も失敗したらそこで打ち切る
#[test]
fn test_git_push_without_remote_fails() {
    let repo = tempfile::tempdir().unwrap();
    if !git(repo.path(), &["init", "-b", "main"]) {
        return;
    }
    std::fs::write(repo.path().join("app.yml"), "image: x\n").unwrap();

    previewflow(repo.path())
        .args(["git-push", "--message", "update", "--paths", "app.yml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Push failed (attempt 1/3)"))
        .stderr(predicate::str::contains("git pull --rebase origin main"));
}
