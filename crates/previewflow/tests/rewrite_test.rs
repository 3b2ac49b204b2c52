mod common;

use common::TestProject;
use predicates::prelude::*;
use std::fs;

/// compose を書き換えて一時スタックを作る一連の流れ
#[test]
fn test_rewrite_creates_preview_stack() {
    let project = TestProject::new();
    let output = project.output_path();

    project
        .cmd()
        .args(["rewrite", "--app-path"])
        .arg(project.app_path())
        .args(["--tag", "abc123", "--pr-number", "42", "--repo-owner", "acme"])
        .arg("--output-file")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("URL: https://pr-42-shop.example.com"))
        .stdout(predicate::str::contains("--- docker-compose.yml ---"))
        .stdout(predicate::str::contains("ghcr.io/acme/shop:abc123"));

    let temp = project.temp_path(42);
    let manifest = project.read(temp.join("docker-compose.yml"));

    assert!(manifest.contains("image: ghcr.io/acme/shop:abc123"));
    assert!(manifest.contains("image: postgres:16"));
    assert!(manifest.contains("Host(`pr-42-shop.example.com`)"));
    assert!(manifest.contains("traefik.http.routers.shop-pr-42.rule"));
    assert!(manifest.contains("traefik.http.services.shop-pr-42.loadbalancer"));
    assert!(!manifest.contains("Host(`shop.example.com`)"));
    assert!(manifest.contains("uploads:/app/uploads"));
    assert!(manifest.contains("pgdata:/var/lib/postgresql/data"));
    assert!(manifest.contains("./config:/app/config:ro"));
    assert!(!manifest.contains("/srv/shop"));
    assert!(manifest.contains("external: true"));

    // 元のディレクトリは変更されない
    let original = project.read(project.app_path().join("docker-compose.yml"));
    assert_eq!(original, common::COMPOSE);

    // 付随ファイルも複製される
    assert!(temp.join("config").join("app.toml").is_file());
    assert_eq!(
        project.read(temp.join("docker-cd.yml")),
        "rolling_update: false\n"
    );

    let outputs = project.read(&output);
    assert_eq!(
        outputs,
        format!(
            "url=https://pr-42-shop.example.com\ntemp-path={}\n",
            temp.display()
        )
    );
}

/// GITHUB_OUTPUT からも出力先を受け取る
#[test]
fn test_rewrite_output_file_from_env() {
    let project = TestProject::new();
    let output = project.output_path();
    fs::write(&output, "existing=1\n").unwrap();

    project
        .cmd()
        .env("GITHUB_OUTPUT", &output)
        .args(["rewrite", "--app-path"])
        .arg(project.app_path())
        .args(["--tag", "abc123", "--pr-number", "7", "--repo-owner", "acme"])
        .assert()
        .success();

    let outputs = project.read(&output);
    assert!(outputs.starts_with("existing=1\nurl=https://pr-7-shop.example.com\n"));
}

/// ルーティングのドメインが見つからなければ失敗し、何も書き出さない
#[test]
fn test_rewrite_without_host_rule_fails() {
    let project = TestProject::with_compose(
        "services:\n  web:\n    image: ghcr.io/acme/shop:v1\n    labels:\n      - traefik.enable=true\n",
    );
    let output = project.output_path();

    project
        .cmd()
        .args(["rewrite", "--app-path"])
        .arg(project.app_path())
        .args(["--tag", "abc123", "--pr-number", "42", "--repo-owner", "acme"])
        .arg("--output-file")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Host("));

    let temp = project.temp_path(42);
    assert!(!temp.join("docker-cd.yml").exists());
    assert!(!output.exists());
    // compose は複製されたまま書き換えられていない
    assert_eq!(
        project.read(temp.join("docker-compose.yml")),
        project.read(project.app_path().join("docker-compose.yml"))
    );
}

#[test]
fn test_rewrite_missing_app_dir_fails() {
    let project = TestProject::new();

    project
        .cmd()
        .args(["rewrite", "--app-path"])
        .arg(project.root.path().join("apps").join("missing"))
        .args(["--tag", "abc123", "--pr-number", "42", "--repo-owner", "acme"])
        .assert()
        .failure();

    assert!(!project.root.path().join("apps").join("missing-pr-42").exists());
}

/// シークレット上書きファイルはコピーされ、env_file の最後に追加される
#[test]
fn test_rewrite_with_secrets_override() {
    let project = TestProject::new();
    let app_repo = project.root.path().join("shop-repo");
    fs::create_dir_all(&app_repo).unwrap();
    fs::write(app_repo.join(".enc-temp.env"), "SECRET=preview\n").unwrap();

    project
        .cmd()
        .args(["rewrite", "--app-path"])
        .arg(project.app_path())
        .args(["--tag", "abc123", "--pr-number", "42", "--repo-owner", "acme"])
        .arg("--app-repo-path")
        .arg(&app_repo)
        .assert()
        .success();

    let temp = project.temp_path(42);
    assert_eq!(project.read(temp.join(".enc-temp.env")), "SECRET=preview\n");

    let manifest = project.read(temp.join("docker-compose.yml"));
    let enc = manifest.find("- .enc.env").unwrap();
    let temp_env = manifest.find("- .enc-temp.env").unwrap();
    assert!(enc < temp_env);
}

#[test]
fn test_rewrite_without_secrets_override_file() {
    let project = TestProject::new();
    let app_repo = project.root.path().join("shop-repo");
    fs::create_dir_all(&app_repo).unwrap();

    project
        .cmd()
        .args(["rewrite", "--app-path"])
        .arg(project.app_path())
        .args(["--tag", "abc123", "--pr-number", "42", "--repo-owner", "acme"])
        .arg("--app-repo-path")
        .arg(&app_repo)
        .assert()
        .success();

    let temp = project.temp_path(42);
    assert!(!temp.join(".enc-temp.env").exists());
    assert!(!project
        .read(temp.join("docker-compose.yml"))
        .contains(".enc-temp.env"));
}

/// 二度実行しても前回の一時スタックを作り直すだけ
#[test]
fn test_rewrite_is_repeatable() {
    let project = TestProject::new();
    let run = |tag: &str| {
        project
            .cmd()
            .args(["rewrite", "--app-path"])
            .arg(project.app_path())
            .args(["--tag", tag, "--pr-number", "42", "--repo-owner", "acme"])
            .assert()
            .success();
        project.read(project.temp_path(42).join("docker-compose.yml"))
    };

    let first = run("abc123");
    fs::write(project.temp_path(42).join("stale.txt"), "x").unwrap();
    let second = run("abc123");

    assert_eq!(first, second);
    assert!(!project.temp_path(42).join("stale.txt").exists());
}
