//! 統合テスト用のヘルパー

#![allow(dead_code)]
#![allow(deprecated)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const COMPOSE: &str = r#"services:
  web:
    image: ghcr.io/acme/shop:v1
    env_file:
      - .enc.env
    labels:
      - traefik.enable=true
      - traefik.http.routers.shop.rule=Host(`shop.example.com`)
      - traefik.http.services.shop.loadbalancer.server.port=3000
    volumes:
      - /srv/shop/uploads:/app/uploads
      - ./config:/app/config:ro
  db:
    image: postgres:16
    volumes:
      - /srv/shop/pgdata:/var/lib/postgresql/data
networks:
  proxy:
    external: true
"#;

/// デプロイディレクトリ `<root>/apps/shop` を持つテスト用プロジェクト
pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self::with_compose(COMPOSE)
    }

    pub fn with_compose(compose: &str) -> Self {
        let root = tempfile::tempdir().unwrap();
        let app = root.path().join("apps").join("shop");
        fs::create_dir_all(app.join("config")).unwrap();
        fs::write(app.join("docker-compose.yml"), compose).unwrap();
        fs::write(app.join(".enc.env"), "SECRET=prod\n").unwrap();
        fs::write(app.join("config").join("app.toml"), "mode = \"prod\"\n").unwrap();
        Self { root }
    }

    pub fn app_path(&self) -> PathBuf {
        self.root.path().join("apps").join("shop")
    }

    pub fn temp_path(&self, pr: u64) -> PathBuf {
        self.root.path().join("apps").join(format!("shop-pr-{}", pr))
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.path().join("github_output")
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).unwrap()
    }

    /// 環境の GITHUB_* に左右されない previewflow コマンド
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("previewflow").unwrap();
        cmd.current_dir(self.root.path())
            .env_remove("GITHUB_OUTPUT")
            .env_remove("GITHUB_TOKEN")
            .env_remove("GITHUB_API_URL");
        cmd
    }
}
