//! git コマンドのラッパー

use anyhow::{Context, bail};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// git CLI ラッパー
#[derive(Debug, Clone, Default)]
pub struct Git {
    /// 作業ディレクトリ（None ならカレント）
    work_dir: Option<PathBuf>,
}

impl Git {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: Some(dir.into()),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        cmd.args(args);
        cmd
    }

    /// コマンドを実行し、失敗したらエラーにする
    pub async fn run(&self, args: &[&str]) -> anyhow::Result<()> {
        println!("$ git {}", args.join(" "));
        tracing::debug!("Running: git {}", args.join(" "));

        let status = self
            .command(args)
            .status()
            .await
            .context("git を実行できません")?;
        if !status.success() {
            bail!("git {} が失敗しました ({})", args.join(" "), status);
        }
        Ok(())
    }

    /// コマンドを実行し、成功したかどうかだけを返す
    pub async fn succeeds(&self, args: &[&str]) -> anyhow::Result<bool> {
        println!("$ git {}", args.join(" "));

        let status = self
            .command(args)
            .status()
            .await
            .context("git を実行できません")?;
        if !status.success() {
            tracing::warn!("git {} exited with {}", args.join(" "), status);
        }
        Ok(status.success())
    }

    /// ステージ済みの変更があるか
    pub async fn has_staged_changes(&self) -> anyhow::Result<bool> {
        let status = self
            .command(&["diff", "--staged", "--quiet"])
            .stdout(Stdio::null())
            .status()
            .await
            .context("git を実行できません")?;
        // --quiet は差分があると 1 で終わる
        Ok(!status.success())
    }
}
