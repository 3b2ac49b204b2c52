//! 変更をコミットしてプッシュ
//!
//! 同じブランチに並行してプッシュするジョブがあるため、プッシュが
//! 拒否されたら `pull --rebase` してから再試行する。

use crate::git::Git;
use anyhow::bail;
use colored::Colorize;

pub const MAX_PUSH_ATTEMPTS: u32 = 3;
pub const BOT_NAME: &str = "github-actions[bot]";
pub const BOT_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

pub async fn handle(git: &Git, message: &str, paths: &[String], all: bool) -> anyhow::Result<()> {
    git.run(&["config", "user.name", BOT_NAME]).await?;
    git.run(&["config", "user.email", BOT_EMAIL]).await?;

    if all {
        git.run(&["add", "-A"]).await?;
    } else {
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        git.run(&args).await?;
    }

    if !git.has_staged_changes().await? {
        println!("No changes to commit");
        return Ok(());
    }

    git.run(&["commit", "-m", message]).await?;
    push_with_rebase(git, MAX_PUSH_ATTEMPTS).await?;

    println!("{}", "✓ Pushed".green());
    Ok(())
}

/// プッシュし、失敗したら rebase して再試行する
pub async fn push_with_rebase(git: &Git, max_attempts: u32) -> anyhow::Result<()> {
    for attempt in 1..=max_attempts {
        if git.succeeds(&["push"]).await? {
            return Ok(());
        }

        println!(
            "{}",
            format!("⚠ Push failed (attempt {}/{})", attempt, max_attempts).yellow()
        );

        // 最後の試行でなければ取り込んでやり直す
        if attempt < max_attempts {
            git.run(&["pull", "--rebase", "origin", "main"]).await?;
        }
    }

    bail!("{} 回試行してもプッシュできませんでした", max_attempts)
}
