mod commands;
mod git;

use clap::{Parser, Subcommand};
use commands::Action;
use previewflow_compose::DEFAULT_REGISTRY;
use previewflow_github::GITHUB_API_BASE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "previewflow")]
#[command(about = "PR ごとの一時スタックを立てて、片付ける。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// PR 用の一時スタックを作成（compose をプレビュー用に書き換え）
    Rewrite {
        /// 元アプリのデプロイディレクトリ（compose ファイルを含む）
        #[arg(long)]
        app_path: PathBuf,
        /// 差し替えるイメージタグ
        #[arg(long)]
        tag: String,
        /// PR 番号
        #[arg(long)]
        pr_number: u64,
        /// 自分たちのイメージを示すレジストリの owner
        #[arg(long)]
        repo_owner: String,
        /// シークレット上書きファイル (.enc-temp.env) を持つアプリリポジトリ
        #[arg(long)]
        app_repo_path: Option<PathBuf>,
        /// コンテナレジストリ
        #[arg(long, default_value = DEFAULT_REGISTRY)]
        registry: String,
        /// url= / temp-path= を追記するステップ出力ファイル
        #[arg(long, env = "GITHUB_OUTPUT")]
        output_file: Option<PathBuf>,
    },
    /// 常設デプロイの compose のイメージタグを更新
    #[command(name = "update-tag")]
    UpdateTag {
        /// アプリのデプロイディレクトリ
        #[arg(long)]
        app_path: PathBuf,
        /// 新しいイメージタグ
        #[arg(long)]
        tag: String,
        /// イメージのリポジトリ (owner/name)
        #[arg(long)]
        repo: String,
        /// コンテナレジストリ
        #[arg(long, default_value = DEFAULT_REGISTRY)]
        registry: String,
    },
    /// PR のステータスコメントを作成・更新
    Comment {
        /// GitHub トークン
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,
        /// 対象リポジトリ (owner/name)
        #[arg(long)]
        repo: String,
        /// PR 番号
        #[arg(long)]
        pr_number: u64,
        #[arg(long, value_enum)]
        action: Action,
        /// プレビュー URL（deploy 時は必須）
        #[arg(long, required_if_eq("action", "deploy"))]
        url: Option<String>,
        /// デプロイしたタグ（deploy 時は必須）
        #[arg(long, required_if_eq("action", "deploy"))]
        tag: Option<String>,
        /// GitHub API のベース URL
        #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_BASE)]
        api_url: String,
    },
    /// GitHub のデプロイメント記録を作成・削除
    Deployment {
        /// GitHub トークン
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,
        /// 対象リポジトリ (owner/name)
        #[arg(long)]
        repo: String,
        #[arg(long, value_enum)]
        action: Action,
        /// 環境名（例: pr-42）
        #[arg(long)]
        environment: String,
        /// プレビュー URL（deploy 時は必須）
        #[arg(long, required_if_eq("action", "deploy"))]
        url: Option<String>,
        /// デプロイ対象の ref
        #[arg(long = "ref", default_value = "main")]
        git_ref: String,
        /// GitHub API のベース URL
        #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_BASE)]
        api_url: String,
    },
    /// URL が応答するまで待つ（タイムアウトしても失敗にはしない）
    Health {
        /// 確認する URL
        #[arg(long)]
        url: String,
        /// 試行回数
        #[arg(long, default_value_t = commands::health::DEFAULT_ATTEMPTS)]
        attempts: u32,
        /// 試行間隔（秒）
        #[arg(long, default_value_t = commands::health::DEFAULT_INTERVAL_SECS)]
        interval_secs: u64,
        /// 1 回あたりのタイムアウト（秒）
        #[arg(long, default_value_t = commands::health::DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
        /// ready= を追記するステップ出力ファイル
        #[arg(long, env = "GITHUB_OUTPUT")]
        output_file: Option<PathBuf>,
    },
    /// 変更をコミットしてプッシュ（失敗時は rebase して再試行）
    #[command(name = "git-push")]
    GitPush {
        /// コミットメッセージ
        #[arg(long)]
        message: String,
        /// ステージするパス
        #[arg(long, num_args = 1.., required_unless_present = "all", conflicts_with = "all")]
        paths: Vec<String>,
        /// すべての変更をステージ
        #[arg(long)]
        all: bool,
    },
    /// PR 用の一時スタックを削除
    Cleanup {
        /// 元アプリのデプロイディレクトリ
        #[arg(long)]
        app_path: PathBuf,
        /// PR 番号
        #[arg(long)]
        pr_number: u64,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログは stderr に出す（stdout は compose の内容などユーザー向け出力）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Rewrite {
            app_path,
            tag,
            pr_number,
            repo_owner,
            app_repo_path,
            registry,
            output_file,
        } => {
            let request = previewflow_compose::PreviewRequest {
                paths: previewflow_config::PreviewPaths::new(&app_path, pr_number)?,
                tag,
                registry,
                repo_owner,
                app_repo_path,
            };
            let output = previewflow_config::StepOutput::new(output_file);
            commands::rewrite::handle(&request, &output)?;
        }
        Commands::UpdateTag {
            app_path,
            tag,
            repo,
            registry,
        } => {
            commands::update_tag::handle(&app_path, &registry, &repo, &tag)?;
        }
        Commands::Comment {
            token,
            repo,
            pr_number,
            action,
            url,
            tag,
            api_url,
        } => {
            let client = previewflow_github::GithubClient::with_api_base(token, &repo, &api_url)?;
            commands::comment::handle(&client, pr_number, action, url.as_deref(), tag.as_deref())
                .await?;
        }
        Commands::Deployment {
            token,
            repo,
            action,
            environment,
            url,
            git_ref,
            api_url,
        } => {
            let client = previewflow_github::GithubClient::with_api_base(token, &repo, &api_url)?;
            commands::deployment::handle(&client, action, &environment, url.as_deref(), &git_ref)
                .await?;
        }
        Commands::Health {
            url,
            attempts,
            interval_secs,
            timeout_secs,
            output_file,
        } => {
            let config = commands::health::HealthConfig {
                attempts,
                interval: std::time::Duration::from_secs(interval_secs),
                timeout: std::time::Duration::from_secs(timeout_secs),
            };
            let output = previewflow_config::StepOutput::new(output_file);
            commands::health::handle(&url, &config, &output).await?;
        }
        Commands::GitPush {
            message,
            paths,
            all,
        } => {
            let git = git::Git::new();
            commands::git_push::handle(&git, &message, &paths, all).await?;
        }
        Commands::Cleanup {
            app_path,
            pr_number,
        } => {
            commands::cleanup::handle(&app_path, pr_number)?;
        }
        Commands::Version => {
            println!("previewflow {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
