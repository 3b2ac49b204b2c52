//! プレビュー URL の疎通待ち
//!
//! 一定間隔で GET を繰り返し、2xx/3xx が返れば準備完了とみなす。
//! 最後まで応答がなくてもエラーにはしない（後続ステップの判断に委ねる）。

use colored::Colorize;
use previewflow_config::StepOutput;
use std::time::Duration;
use tokio::time::sleep;

pub const DEFAULT_ATTEMPTS: u32 = 30;
pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// 疎通確認の設定
#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub attempts: u32,
    pub interval: Duration,
    /// 1 回の GET のタイムアウト
    pub timeout: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub async fn handle(url: &str, config: &HealthConfig, output: &StepOutput) -> anyhow::Result<()> {
    println!("{}", format!("Waiting for {} ...", url).blue());

    let ready = wait_until_ready(url, config).await?;
    if ready {
        println!("{}", format!("✓ {} is ready", url).green());
    } else {
        println!(
            "{}",
            format!(
                "⚠ {} is not yet ready after {} attempts",
                url, config.attempts
            )
            .yellow()
        );
    }

    output.append(&[("ready", if ready { "true" } else { "false" })])?;
    Ok(())
}

/// URL が応答するまで待つ
///
/// 個々の失敗はログに残すだけで、戻り値は準備完了したかどうか。
/// クライアントの構築に失敗した場合のみエラーを返す。
pub async fn wait_until_ready(url: &str, config: &HealthConfig) -> anyhow::Result<bool> {
    // 3xx もそのまま成功扱いにするのでリダイレクトは追わない
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    for attempt in 0..config.attempts {
        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::info!("{} responded {} (attempt {})", url, status, attempt + 1);
                if status.is_success() || status.is_redirection() {
                    return Ok(true);
                }
            }
            Err(e) => {
                tracing::info!("{} not reachable (attempt {}): {}", url, attempt + 1, e);
            }
        }

        // 最後の試行でなければ待機
        if attempt + 1 < config.attempts {
            sleep(config.interval).await;
        }
    }

    Ok(false)
}
