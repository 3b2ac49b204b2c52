use super::Action;
use colored::Colorize;
use previewflow_github::GithubClient;
use previewflow_github::deployment::{create_deployment, retire_deployments};

pub async fn handle(
    client: &GithubClient,
    action: Action,
    environment: &str,
    url: Option<&str>,
    git_ref: &str,
) -> anyhow::Result<()> {
    match action {
        Action::Deploy => {
            let url = url.ok_or_else(|| anyhow::anyhow!("deploy には --url が必要です"))?;
            let deployment = create_deployment(client, environment, git_ref, url).await?;
            println!(
                "{}",
                format!(
                    "✓ Created deployment {} for {} ({})",
                    deployment.id, environment, url
                )
                .green()
            );
        }
        Action::Cleanup => {
            let removed = retire_deployments(client, environment).await?;
            println!(
                "{}",
                format!("✓ Removed {} deployment(s) for {}", removed, environment).green()
            );
        }
    }
    Ok(())
}
