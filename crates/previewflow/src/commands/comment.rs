use super::Action;
use colored::Colorize;
use previewflow_github::GithubClient;
use previewflow_github::comment::{
    self, CommentAction, CommentOutcome, cleanup_body, deploy_body, timestamp,
};

pub async fn handle(
    client: &GithubClient,
    pr_number: u64,
    action: Action,
    url: Option<&str>,
    tag: Option<&str>,
) -> anyhow::Result<()> {
    let updated = timestamp();
    let (body, comment_action) = match action {
        Action::Deploy => {
            let url = url.ok_or_else(|| anyhow::anyhow!("deploy には --url が必要です"))?;
            let tag = tag.ok_or_else(|| anyhow::anyhow!("deploy には --tag が必要です"))?;
            (deploy_body(url, tag, &updated), CommentAction::Deploy)
        }
        Action::Cleanup => (cleanup_body(&updated), CommentAction::Cleanup),
    };

    match comment::upsert_status_comment(client, pr_number, &body, comment_action).await? {
        CommentOutcome::Updated(id) => {
            println!("{}", format!("✓ Updated comment {}", id).green());
        }
        CommentOutcome::Created(id) => {
            println!("{}", format!("✓ Created comment {}", id).green());
        }
        CommentOutcome::NothingToUpdate => {
            println!("No existing comment to update");
        }
    }
    Ok(())
}
