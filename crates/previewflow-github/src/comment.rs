//! Pull request status comment
//!
//! A single comment per PR, identified by a hidden HTML marker, is created on
//! the first deploy and edited in place afterwards.

use crate::client::GithubClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Hidden marker identifying the preview status comment
pub const COMMENT_MARKER: &str = "<!-- temp-deploy -->";

/// Which lifecycle event the comment reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Deploy,
    Cleanup,
}

/// What happened to the status comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    Updated(u64),
    Created(u64),
    /// Cleanup without an existing comment
    NothingToUpdate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
}

impl IssueComment {
    pub fn is_status_comment(&self) -> bool {
        self.body
            .as_deref()
            .is_some_and(|body| body.contains(COMMENT_MARKER))
    }
}

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// Current time in the format used by the comment bodies
pub fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn deploy_body(url: &str, tag: &str, updated: &str) -> String {
    format!(
        "{}\n🚀 **Temp deploy ready**\n\n{}\n\nTag: `{}` | Updated: {}\n\n_docker-cd will pick this up within ~60s_",
        COMMENT_MARKER, url, tag, updated
    )
}

pub fn cleanup_body(updated: &str) -> String {
    format!(
        "{}\n**Temp deploy removed**\n\nCleaned up: {}",
        COMMENT_MARKER, updated
    )
}

/// Find the existing status comment on a PR (first page only)
pub async fn find_status_comment(
    client: &GithubClient,
    pr_number: u64,
) -> Result<Option<IssueComment>> {
    let comments: Vec<IssueComment> = client
        .get(&format!("/issues/{}/comments", pr_number))
        .await?;
    Ok(comments.into_iter().find(IssueComment::is_status_comment))
}

/// Edit the status comment, or create it on deploy
///
/// Cleanup never creates a comment.
pub async fn upsert_status_comment(
    client: &GithubClient,
    pr_number: u64,
    body: &str,
    action: CommentAction,
) -> Result<CommentOutcome> {
    let request = CommentRequest { body };

    if let Some(existing) = find_status_comment(client, pr_number).await? {
        let updated: IssueComment = client
            .patch(&format!("/issues/comments/{}", existing.id), &request)
            .await?;
        tracing::info!("Updated comment {}", updated.id);
        return Ok(CommentOutcome::Updated(updated.id));
    }

    match action {
        CommentAction::Deploy => {
            let created: IssueComment = client
                .post(&format!("/issues/{}/comments", pr_number), &request)
                .await?;
            tracing::info!("Created deploy comment {}", created.id);
            Ok(CommentOutcome::Created(created.id))
        }
        CommentAction::Cleanup => {
            tracing::debug!("No existing status comment on PR #{}", pr_number);
            Ok(CommentOutcome::NothingToUpdate)
        }
    }
}
