//! GitHub REST API integration for previewflow
//!
//! A small repository-scoped client plus the two things preview stacks
//! need from GitHub: a status comment on the pull request and transient
//! deployment records.
//!
//! # Example
//!
//! ```ignore
//! use previewflow_github::{GithubClient, comment};
//!
//! let client = GithubClient::new(token, "acme/shop")?;
//! let body = comment::deploy_body("https://pr-42-shop.example.com", "abc123", &comment::timestamp());
//! comment::upsert_status_comment(&client, 42, &body, comment::CommentAction::Deploy).await?;
//! ```

pub mod client;
pub mod comment;
pub mod deployment;
pub mod error;

pub use client::{GITHUB_API_BASE, GithubClient};
pub use comment::{COMMENT_MARKER, CommentAction, CommentOutcome, IssueComment};
pub use deployment::{Deployment, DeploymentState};
pub use error::{GithubError, Result};
