//! GitHub client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("GitHub API {method} {path} failed: {status}\n{body}")]
    Api {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Invalid repository (expected owner/name): {0}")]
    InvalidRepo(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GithubError>;
