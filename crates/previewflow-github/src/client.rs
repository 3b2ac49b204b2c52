//! Repository-scoped GitHub REST client
//!
//! Every request goes to `<api base>/repos/<owner>/<name><path>` with a
//! Bearer token and the fixed GitHub header set. Any non-success status is
//! turned into [`GithubError::Api`] carrying the method, path, status and body.

use crate::error::{GithubError, Result};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "previewflow";

/// GitHub API client bound to a single repository
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    token: String,
    repo_url: String,
}

impl GithubClient {
    /// Create a client for `owner/name` against api.github.com
    pub fn new(token: impl Into<String>, repo: &str) -> Result<Self> {
        Self::with_api_base(token, repo, GITHUB_API_BASE)
    }

    /// Create a client against a different API base (GHES, test servers)
    pub fn with_api_base(token: impl Into<String>, repo: &str, api_base: &str) -> Result<Self> {
        let valid = repo
            .split_once('/')
            .is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'));
        if !valid {
            return Err(GithubError::InvalidRepo(repo.to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            token: token.into(),
            repo_url: format!("{}/repos/{}", api_base.trim_end_matches('/'), repo),
        })
    }

    /// Repository API base (`.../repos/<owner>/<name>`)
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.send(Method::GET, path, query, None).await?;
        Ok(response.json().await?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::PATCH, path, &[], Some(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.repo_url, path);
        tracing::debug!("GitHub API {} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_url() {
        let client = GithubClient::new("token", "acme/shop").unwrap();
        assert_eq!(client.repo_url(), "https://api.github.com/repos/acme/shop");

        let client =
            GithubClient::with_api_base("token", "acme/shop", "http://127.0.0.1:8080/").unwrap();
        assert_eq!(client.repo_url(), "http://127.0.0.1:8080/repos/acme/shop");
    }

    #[test]
    fn test_invalid_repo() {
        for repo in ["shop", "acme/", "/shop", "acme/shop/extra"] {
            assert!(
                matches!(GithubClient::new("token", repo), Err(GithubError::InvalidRepo(_))),
                "{repo} should be rejected"
            );
        }
    }

    #[test]
    fn test_api_error_message() {
        let err = GithubError::Api {
            method: "PATCH".to_string(),
            path: "/issues/comments/7".to_string(),
            status: 404,
            body: "{\"message\":\"Not Found\"}".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("PATCH /issues/comments/7"));
        assert!(message.contains("404"));
        assert!(message.contains("Not Found"));
    }
}
