//! Transient deployment records
//!
//! Preview stacks show up in the PR's "Deployments" box. A deploy creates a
//! deployment plus a `success` status; cleanup marks every deployment of the
//! environment `inactive` and deletes it.

use crate::client::GithubClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub id: u64,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    Success,
    Inactive,
}

#[derive(Debug, Serialize)]
struct CreateDeploymentRequest<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    environment: &'a str,
    auto_merge: bool,
    required_contexts: Vec<String>,
    transient_environment: bool,
    production_environment: bool,
}

#[derive(Debug, Serialize)]
struct CreateStatusRequest<'a> {
    state: DeploymentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment_url: Option<&'a str>,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
struct DeploymentStatus {
    #[allow(dead_code)]
    id: u64,
}

/// Create a deployment for `environment` and mark it successful at `url`
pub async fn create_deployment(
    client: &GithubClient,
    environment: &str,
    git_ref: &str,
    url: &str,
) -> Result<Deployment> {
    let request = CreateDeploymentRequest {
        git_ref,
        environment,
        auto_merge: false,
        required_contexts: Vec::new(),
        transient_environment: true,
        production_environment: false,
    };
    let deployment: Deployment = client.post("/deployments", &request).await?;

    set_status(
        client,
        deployment.id,
        DeploymentState::Success,
        Some(url),
        "Temp deploy is ready",
    )
    .await?;

    tracing::info!("Created deployment {} for {} -> {}", deployment.id, environment, url);
    Ok(deployment)
}

/// Deactivate and delete every deployment of `environment`
///
/// Only the first page (100 records) is processed. Returns how many were removed.
pub async fn retire_deployments(client: &GithubClient, environment: &str) -> Result<usize> {
    let deployments: Vec<Deployment> = client
        .get_with_query(
            "/deployments",
            &[("environment", environment), ("per_page", "100")],
        )
        .await?;

    for deployment in &deployments {
        // GitHub refuses to delete a deployment that is still active
        set_status(
            client,
            deployment.id,
            DeploymentState::Inactive,
            None,
            "Temp deploy removed",
        )
        .await?;
        client
            .delete(&format!("/deployments/{}", deployment.id))
            .await?;
        tracing::debug!("Deleted deployment {}", deployment.id);
    }

    Ok(deployments.len())
}

async fn set_status(
    client: &GithubClient,
    deployment_id: u64,
    state: DeploymentState,
    environment_url: Option<&str>,
    description: &str,
) -> Result<()> {
    let request = CreateStatusRequest {
        state,
        environment_url,
        description,
    };
    let _: DeploymentStatus = client
        .post(&format!("/deployments/{}/statuses", deployment_id), &request)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_shape() {
        let request = CreateDeploymentRequest {
            git_ref: "feature/x",
            environment: "pr-42",
            auto_merge: false,
            required_contexts: Vec::new(),
            transient_environment: true,
            production_environment: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ref"], "feature/x");
        assert_eq!(json["required_contexts"], serde_json::json!([]));
        assert_eq!(json["transient_environment"], true);
        assert_eq!(json["production_environment"], false);
    }

    #[test]
    fn test_status_request_omits_missing_url() {
        let request = CreateStatusRequest {
            state: DeploymentState::Inactive,
            environment_url: None,
            description: "Temp deploy removed",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["state"], "inactive");
        assert!(json.get("environment_url").is_none());
    }
}
