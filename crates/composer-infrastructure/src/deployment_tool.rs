//! Simulated deployment pipeline.
//!
//! `deploy` walks a deployment through build, deploy and finalize steps,
//! sleeping a configured delay in each. Nothing is built and nothing leaves
//! the process; the resulting URL is fabricated.

use chrono::{DateTime, Utc};
use composer_core::config::DeploymentSettings;
use composer_core::{ComposerError, Result, ToolResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use strum::Display;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Building,
    Deploying,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    pub project_name: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_environment() -> String {
    "production".to_string()
}

impl DeploymentRequest {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            environment: default_environment(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub project_name: String,
    pub environment: String,
    pub status: DeploymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub logs: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

pub struct DeploymentTool {
    deployments: RwLock<HashMap<String, Deployment>>,
    settings: DeploymentSettings,
}

impl DeploymentTool {
    pub fn new(settings: DeploymentSettings) -> Self {
        Self {
            deployments: RwLock::new(HashMap::new()),
            settings,
        }
    }

    /// Runs the simulated pipeline to completion.
    ///
    /// The deployment is registered before the first delay, so concurrent
    /// callers can observe its intermediate status through
    /// [`get_deployment`](Self::get_deployment).
    pub async fn deploy(&self, request: DeploymentRequest) -> ToolResult<Deployment> {
        match self.run_pipeline(request).await {
            Ok(deployment) => {
                let message = format!(
                    "Deployed {} to {}",
                    deployment.project_name,
                    deployment.url.as_deref().unwrap_or_default()
                );
                ToolResult::ok(deployment).with_message(message)
            }
            Err(e) => ToolResult::fail(e.to_string()),
        }
    }

    async fn run_pipeline(&self, request: DeploymentRequest) -> Result<Deployment> {
        let project_name = request.project_name.trim().to_string();
        if project_name.is_empty() {
            return Err(ComposerError::invalid_input("Project name is required"));
        }

        let id = format!("dpl_{}", &Uuid::new_v4().simple().to_string()[..12]);
        let deployment = Deployment {
            id: id.clone(),
            project_name: project_name.clone(),
            environment: request.environment,
            status: DeploymentStatus::Pending,
            url: None,
            logs: vec![format!("Deployment {} queued", id)],
            created_at: Utc::now(),
            completed_at: None,
        };
        self.deployments.write().await.insert(id.clone(), deployment);
        tracing::info!(target: "composer::tools::deployment", %id, project = %project_name, "Deployment started");

        self.advance(&id, DeploymentStatus::Building, format!("Building {}...", project_name))
            .await?;
        tokio::time::sleep(Duration::from_millis(self.settings.build_delay_ms)).await;

        self.advance(&id, DeploymentStatus::Deploying, "Uploading build artifacts...".to_string())
            .await?;
        tokio::time::sleep(Duration::from_millis(self.settings.deploy_delay_ms)).await;

        tokio::time::sleep(Duration::from_millis(self.settings.finalize_delay_ms)).await;
        let suffix: u32 = rand::thread_rng().gen_range(1000..10000);
        let url = format!("https://{}-{}.{}", slugify(&project_name), suffix, self.settings.domain);

        let mut deployments = self.deployments.write().await;
        let deployment = deployments
            .get_mut(&id)
            .ok_or_else(|| ComposerError::not_found("Deployment", id.as_str()))?;
        deployment.status = DeploymentStatus::Success;
        deployment.logs.push(format!("Deployment successful: {}", url));
        deployment.url = Some(url);
        deployment.completed_at = Some(Utc::now());
        tracing::info!(target: "composer::tools::deployment", %id, url = ?deployment.url, "Deployment finished");

        Ok(deployment.clone())
    }

    async fn advance(&self, id: &str, status: DeploymentStatus, log: String) -> Result<()> {
        let mut deployments = self.deployments.write().await;
        let deployment = deployments
            .get_mut(id)
            .ok_or_else(|| ComposerError::not_found("Deployment", id))?;
        tracing::debug!(target: "composer::tools::deployment", id, from = %deployment.status, to = %status, "Status change");
        deployment.status = status;
        deployment.logs.push(log);
        Ok(())
    }

    pub async fn get_deployment(&self, id: &str) -> ToolResult<Deployment> {
        ToolResult::from_result(
            self.deployments
                .read()
                .await
                .get(id)
                .cloned()
                .ok_or_else(|| ComposerError::not_found("Deployment", id)),
        )
    }

    /// All deployments, oldest first.
    pub async fn list_deployments(&self) -> ToolResult<Vec<Deployment>> {
        let mut all: Vec<Deployment> = self.deployments.read().await.values().cloned().collect();
        all.sort_by_key(|d| d.created_at);
        ToolResult::ok(all)
    }
}

impl Default for DeploymentTool {
    fn default() -> Self {
        Self::new(DeploymentSettings::default())
    }
}

/// Subdomain label for a project name. Falls back to `app` when nothing usable remains.
fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "app".to_string()
    } else {
        slug
    }
}
