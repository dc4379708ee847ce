//! Mock HTTP endpoint tester.
//!
//! Endpoints are registered as plain configs and "tested" by fabricating a
//! response locally. No request is ever sent.

use chrono::{DateTime, Utc};
use composer_core::{ComposerError, Result, ToolResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use strum::{Display, EnumString};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default = "default_status")]
    pub expected_status: u16,
    #[serde(default)]
    pub response_body: Value,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_status() -> u16 {
    200
}

impl EndpointConfig {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            expected_status: default_status(),
            response_body: Value::Null,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_response(mut self, status: u16, body: Value) -> Self {
        self.expected_status = status;
        self.response_body = body;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredEndpoint {
    pub id: String,
    #[serde(flatten)]
    pub config: EndpointConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointTestResult {
    pub endpoint_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub status: u16,
    pub body: Value,
    pub headers: BTreeMap<String, String>,
    pub latency_ms: u64,
    pub passed: bool,
    pub tested_at: DateTime<Utc>,
}

#[derive(Default)]
struct Registry {
    endpoints: BTreeMap<String, EndpointConfig>,
    next_id: u64,
}

#[derive(Default)]
pub struct ApiTestTool {
    registry: RwLock<Registry>,
}

impl ApiTestTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_endpoint(&self, config: EndpointConfig) -> ToolResult<RegisteredEndpoint> {
        if !config.path.starts_with('/') {
            return ToolResult::fail(
                ComposerError::invalid_input("Endpoint path must start with '/'").to_string(),
            );
        }

        let mut registry = self.registry.write().await;
        registry.next_id += 1;
        let id = format!("endpoint-{}", registry.next_id);
        registry.endpoints.insert(id.clone(), config.clone());
        tracing::debug!(target: "composer::tools::api_test", %id, method = %config.method, path = %config.path, "Endpoint registered");

        ToolResult::ok(RegisteredEndpoint { id, config }).with_message("Endpoint added")
    }

    pub async fn remove_endpoint(&self, id: &str) -> ToolResult<()> {
        match self.registry.write().await.endpoints.remove(id) {
            Some(_) => ToolResult::done("Endpoint removed"),
            None => ToolResult::fail(ComposerError::not_found("Endpoint", id).to_string()),
        }
    }

    pub async fn list_endpoints(&self) -> ToolResult<Vec<RegisteredEndpoint>> {
        let registry = self.registry.read().await;
        ToolResult::ok(
            registry
                .endpoints
                .iter()
                .map(|(id, config)| RegisteredEndpoint {
                    id: id.clone(),
                    config: config.clone(),
                })
                .collect(),
        )
    }

    /// Fabricates a response for a registered endpoint.
    pub async fn test_endpoint(&self, id: &str) -> ToolResult<EndpointTestResult> {
        ToolResult::from_result(self.fabricate(id).await)
    }

    async fn fabricate(&self, id: &str) -> Result<EndpointTestResult> {
        let config = self
            .registry
            .read()
            .await
            .endpoints
            .get(id)
            .cloned()
            .ok_or_else(|| ComposerError::not_found("Endpoint", id))?;

        let latency_ms: u64 = rand::thread_rng().gen_range(50..300);
        let mut headers = config.headers.clone();
        headers
            .entry("content-type".to_string())
            .or_insert_with(|| "application/json".to_string());
        headers.insert("x-mock-response".to_string(), "true".to_string());

        let body = match (&config.response_body, config.method) {
            (Value::Null, HttpMethod::Delete) => Value::Null,
            (Value::Null, method) => serde_json::json!({
                "success": true,
                "method": method.to_string(),
                "path": config.path,
            }),
            (body, _) => body.clone(),
        };

        Ok(EndpointTestResult {
            endpoint_id: id.to_string(),
            method: config.method,
            path: config.path.clone(),
            status: config.expected_status,
            body,
            headers,
            latency_ms,
            passed: (200..400).contains(&config.expected_status),
            tested_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_and_test_endpoint() {
        let tool = ApiTestTool::new();
        let endpoint = tool
            .add_endpoint(
                EndpointConfig::new(HttpMethod::Get, "/api/tasks")
                    .with_response(200, json!([{"id": 1}])),
            )
            .await
            .data
            .unwrap();

        let result = tool.test_endpoint(&endpoint.id).await.data.unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.body, json!([{"id": 1}]));
        assert!(result.passed);
        assert!((50..300).contains(&result.latency_ms));
        assert_eq!(result.headers["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_default_body_is_synthesized() {
        let tool = ApiTestTool::new();
        let endpoint = tool
            .add_endpoint(EndpointConfig::new(HttpMethod::Post, "/api/orders"))
            .await
            .data
            .unwrap();
        let result = tool.test_endpoint(&endpoint.id).await.data.unwrap();
        assert_eq!(result.body["method"], "POST");
        assert_eq!(result.body["path"], "/api/orders");
    }

    #[tokio::test]
    async fn test_error_status_does_not_pass() {
        let tool = ApiTestTool::new();
        let endpoint = tool
            .add_endpoint(EndpointConfig::new(HttpMethod::Get, "/boom").with_response(500, json!({})))
            .await
            .data
            .unwrap();
        assert!(!tool.test_endpoint(&endpoint.id).await.data.unwrap().passed);
    }

    #[tokio::test]
    async fn test_invalid_and_missing_endpoints() {
        let tool = ApiTestTool::new();
        assert!(!tool.add_endpoint(EndpointConfig::new(HttpMethod::Get, "api")).await.success);
        assert!(!tool.test_endpoint("endpoint-9").await.success);
        assert!(!tool.remove_endpoint("endpoint-9").await.success);
        assert!(tool.list_endpoints().await.data.unwrap().is_empty());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
