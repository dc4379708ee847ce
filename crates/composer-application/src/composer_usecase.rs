//! Composer use case implementation.
//!
//! This module provides the `ComposerUseCase`, which owns one set of mock
//! tools, one mock SDK client and one orchestrator, and exposes the
//! operations a front end needs.

use crate::orchestrator::AgentOrchestrator;
use anyhow::{Context, Result};
use composer_core::ai_client::{AiClient, SdkResponse, StreamCallback};
use composer_core::config::ComposerConfig;
use composer_core::specification::AppSpecification;
use composer_core::AgentMessage;
use composer_infrastructure::{ToolSet, ValidationKind, ValidationReport};
use composer_interaction::{CodeAnalysis, McpIntegration, TamboClient};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Use case tying the orchestrator to the tools and SDK it works with.
///
/// Generated files land in the tool set's in-memory filesystem, so they can
/// be listed, read, analyzed and validated afterwards.
///
/// # Thread Safety
///
/// The orchestrator sits behind a `RwLock`; concurrent `submit` calls are
/// serialized and never interleave their history appends.
pub struct ComposerUseCase {
    tools: ToolSet,
    sdk: Arc<TamboClient>,
    mcp: McpIntegration,
    orchestrator: Arc<RwLock<AgentOrchestrator>>,
}

impl ComposerUseCase {
    pub fn new(config: &ComposerConfig) -> Self {
        let tools = ToolSet::new(config);
        let sdk = Arc::new(TamboClient::new(&config.sdk));
        let mcp = McpIntegration::new(sdk.clone());
        let orchestrator = AgentOrchestrator::new().with_sink(tools.filesystem.clone());

        Self {
            tools,
            sdk,
            mcp,
            orchestrator: Arc::new(RwLock::new(orchestrator)),
        }
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn sdk(&self) -> &Arc<TamboClient> {
        &self.sdk
    }

    pub fn mcp(&self) -> &McpIntegration {
        &self.mcp
    }

    /// Runs the pipeline and returns only the messages this call added.
    pub async fn submit(&self, input: &str) -> Vec<AgentMessage> {
        let mut orchestrator = self.orchestrator.write().await;
        let before = orchestrator.conversation_history().len();
        let history = orchestrator.process_user_input(input).await;
        history[before..].to_vec()
    }

    pub async fn history(&self) -> Vec<AgentMessage> {
        self.orchestrator.read().await.conversation_history().to_vec()
    }

    pub async fn specification(&self) -> Option<AppSpecification> {
        self.orchestrator.read().await.current_specification().cloned()
    }

    /// Clears the orchestrator and the SDK transcript. Tool state is kept.
    pub async fn reset(&self) {
        self.orchestrator.write().await.reset();
        self.sdk.clear_history().await;
    }

    /// Sends a free-form prompt to the SDK, optionally streaming.
    pub async fn ask(
        &self,
        prompt: &str,
        on_chunk: Option<StreamCallback<'_>>,
    ) -> Result<SdkResponse> {
        self.sdk
            .send_message(prompt, on_chunk)
            .await
            .context("SDK request failed")
    }

    async fn read_generated(&self, path: &str) -> Result<String> {
        self.tools
            .filesystem
            .read_file(path)
            .await
            .into_result()
            .with_context(|| format!("Failed to read {}", path))
    }

    /// Analyzes a file from the in-memory filesystem.
    pub async fn analyze_file(&self, path: &str) -> Result<CodeAnalysis> {
        let code = self.read_generated(path).await?;
        self.mcp
            .analyze_code(&code)
            .await
            .with_context(|| format!("Failed to analyze {}", path))
    }

    /// Validates a file from the in-memory filesystem.
    pub async fn validate_file(&self, kind: ValidationKind, path: &str) -> Result<ValidationReport> {
        let content = self.read_generated(path).await?;
        self.tools
            .validation
            .validate(&content, kind)
            .into_result()
            .with_context(|| format!("Failed to validate {}", path))
    }
}

impl Default for ComposerUseCase {
    fn default() -> Self {
        Self::new(&ComposerConfig::default())
    }
}
