//! McpIntegration - orchestration-style calls over an [`AiClient`].
//!
//! Each call renders a prompt template and forwards it. Only
//! [`McpIntegration::analyze_code`] adds anything of its own: the static
//! metrics from [`code_analysis`](crate::code_analysis).

use crate::code_analysis::CodeMetrics;
use composer_core::ai_client::{AiClient, SdkResponse};
use composer_core::{ComposerError, Result};
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const GENERATE_COMPONENT: &str = "\
Create a {{ framework }} component.
Description: {{ description }}
{% if props %}Props: {{ props | join(', ') }}
{% endif %}Styling: {{ styling }}";

const OPTIMIZE_COMPONENT: &str = "\
Optimize the following component{% if goals %} for {{ goals | join(', ') }}{% endif %}:
{{ code }}";

const ANALYZE_CODE: &str = "\
Analyze this component ({{ lines }} lines, complexity {{ complexity }}, hooks: {{ hooks | join(', ') or 'none' }}):
{{ code }}";

const MODIFY_COMPONENT: &str = "\
Apply this change: {{ instruction }}
To the component:
{{ code }}";

const GENERATE_TESTS: &str = "\
Write {{ framework }} tests{% if name %} for {{ name }}{% endif %}:
{{ code }}";

/// Parameters for [`McpIntegration::generate_component`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRequest {
    pub description: String,
    #[serde(default)]
    pub props: Vec<String>,
    pub framework: String,
    pub styling: String,
}

impl ComponentRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            props: Vec::new(),
            framework: "React".to_string(),
            styling: "Tailwind CSS".to_string(),
        }
    }

    pub fn with_props(mut self, props: &[&str]) -> Self {
        self.props = props.iter().map(|p| p.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAnalysis {
    pub metrics: CodeMetrics,
    pub insights: String,
}

pub struct McpIntegration {
    client: Arc<dyn AiClient>,
    templates: Environment<'static>,
}

impl McpIntegration {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self {
            client,
            templates: Environment::new(),
        }
    }

    pub fn client(&self) -> &Arc<dyn AiClient> {
        &self.client
    }

    pub async fn generate_component(&self, request: &ComponentRequest) -> Result<SdkResponse> {
        let prompt = self.render(
            GENERATE_COMPONENT,
            context! {
                description => request.description,
                props => request.props,
                framework => request.framework,
                styling => request.styling,
            },
        )?;
        self.forward("generate_component", &prompt).await
    }

    pub async fn optimize_component(&self, code: &str, goals: &[&str]) -> Result<SdkResponse> {
        let prompt = self.render(OPTIMIZE_COMPONENT, context! { code, goals })?;
        self.forward("optimize_component", &prompt).await
    }

    /// Static metrics plus the client's commentary.
    pub async fn analyze_code(&self, code: &str) -> Result<CodeAnalysis> {
        let metrics = CodeMetrics::from_source(code);
        let prompt = self.render(
            ANALYZE_CODE,
            context! {
                code,
                lines => metrics.lines,
                complexity => metrics.complexity,
                hooks => metrics.hooks,
            },
        )?;
        let response = self.forward("analyze_code", &prompt).await?;
        Ok(CodeAnalysis {
            metrics,
            insights: response.content,
        })
    }

    pub async fn modify_component(&self, code: &str, instruction: &str) -> Result<SdkResponse> {
        if instruction.trim().is_empty() {
            return Err(ComposerError::invalid_input("Modification instruction is required"));
        }
        let prompt = self.render(MODIFY_COMPONENT, context! { code, instruction })?;
        self.forward("modify_component", &prompt).await
    }

    pub async fn generate_tests(&self, code: &str, framework: &str) -> Result<SdkResponse> {
        let name = crate::code_analysis::extract_component_name(code);
        let prompt = self.render(GENERATE_TESTS, context! { code, framework, name })?;
        self.forward("generate_tests", &prompt).await
    }

    fn render(&self, template: &str, ctx: minijinja::Value) -> Result<String> {
        self.templates
            .render_str(template, ctx)
            .map_err(|e| ComposerError::internal(format!("Prompt template failed: {}", e)))
    }

    async fn forward(&self, operation: &'static str, prompt: &str) -> Result<SdkResponse> {
        tracing::debug!(target: "composer::mcp", operation, model = self.client.model(), "Forwarding prompt");
        self.client.send_message(prompt, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_core::ai_client::{StreamCallback, TokenUsage};
    use std::sync::Mutex;

    /// Echoes prompts back and records them.
    #[derive(Default)]
    struct EchoClient {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl AiClient for EchoClient {
        async fn send_message(
            &self,
            content: &str,
            _on_chunk: Option<StreamCallback<'_>>,
        ) -> Result<SdkResponse> {
            self.prompts.lock().unwrap().push(content.to_string());
            Ok(SdkResponse {
                content: format!("echo: {}", content),
                usage: TokenUsage::default(),
                model: "echo".to_string(),
            })
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn integration() -> (Arc<EchoClient>, McpIntegration) {
        let client = Arc::new(EchoClient::default());
        let mcp = McpIntegration::new(client.clone());
        (client, mcp)
    }

    #[tokio::test]
    async fn test_generate_component_prompt() {
        let (client, mcp) = integration();
        let request = ComponentRequest::new("A todo list").with_props(&["tasks", "onToggle"]);
        mcp.generate_component(&request).await.unwrap();

        let prompt = client.prompts.lock().unwrap()[0].clone();
        assert!(prompt.starts_with("Create a React component."));
        assert!(prompt.contains("Description: A todo list"));
        assert!(prompt.contains("Props: tasks, onToggle"));
        assert!(prompt.contains("Styling: Tailwind CSS"));
    }

    #[tokio::test]
    async fn test_optimize_without_goals() {
        let (client, mcp) = integration();
        mcp.optimize_component("const A = 1;", &[]).await.unwrap();
        assert_eq!(
            client.prompts.lock().unwrap()[0],
            "Optimize the following component:\nconst A = 1;"
        );
    }

    #[tokio::test]
    async fn test_analyze_combines_metrics_and_insights() {
        let (_, mcp) = integration();
        let code = "export const Card = () => { const [a] = useState(0); return a ? 1 : 2; };";
        let analysis = mcp.analyze_code(code).await.unwrap();
        assert_eq!(analysis.metrics.component_name.as_deref(), Some("Card"));
        assert_eq!(analysis.metrics.hooks, vec!["useState"]);
        assert!(analysis.insights.contains("hooks: useState"));
    }

    #[tokio::test]
    async fn test_modify_requires_instruction() {
        let (_, mcp) = integration();
        assert!(mcp.modify_component("code", "  ").await.is_err());
        assert!(mcp.modify_component("code", "add a title").await.is_ok());
    }

    #[tokio::test]
    async fn test_generate_tests_names_component() {
        let (client, mcp) = integration();
        mcp.generate_tests("function TaskForm() {}", "Jest").await.unwrap();
        assert!(client.prompts.lock().unwrap()[0].starts_with("Write Jest tests for TaskForm:"));
    }
}
