use super::codegen::{CodeGenerator, GeneratedFile};
use composer_core::artifact::ArtifactSink;
use composer_core::message::{AgentType, MessageStatus, Phase};
use composer_core::specification::{AppSpecification, SpecificationSynthesizer};
use composer_core::{AgentMessage, ComposerError, Result};
use std::sync::Arc;

/// Runs the conversation, specification and code-generation phases for each
/// user request and keeps the resulting chat history.
pub struct AgentOrchestrator {
    conversation_history: Vec<AgentMessage>,
    current_specification: Option<AppSpecification>,
    synthesizer: SpecificationSynthesizer,
    generator: CodeGenerator,
    sink: Option<Arc<dyn ArtifactSink>>,
}

impl AgentOrchestrator {
    pub fn new() -> Self {
        Self {
            conversation_history: Vec::new(),
            current_specification: None,
            synthesizer: SpecificationSynthesizer::default(),
            generator: CodeGenerator::new(),
            sink: None,
        }
    }

    /// Writes generated files to `sink` during the code-generation phase.
    pub fn with_sink(mut self, sink: Arc<dyn ArtifactSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: SpecificationSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Appends the user's message and one message per phase, then returns
    /// the whole history.
    ///
    /// A failing phase stops the run and appends a single error message in
    /// place of the remaining phases. This never returns an error.
    pub async fn process_user_input(&mut self, input: &str) -> &[AgentMessage] {
        self.conversation_history.push(AgentMessage::user(input));

        if let Err(e) = self.run_phases(input).await {
            tracing::warn!(target: "composer::orchestrator", error = %e, "Pipeline failed");
            self.conversation_history.push(AgentMessage::agent(
                format!(
                    "I encountered an error while processing your request: {}",
                    e
                ),
                AgentType::Error,
                None,
                MessageStatus::Error,
            ));
        }

        &self.conversation_history
    }

    async fn run_phases(&mut self, input: &str) -> Result<()> {
        self.conversation_phase(input);
        self.specification_phase(input);
        self.code_generation_phase().await
    }

    fn conversation_phase(&mut self, input: &str) {
        let requirements = self.synthesizer.requirements(input);
        tracing::debug!(target: "composer::orchestrator", requirements = requirements.len(), "Conversation phase");

        let bullets: String = requirements
            .iter()
            .map(|r| format!("\n- {}", r))
            .collect();
        self.conversation_history.push(AgentMessage::agent(
            format!(
                "I understand you want to build: \"{}\". I've identified these requirements:{}\n\nLet me turn this into a specification.",
                input.trim(),
                bullets
            ),
            AgentType::Conversation,
            Some(Phase::Conversation),
            MessageStatus::Completed,
        ));
    }

    fn specification_phase(&mut self, input: &str) {
        let spec = self.synthesizer.synthesize(input);
        tracing::info!(
            target: "composer::orchestrator",
            app = %spec.name,
            components = spec.components.len(),
            pages = spec.pages.len(),
            "Specification created"
        );

        let components: Vec<&str> = spec.components.iter().map(|c| c.name.as_str()).collect();
        let pages: Vec<String> = spec
            .pages
            .iter()
            .map(|p| format!("{} ({})", p.name, p.path))
            .collect();
        let content = format!(
            "Specification for {}:\nComponents: {}\nPages: {}\nDependencies: {}\nArchitecture: {}, {}, {}",
            spec.name,
            components.join(", "),
            pages.join(", "),
            spec.dependencies.join(", "),
            spec.architecture.framework,
            spec.architecture.styling,
            spec.architecture.state_management,
        );

        self.current_specification = Some(spec);
        self.conversation_history.push(AgentMessage::agent(
            content,
            AgentType::Specification,
            Some(Phase::Specification),
            MessageStatus::Completed,
        ));
    }

    async fn code_generation_phase(&mut self) -> Result<()> {
        let spec = self.current_specification.as_ref().ok_or_else(|| {
            ComposerError::execution("No specification available for code generation")
        })?;
        let app_name = spec.name.clone();
        let files = self.generator.generate(spec)?;

        if let Some(sink) = &self.sink {
            for file in &files {
                sink.write_artifact(&file.path, &file.content).await?;
                tracing::info!(target: "composer::orchestrator", path = %file.path, bytes = file.content.len(), "Generated file");
            }
        } else {
            for file in &files {
                tracing::debug!(target: "composer::orchestrator", path = %file.path, "Generated file (not written)");
            }
        }

        self.conversation_history.push(AgentMessage::agent(
            completion_message(&app_name, &files),
            AgentType::CodeGeneration,
            Some(Phase::CodeGeneration),
            MessageStatus::Completed,
        ));
        Ok(())
    }

    pub fn conversation_history(&self) -> &[AgentMessage] {
        &self.conversation_history
    }

    pub fn current_specification(&self) -> Option<&AppSpecification> {
        self.current_specification.as_ref()
    }

    /// Clears history and the current specification.
    pub fn reset(&mut self) {
        self.conversation_history.clear();
        self.current_specification = None;
    }
}

impl Default for AgentOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn completion_message(app_name: &str, files: &[GeneratedFile]) -> String {
    let listing: String = files.iter().map(|f| format!("\n- {}", f.path)).collect();
    format!(
        "Code generation complete for {}. Generated {} files:{}",
        app_name,
        files.len(),
        listing
    )
}
