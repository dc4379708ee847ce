//! Keyword-driven specification synthesis.

use super::intent::{IntentCategory, IntentClassifier};
use super::model::{AppSpecification, ArchitectureSpec, ComponentSpec, PageSpec, PropSpec, StateSpec};

/// Name used when every word of the request is a stop word.
pub const DEFAULT_APP_NAME: &str = "MyApp";

const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "we", "want", "would", "like", "need", "to", "build", "create", "make",
    "a", "an", "the", "app", "application", "for", "with", "that", "please", "can", "you",
];

const BASE_DEPENDENCIES: &[&str] = &["react", "react-dom", "next", "tailwindcss"];

const GENERIC_REQUIREMENTS: &[&str] = &[
    "Clean, responsive layout",
    "Reusable component structure",
];

/// Derives an application name from the first meaningful word of a request.
///
/// Words are split on whitespace and stop words are dropped
/// case-insensitively. The first remaining word is capitalized.
pub fn derive_app_name(text: &str) -> String {
    text.split_whitespace()
        .find(|word| !STOP_WORDS.contains(&word.to_lowercase().as_str()))
        .map(capitalize)
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turns free-text requests into requirements and [`AppSpecification`]s.
#[derive(Debug, Clone, Default)]
pub struct SpecificationSynthesizer {
    classifier: IntentClassifier,
}

impl SpecificationSynthesizer {
    pub fn new(classifier: IntentClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Requirement bullets from every category that fired.
    pub fn requirements(&self, text: &str) -> Vec<&'static str> {
        let categories = self.classifier.categories(text);
        if categories.is_empty() {
            return GENERIC_REQUIREMENTS.to_vec();
        }
        categories
            .iter()
            .flat_map(|c| c.requirements().iter().copied())
            .collect()
    }

    /// Components contributed independently by every category that fired.
    pub fn components(&self, text: &str) -> Vec<ComponentSpec> {
        let categories = self.classifier.categories(text);
        if categories.is_empty() {
            return vec![generic_component()];
        }
        categories.iter().flat_map(IntentCategory::components).collect()
    }

    /// Pages of the first category that fired.
    pub fn pages(&self, text: &str) -> Vec<PageSpec> {
        match self.classifier.primary(text) {
            Some(category) => category.pages(),
            None => vec![PageSpec::new("Home", "/", &["MainComponent"])],
        }
    }

    /// Base stack plus category packages, without duplicates.
    pub fn dependencies(&self, text: &str) -> Vec<String> {
        let mut deps: Vec<String> = BASE_DEPENDENCIES.iter().map(|d| d.to_string()).collect();
        for category in self.classifier.categories(text) {
            for dep in category.dependencies() {
                if !deps.iter().any(|d| d == dep) {
                    deps.push(dep.to_string());
                }
            }
        }
        deps
    }

    pub fn synthesize(&self, text: &str) -> AppSpecification {
        AppSpecification {
            name: derive_app_name(text),
            description: text.to_string(),
            components: self.components(text),
            pages: self.pages(text),
            dependencies: self.dependencies(text),
            architecture: ArchitectureSpec::default(),
        }
    }
}

fn generic_component() -> ComponentSpec {
    ComponentSpec {
        name: "MainComponent".to_string(),
        description: "Main application component".to_string(),
        props: vec![PropSpec::new("title", "string", false)],
        state: vec![StateSpec::new("content", "string", "\"\"")],
    }
}
