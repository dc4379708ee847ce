//! Application specification domain model.
//!
//! These are plain descriptive records. Nothing checks that a generated
//! specification is internally consistent (e.g. that every page component
//! exists in `components`).

use serde::{Deserialize, Serialize};

/// A property accepted by a generated component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropSpec {
    pub name: String,
    /// TypeScript type expression, e.g. `Task[]` or `(id: string) => void`.
    #[serde(rename = "type")]
    pub prop_type: String,
    pub required: bool,
}

impl PropSpec {
    pub fn new(name: &str, prop_type: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            prop_type: prop_type.to_string(),
            required,
        }
    }
}

/// A piece of local state held by a generated component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub state_type: String,
    /// Initial value rendered verbatim into the `useState` call.
    pub initial_value: String,
}

impl StateSpec {
    pub fn new(name: &str, state_type: &str, initial_value: &str) -> Self {
        Self {
            name: name.to_string(),
            state_type: state_type.to_string(),
            initial_value: initial_value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    pub description: String,
    pub props: Vec<PropSpec>,
    pub state: Vec<StateSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub name: String,
    /// Route path, e.g. `/` or `/products/[id]`.
    pub path: String,
    /// Names of the components rendered on this page.
    pub components: Vec<String>,
}

impl PageSpec {
    pub fn new(name: &str, path: &str, components: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            components: components.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Target stack of the generated application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureSpec {
    pub framework: String,
    pub styling: String,
    pub state_management: String,
    pub data_layer: String,
}

impl Default for ArchitectureSpec {
    fn default() -> Self {
        Self {
            framework: "Next.js 14".to_string(),
            styling: "Tailwind CSS".to_string(),
            state_management: "React Hooks".to_string(),
            data_layer: "In-memory mock tools".to_string(),
        }
    }
}

/// The full description of an application synthesized from one user request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpecification {
    pub name: String,
    pub description: String,
    pub components: Vec<ComponentSpec>,
    pub pages: Vec<PageSpec>,
    pub dependencies: Vec<String>,
    pub architecture: ArchitectureSpec,
}

impl AppSpecification {
    /// Looks up a component by name.
    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name == name)
    }
}
