//! Renders an [`AppSpecification`] into source files.
//!
//! Templates are minijinja strings fed with small view structs, so all name
//! mangling (setter names, page component names, route files) happens here
//! in Rust rather than in template filters.

use composer_core::specification::{AppSpecification, ComponentSpec, PageSpec};
use composer_core::{ComposerError, Result};
use minijinja::{Environment, context};
use serde::Serialize;

const COMPONENT_TEMPLATE: &str = r#"import React{% if state %}, { useState }{% endif %} from 'react';

interface {{ name }}Props {
{%- for prop in props %}
  {{ prop.name }}{% if prop.optional %}?{% endif %}: {{ prop.ty }};
{%- endfor %}
}

/**
 * {{ description }}
 */
export default function {{ name }}({ {{ prop_names }} }: {{ name }}Props) {
{%- for s in state %}
  const [{{ s.name }}, {{ s.setter }}] = useState<{{ s.ty }}>({{ s.initial }});
{%- endfor %}

  return (
    <div className="p-4 rounded-lg border border-gray-200">
      <h2 className="text-lg font-semibold">{{ name }}</h2>
    </div>
  );
}
"#;

const PAGE_TEMPLATE: &str = r#"import React from 'react';
{% for c in components %}import {{ c }} from '{{ import_prefix }}components/{{ c }}';
{% endfor %}
export default function {{ component_name }}() {
  return (
    <main className="container mx-auto p-6">
      <h1 className="text-2xl font-bold mb-4">{{ title }}</h1>
{%- for c in components %}
      <{{ c }} />
{%- endfor %}
    </main>
  );
}
"#;

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

#[derive(Serialize)]
struct PropView<'a> {
    name: &'a str,
    ty: &'a str,
    optional: bool,
}

#[derive(Serialize)]
struct StateView<'a> {
    name: &'a str,
    setter: String,
    ty: &'a str,
    initial: &'a str,
}

pub struct CodeGenerator {
    env: Environment<'static>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Every component, every page and a `package.json`, in that order.
    pub fn generate(&self, spec: &AppSpecification) -> Result<Vec<GeneratedFile>> {
        let mut files = Vec::with_capacity(spec.components.len() + spec.pages.len() + 1);
        for component in &spec.components {
            files.push(self.component(component)?);
        }
        for page in &spec.pages {
            files.push(self.page(page)?);
        }
        files.push(package_manifest(spec)?);
        Ok(files)
    }

    pub fn component(&self, component: &ComponentSpec) -> Result<GeneratedFile> {
        let props: Vec<PropView> = component
            .props
            .iter()
            .map(|p| PropView {
                name: &p.name,
                ty: &p.prop_type,
                optional: !p.required,
            })
            .collect();
        let state: Vec<StateView> = component
            .state
            .iter()
            .map(|s| StateView {
                name: &s.name,
                setter: setter_name(&s.name),
                ty: &s.state_type,
                initial: &s.initial_value,
            })
            .collect();
        let prop_names = component
            .props
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let content = self.render(
            COMPONENT_TEMPLATE,
            context! {
                name => component.name,
                description => component.description,
                props,
                state,
                prop_names,
            },
        )?;
        Ok(GeneratedFile {
            path: format!("src/components/{}.tsx", component.name),
            content,
        })
    }

    pub fn page(&self, page: &PageSpec) -> Result<GeneratedFile> {
        let route = route_file(&page.path);
        let depth = route.matches('/').count();
        let import_prefix = "../".repeat(depth + 1);

        let content = self.render(
            PAGE_TEMPLATE,
            context! {
                title => page.name,
                component_name => page_component_name(&page.name),
                components => page.components,
                import_prefix,
            },
        )?;
        Ok(GeneratedFile {
            path: format!("src/pages/{}.tsx", route),
            content,
        })
    }

    fn render(&self, template: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .render_str(template, ctx)
            .map_err(|e| ComposerError::execution(format!("Template rendering failed: {}", e)))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn package_manifest(spec: &AppSpecification) -> Result<GeneratedFile> {
    let dependencies: serde_json::Map<String, serde_json::Value> = spec
        .dependencies
        .iter()
        .map(|d| (d.clone(), serde_json::Value::String("latest".to_string())))
        .collect();
    let manifest = serde_json::json!({
        "name": spec.name.to_lowercase(),
        "private": true,
        "description": spec.description,
        "scripts": { "dev": "next dev", "build": "next build" },
        "dependencies": dependencies,
    });
    Ok(GeneratedFile {
        path: "package.json".to_string(),
        content: serde_json::to_string_pretty(&manifest)?,
    })
}

/// `isOpen` -> `setIsOpen`.
fn setter_name(state: &str) -> String {
    let mut chars = state.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}

/// `/` -> `index`, `/products/[id]` -> `products/[id]`.
fn route_file(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `Product Details` -> `ProductDetailsPage`.
fn page_component_name(name: &str) -> String {
    let mut out: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect();
    out.push_str("Page");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_core::specification::SpecificationSynthesizer;

    #[test]
    fn test_component_file() {
        let spec = SpecificationSynthesizer::default().synthesize("a todo app");
        let generator = CodeGenerator::new();
        let file = generator.component(spec.component("TaskList").unwrap()).unwrap();

        assert_eq!(file.path, "src/components/TaskList.tsx");
        assert!(file.content.starts_with("import React, { useState } from 'react';"));
        assert!(file.content.contains("  tasks: Task[];"));
        assert!(file.content.contains("  onDelete?: (id: string) => void;"));
        assert!(file.content.contains("export default function TaskList({ tasks, onToggle, onDelete }: TaskListProps)"));
        assert!(file.content.contains("const [filter, setFilter] = useState<string>(\"all\");"));
    }

    #[test]
    fn test_stateless_component_skips_use_state() {
        let spec = SpecificationSynthesizer::default().synthesize("analytics dashboard");
        let file = CodeGenerator::new()
            .component(spec.component("MetricsCard").unwrap())
            .unwrap();
        assert!(file.content.starts_with("import React from 'react';"));
        assert!(!file.content.contains("useState"));
    }

    #[test]
    fn test_nested_route_page() {
        let spec = SpecificationSynthesizer::default().synthesize("an online store");
        let generator = CodeGenerator::new();
        let details = generator.page(&spec.pages[1]).unwrap();

        assert_eq!(details.path, "src/pages/products/[id].tsx");
        assert!(details.content.contains("import ProductCard from '../../components/ProductCard';"));
        assert!(details.content.contains("export default function ProductDetailsPage()"));
        assert!(details.content.contains("      <ProductCard />"));
    }

    #[test]
    fn test_generate_lists_every_file() {
        let spec = SpecificationSynthesizer::default().synthesize("a todo app");
        let paths: Vec<String> = CodeGenerator::new()
            .generate(&spec)
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "src/components/TaskList.tsx",
                "src/components/TaskForm.tsx",
                "src/pages/index.tsx",
                "package.json",
            ]
        );
    }

    #[test]
    fn test_package_manifest_dependencies() {
        let spec = SpecificationSynthesizer::default().synthesize("a todo app");
        let manifest = package_manifest(&spec).unwrap();
        let json: serde_json::Value = serde_json::from_str(&manifest.content).unwrap();
        assert_eq!(json["dependencies"]["uuid"], "latest");
        assert_eq!(json["dependencies"]["react"], "latest");
    }

    #[test]
    fn test_name_helpers() {
        assert_eq!(setter_name("isOpen"), "setIsOpen");
        assert_eq!(route_file("/"), "index");
        assert_eq!(page_component_name("Task Manager"), "TaskManagerPage");
    }
}
