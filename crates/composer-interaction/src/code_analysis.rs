//! Static text metrics for generated component source.
//!
//! Plain regex counting, no parsing. Results are only as good as the source
//! is conventional.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

static BRANCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bif\b|\belse\b|\bfor\b|\bwhile\b|\bcase\b|\bcatch\b|&&|\|\||\?[^.?:]").unwrap()
});
static COMPONENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+(?:default\s+)?)?(?:function|const)\s+([A-Z][A-Za-z0-9_]*)").unwrap()
});
static HOOK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(use[A-Z][A-Za-z0-9]*)\s*(?:<[^>()]*>)?\s*\(").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

/// Cyclomatic-style score: one plus the number of branch tokens.
pub fn calculate_complexity(code: &str) -> usize {
    1 + BRANCH.find_iter(code).count()
}

pub fn complexity_level(score: usize) -> ComplexityLevel {
    match score {
        0..=5 => ComplexityLevel::Low,
        6..=10 => ComplexityLevel::Medium,
        _ => ComplexityLevel::High,
    }
}

/// First capitalized function or const declaration, if any.
pub fn extract_component_name(code: &str) -> Option<String> {
    COMPONENT_NAME
        .captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Distinct hooks in order of first use.
pub fn detect_hooks(code: &str) -> Vec<String> {
    let mut hooks: Vec<String> = Vec::new();
    for capture in HOOK.captures_iter(code) {
        let name = &capture[1];
        if !hooks.iter().any(|h| h == name) {
            hooks.push(name.to_string());
        }
    }
    hooks
}

/// Non-blank lines.
pub fn count_lines(code: &str) -> usize {
    code.lines().filter(|line| !line.trim().is_empty()).count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetrics {
    pub component_name: Option<String>,
    pub complexity: usize,
    pub level: ComplexityLevel,
    pub hooks: Vec<String>,
    pub lines: usize,
}

impl CodeMetrics {
    pub fn from_source(code: &str) -> Self {
        let complexity = calculate_complexity(code);
        Self {
            component_name: extract_component_name(code),
            complexity,
            level: complexity_level(complexity),
            hooks: detect_hooks(code),
            lines: count_lines(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
import React, { useState, useEffect } from 'react';

export default function TaskList({ tasks }) {
  const [filter, setFilter] = useState('all');
  const [items, setItems] = useState(tasks);

  useEffect(() => {
    if (filter === 'done') {
      setItems(tasks.filter(t => t.done));
    } else {
      setItems(tasks);
    }
  }, [filter, tasks]);

  return <ul>{items.map(t => <li key={t.id}>{t.title}</li>)}</ul>;
}
"#;

    #[test]
    fn test_metrics_for_sample() {
        let metrics = CodeMetrics::from_source(SAMPLE);
        assert_eq!(metrics.component_name.as_deref(), Some("TaskList"));
        assert_eq!(metrics.hooks, vec!["useState", "useEffect"]);
        assert_eq!(metrics.complexity, 3);
        assert_eq!(metrics.level, ComplexityLevel::Low);
        assert_eq!(metrics.lines, 13);
    }

    #[test]
    fn test_complexity_levels() {
        assert_eq!(complexity_level(1), ComplexityLevel::Low);
        assert_eq!(complexity_level(8), ComplexityLevel::Medium);
        assert_eq!(complexity_level(11), ComplexityLevel::High);
    }

    #[test]
    fn test_arrow_component_name() {
        assert_eq!(
            extract_component_name("const ProductCard = () => null;").as_deref(),
            Some("ProductCard")
        );
        assert_eq!(extract_component_name("const x = 1;"), None);
    }

    #[test]
    fn test_hooks_with_type_arguments() {
        assert_eq!(
            detect_hooks("const [open, setOpen] = useState<boolean>(false); useMemo(() => 1, []);"),
            vec!["useState", "useMemo"]
        );
    }
}
