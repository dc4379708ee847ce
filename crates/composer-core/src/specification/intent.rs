//! Rule-based intent classification.
//!
//! A request is matched against an ordered list of `(category, keywords)`
//! rules using case-insensitive substring search. Every rule is evaluated
//! once per input and several categories may fire together. Matching is on
//! raw substrings, so "workshop" fires [`IntentCategory::ECommerce`].

use super::model::{ComponentSpec, PageSpec, PropSpec, StateSpec};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Kind of application a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum IntentCategory {
    #[strum(to_string = "task management")]
    TaskManagement,
    #[strum(to_string = "e-commerce")]
    ECommerce,
    #[strum(to_string = "dashboard")]
    Dashboard,
}

/// One classification rule: the category fires when any keyword occurs.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub category: IntentCategory,
    pub keywords: &'static [&'static str],
}

/// Rules in evaluation order. Order matters for first-match-wins decisions
/// such as page layout.
pub const DEFAULT_RULES: &[IntentRule] = &[
    IntentRule {
        category: IntentCategory::TaskManagement,
        keywords: &["todo", "task"],
    },
    IntentRule {
        category: IntentCategory::ECommerce,
        keywords: &["e-commerce", "shop", "store"],
    },
    IntentRule {
        category: IntentCategory::Dashboard,
        keywords: &["dashboard", "analytics"],
    },
];

/// A rule that fired, with the first keyword that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentMatch {
    pub category: IntentCategory,
    pub keyword: &'static str,
}

/// Evaluates an ordered rule list against free text.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl IntentClassifier {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Returns every matching rule in rule order.
    pub fn classify(&self, text: &str) -> Vec<IntentMatch> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.keywords
                    .iter()
                    .find(|kw| lower.contains(*kw))
                    .map(|kw| IntentMatch {
                        category: rule.category,
                        keyword: *kw,
                    })
            })
            .collect()
    }

    /// Returns the categories that fired, in rule order.
    pub fn categories(&self, text: &str) -> Vec<IntentCategory> {
        self.classify(text).into_iter().map(|m| m.category).collect()
    }

    /// Returns the first category that fired.
    pub fn primary(&self, text: &str) -> Option<IntentCategory> {
        self.classify(text).first().map(|m| m.category)
    }
}

impl IntentCategory {
    /// Requirement bullets reported by the conversation phase.
    pub fn requirements(&self) -> &'static [&'static str] {
        match self {
            Self::TaskManagement => &[
                "Create, edit and delete tasks",
                "Mark tasks as complete",
                "Filter tasks by status",
            ],
            Self::ECommerce => &[
                "Product catalog with images and prices",
                "Shopping cart management",
                "Checkout flow",
            ],
            Self::Dashboard => &[
                "Key metric overview cards",
                "Interactive analytics charts",
                "Date range filtering",
            ],
        }
    }

    /// Extra npm packages the category needs on top of the base stack.
    pub fn dependencies(&self) -> &'static [&'static str] {
        match self {
            Self::TaskManagement => &["uuid"],
            Self::ECommerce => &["zustand"],
            Self::Dashboard => &["recharts"],
        }
    }

    pub fn components(&self) -> Vec<ComponentSpec> {
        match self {
            Self::TaskManagement => vec![
                ComponentSpec {
                    name: "TaskList".to_string(),
                    description: "Displays the list of tasks with completion toggles".to_string(),
                    props: vec![
                        PropSpec::new("tasks", "Task[]", true),
                        PropSpec::new("onToggle", "(id: string) => void", true),
                        PropSpec::new("onDelete", "(id: string) => void", false),
                    ],
                    state: vec![StateSpec::new("filter", "string", "\"all\"")],
                },
                ComponentSpec {
                    name: "TaskForm".to_string(),
                    description: "Form for adding a new task".to_string(),
                    props: vec![PropSpec::new("onSubmit", "(title: string) => void", true)],
                    state: vec![StateSpec::new("title", "string", "\"\"")],
                },
            ],
            Self::ECommerce => vec![
                ComponentSpec {
                    name: "ProductCard".to_string(),
                    description: "Shows a product with its image, price and add-to-cart button"
                        .to_string(),
                    props: vec![
                        PropSpec::new("product", "Product", true),
                        PropSpec::new("onAddToCart", "(product: Product) => void", true),
                    ],
                    state: vec![StateSpec::new("quantity", "number", "1")],
                },
                ComponentSpec {
                    name: "ShoppingCart".to_string(),
                    description: "Lists cart items and totals".to_string(),
                    props: vec![
                        PropSpec::new("items", "CartItem[]", true),
                        PropSpec::new("onCheckout", "() => void", true),
                    ],
                    state: vec![StateSpec::new("isOpen", "boolean", "false")],
                },
            ],
            Self::Dashboard => vec![
                ComponentSpec {
                    name: "MetricsCard".to_string(),
                    description: "Highlights a single key metric and its trend".to_string(),
                    props: vec![
                        PropSpec::new("title", "string", true),
                        PropSpec::new("value", "number", true),
                        PropSpec::new("trend", "number", false),
                    ],
                    state: vec![],
                },
                ComponentSpec {
                    name: "AnalyticsChart".to_string(),
                    description: "Renders time-series data as a chart".to_string(),
                    props: vec![
                        PropSpec::new("data", "DataPoint[]", true),
                        PropSpec::new("variant", "\"line\" | \"bar\"", false),
                    ],
                    state: vec![StateSpec::new("range", "string", "\"7d\"")],
                },
            ],
        }
    }

    pub fn pages(&self) -> Vec<PageSpec> {
        match self {
            Self::TaskManagement => vec![PageSpec::new("Task Manager", "/", &["TaskList", "TaskForm"])],
            Self::ECommerce => vec![
                PageSpec::new("Shop", "/", &["ProductCard", "ShoppingCart"]),
                PageSpec::new("Product Details", "/products/[id]", &["ProductCard"]),
            ],
            Self::Dashboard => vec![PageSpec::new("Dashboard", "/", &["MetricsCard", "AnalyticsChart"])],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_case_insensitive() {
        let classifier = IntentClassifier::default();
        assert_eq!(
            classifier.categories("My TODO list"),
            vec![IntentCategory::TaskManagement]
        );
    }

    #[test]
    fn test_multiple_categories_fire_in_rule_order() {
        let classifier = IntentClassifier::default();
        let categories = classifier.categories("analytics for my shop and tasks");
        assert_eq!(
            categories,
            vec![
                IntentCategory::TaskManagement,
                IntentCategory::ECommerce,
                IntentCategory::Dashboard
            ]
        );
    }

    #[test]
    fn test_first_keyword_is_reported() {
        let classifier = IntentClassifier::default();
        let matches = classifier.classify("an online store and shop");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].keyword, "shop");
    }

    #[test]
    fn test_substring_match_includes_workshop() {
        let classifier = IntentClassifier::default();
        assert_eq!(
            classifier.primary("a workshop signup page"),
            Some(IntentCategory::ECommerce)
        );
    }

    #[test]
    fn test_no_match() {
        let classifier = IntentClassifier::default();
        assert!(classifier.classify("a blog about birds").is_empty());
        assert_eq!(classifier.primary("a blog about birds"), None);
    }
}
