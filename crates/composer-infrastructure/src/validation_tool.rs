//! Heuristic content validation tool.
//!
//! Stateless. Each [`ValidationKind`] runs a fixed set of regex and
//! substring checks that sort findings into errors, warnings and
//! suggestions. There is no rule configuration and no severity beyond
//! those three buckets.

use composer_core::ToolResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ValidationKind {
    Code,
    Schema,
    Security,
    Performance,
    Accessibility,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationReport {
    fn finish(mut self) -> Self {
        self.valid = self.errors.is_empty();
        self
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn suggest(&mut self, message: &str) {
        self.suggestions.push(message.to_string());
    }
}

static CONSOLE_LOG: Lazy<Regex> = Lazy::new(|| Regex::new(r"console\.(log|debug)\s*\(").unwrap());
static VAR_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bvar\s+\w+").unwrap());
static ANY_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*any\b").unwrap());
static EXPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bexport\b").unwrap());
static EVAL_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\beval\s*\(|new\s+Function\s*\(").unwrap());
static HARDCODED_SECRET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(password|secret|api_?key|token)\s*[:=]\s*["'][^"']+["']"#).unwrap()
});
static INSECURE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"http://[^\s'\x22]+").unwrap());
static LOOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfor\s*\(|\bwhile\s*\(|\.forEach\s*\(").unwrap());
static INLINE_HANDLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"on[A-Z]\w*=\{\s*\(").unwrap());
static MAP_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.map\s*\(").unwrap());
static IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<img\b[^>]*>").unwrap());
static INPUT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<input\b[^>]*>").unwrap());
static CLICKABLE_DIV: Lazy<Regex> = Lazy::new(|| Regex::new(r"<div\b[^>]*onClick").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationTool;

impl ValidationTool {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, content: &str, kind: ValidationKind) -> ToolResult<ValidationReport> {
        if content.trim().is_empty() {
            return ToolResult::fail("Content is required for validation");
        }

        let report = match kind {
            ValidationKind::Code => check_code(content),
            ValidationKind::Schema => check_schema(content),
            ValidationKind::Security => check_security(content),
            ValidationKind::Performance => check_performance(content),
            ValidationKind::Accessibility => check_accessibility(content),
        }
        .finish();

        tracing::debug!(
            target: "composer::tools::validation",
            %kind,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validation finished"
        );

        let message = if report.valid {
            format!("{} validation passed", kind)
        } else {
            format!("{} validation failed with {} error(s)", kind, report.errors.len())
        };
        ToolResult::ok(report).with_message(message)
    }
}

fn is_balanced(content: &str) -> bool {
    let mut stack = Vec::new();
    for c in content.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

fn check_code(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    if !is_balanced(content) {
        report.error("Unbalanced brackets, braces or parentheses");
    }
    if CONSOLE_LOG.is_match(content) {
        report.warn("Remove console.log statements before shipping");
    }
    if ANY_TYPE.is_match(content) {
        report.warn("Avoid the `any` type; prefer a precise type");
    }
    if VAR_DECL.is_match(content) {
        report.suggest("Use `let` or `const` instead of `var`");
    }
    if !EXPORT.is_match(content) {
        report.suggest("Export the component so it can be reused");
    }
    report
}

fn check_schema(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(serde_json::Value::Object(schema)) => {
            if !schema.contains_key("type") {
                report.warn("Schema has no `type` field");
            }
            if schema.get("type").and_then(|t| t.as_str()) == Some("object")
                && !schema.contains_key("properties")
            {
                report.warn("Object schema declares no `properties`");
            }
            if !schema.contains_key("required") {
                report.suggest("List required fields explicitly");
            }
        }
        Ok(_) => report.error("Schema must be a JSON object"),
        Err(e) => report.errors.push(format!("Invalid JSON: {}", e)),
    }
    report
}

fn check_security(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    if EVAL_CALL.is_match(content) {
        report.error("Dynamic code evaluation (eval / new Function) is not allowed");
    }
    if HARDCODED_SECRET.is_match(content) {
        report.error("Hardcoded credential detected");
    }
    if content.contains("dangerouslySetInnerHTML") || content.contains(".innerHTML") {
        report.warn("Raw HTML injection can lead to XSS");
    }
    if INSECURE_URL.is_match(content) {
        report.warn("Insecure http:// URL; use https://");
    }
    if content.contains("localStorage") {
        report.suggest("Avoid storing sensitive data in localStorage");
    }
    report
}

fn check_performance(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    if LOOP.find_iter(content).count() > 2 {
        report.warn("Many loops detected; check for nested iteration");
    }
    if MAP_CALL.is_match(content) && !content.contains("key=") {
        report.warn("List rendering without a `key` prop");
    }
    if INLINE_HANDLER.is_match(content) {
        report.suggest("Wrap inline event handlers in useCallback");
    }
    if content.contains("useEffect") && !content.contains("], ") && !content.contains("[])") {
        report.suggest("Check useEffect dependency arrays");
    }
    report
}

fn check_accessibility(content: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    if IMG_TAG.find_iter(content).any(|m| !m.as_str().contains("alt=")) {
        report.error("Images must have alt text");
    }
    if INPUT_TAG
        .find_iter(content)
        .any(|m| !m.as_str().contains("aria-label") && !m.as_str().contains("id="))
    {
        report.warn("Inputs need a label or aria-label");
    }
    if CLICKABLE_DIV.is_match(content) {
        report.warn("Clickable div; use a button or add role and keyboard handling");
    }
    if !content.contains("aria-") {
        report.suggest("Consider ARIA attributes for assistive technology");
    }
    report
}
