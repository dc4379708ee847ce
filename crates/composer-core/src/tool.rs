//! Result envelope shared by every mock tool.
//!
//! Tools never return `Err` to their callers. Failures are reported as
//! `{success: false, error}` so they can be rendered or serialized as-is.

use crate::error::{ComposerError, Result};
use serde::{Deserialize, Serialize};

/// `{success, data?, message?, error?}` returned by tool operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ToolResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Attaches a human-readable message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Converts an internal result, keeping only the error's display text.
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Converts back into a `Result` for callers that want `?`.
    pub fn into_result(self) -> Result<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(ComposerError::execution(
                self.error.unwrap_or_else(|| "tool returned no data".to_string()),
            )),
        }
    }
}

impl ToolResult<()> {
    /// Success without payload, e.g. logout or delete.
    pub fn done(message: impl Into<String>) -> Self {
        Self::ok(()).with_message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serialization_omits_data() {
        let result: ToolResult<u32> = ToolResult::fail("Record not found: x");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "Record not found: x"}));
    }

    #[test]
    fn test_from_result_maps_error_text() {
        let result: ToolResult<u32> =
            ToolResult::from_result(Err(ComposerError::not_found("File", "a.txt")));
        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("File not found: a.txt"));
    }

    #[test]
    fn test_into_result_round_trip() {
        assert_eq!(ToolResult::ok(7).into_result().unwrap(), 7);
        assert!(ToolResult::<u32>::fail("nope").into_result().is_err());
    }
}
