//! AI-facing layer: the mock Tambo SDK and the MCP-style wrapper over it.
//!
//! # Module Structure
//!
//! - `tambo_client`: [`TamboClient`], the canned-response [`AiClient`] implementation
//! - `mcp_integration`: prompt templates forwarded to any [`AiClient`]
//! - `code_analysis`: regex metrics over component source
//!
//! [`AiClient`]: composer_core::ai_client::AiClient

pub mod code_analysis;
pub mod mcp_integration;
pub mod tambo_client;

pub use code_analysis::{CodeMetrics, ComplexityLevel};
pub use mcp_integration::{CodeAnalysis, ComponentRequest, McpIntegration};
pub use tambo_client::{ChatTurn, TamboClient, TurnRole};
