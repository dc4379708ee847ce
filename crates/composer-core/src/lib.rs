pub mod ai_client;
pub mod artifact;
pub mod config;
pub mod error;
pub mod message;
pub mod specification;
pub mod tool;

// Re-export common types
pub use error::{ComposerError, Result};
pub use message::AgentMessage;
pub use tool::ToolResult;
