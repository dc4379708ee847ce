//! Agent orchestration.
//!
//! # Module Structure
//!
//! - `agent_orchestrator`: the three-phase pipeline and its chat history
//! - `codegen`: minijinja rendering of components, pages and `package.json`
//!
//! # Usage
//!
//! ```ignore
//! let mut orchestrator = AgentOrchestrator::new().with_sink(filesystem);
//! let history = orchestrator.process_user_input("a todo app").await;
//! ```

mod agent_orchestrator;
mod codegen;

pub use agent_orchestrator::AgentOrchestrator;
pub use codegen::{CodeGenerator, GeneratedFile};
