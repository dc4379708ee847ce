//! Application layer for the composer.
//!
//! This crate wires the mock tools and the mock SDK together and runs the
//! agent pipeline on top of them.

pub mod composer_usecase;
pub mod orchestrator;

pub use composer_usecase::ComposerUseCase;
pub use orchestrator::{AgentOrchestrator, CodeGenerator, GeneratedFile};
