//! Specification domain module.
//!
//! # Module Structure
//!
//! - `model`: `AppSpecification` and its component/page/prop/state records
//! - `intent`: ordered keyword rules and the `IntentClassifier`
//! - `synthesis`: requirement, component and page synthesis plus app naming
//!
//! # Usage
//!
//! ```ignore
//! use composer_core::specification::{SpecificationSynthesizer, derive_app_name};
//! ```

mod intent;
mod model;
mod synthesis;

// Re-export public API
pub use intent::{DEFAULT_RULES, IntentCategory, IntentClassifier, IntentMatch, IntentRule};
pub use model::{AppSpecification, ArchitectureSpec, ComponentSpec, PageSpec, PropSpec, StateSpec};
pub use synthesis::{DEFAULT_APP_NAME, SpecificationSynthesizer, derive_app_name};
