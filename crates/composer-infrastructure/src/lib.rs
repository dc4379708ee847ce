//! Mock tools and configuration loading.
//!
//! # Module Structure
//!
//! - `auth_tool`: credential check, single session, role permissions
//! - `database_tool`: four JSON collections with CRUD and subset queries
//! - `filesystem_tool`: in-memory file tree, also an `ArtifactSink`
//! - `validation_tool`: heuristic checks over code, schemas and markup
//! - `deployment_tool`: delayed status pipeline with a fabricated URL
//! - `api_test_tool`: registered endpoints with fabricated responses
//! - `tool_set`: one shared instance of each tool
//! - `config_service`: cached `config.toml` loading
//!
//! # Usage
//!
//! ```ignore
//! let config = ConfigService::new().get_config();
//! let tools = ToolSet::new(&config);
//! tools.filesystem.write_file("src/App.tsx", "...").await;
//! ```

pub mod api_test_tool;
pub mod auth_tool;
pub mod config_service;
pub mod database_tool;
pub mod deployment_tool;
pub mod filesystem_tool;
pub mod tool_set;
pub mod validation_tool;

pub use api_test_tool::{ApiTestTool, EndpointConfig, EndpointTestResult, HttpMethod};
pub use auth_tool::{AuthSession, AuthTool, Credentials, Permission, Role, User};
pub use config_service::ConfigService;
pub use database_tool::{CollectionInfo, DatabaseTool};
pub use deployment_tool::{Deployment, DeploymentRequest, DeploymentStatus, DeploymentTool};
pub use filesystem_tool::{EntryKind, FileEntry, FileSystemTool, PathStatus};
pub use tool_set::ToolSet;
pub use validation_tool::{ValidationKind, ValidationReport, ValidationTool};
