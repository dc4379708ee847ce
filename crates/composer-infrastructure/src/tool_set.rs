//! Bundle of every mock tool, shared by reference.

use crate::api_test_tool::ApiTestTool;
use crate::auth_tool::AuthTool;
use crate::database_tool::DatabaseTool;
use crate::deployment_tool::DeploymentTool;
use crate::filesystem_tool::FileSystemTool;
use crate::validation_tool::ValidationTool;
use composer_core::config::ComposerConfig;
use std::sync::Arc;

/// One instance of each tool. Cloning shares the underlying state.
#[derive(Clone)]
pub struct ToolSet {
    pub auth: Arc<AuthTool>,
    pub database: Arc<DatabaseTool>,
    pub filesystem: Arc<FileSystemTool>,
    pub validation: Arc<ValidationTool>,
    pub deployment: Arc<DeploymentTool>,
    pub api_test: Arc<ApiTestTool>,
}

impl ToolSet {
    pub fn new(config: &ComposerConfig) -> Self {
        Self {
            auth: Arc::new(AuthTool::new(&config.auth)),
            database: Arc::new(DatabaseTool::new()),
            filesystem: Arc::new(FileSystemTool::new()),
            validation: Arc::new(ValidationTool::new()),
            deployment: Arc::new(DeploymentTool::new(config.deployment.clone())),
            api_test: Arc::new(ApiTestTool::new()),
        }
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new(&ComposerConfig::default())
    }
}
