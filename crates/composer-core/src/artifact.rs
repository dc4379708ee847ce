//! Destination for generated source files.

use crate::error::Result;

/// Somewhere the code-generation phase can put rendered files.
///
/// The in-memory filesystem tool implements this; tests plug in their own.
#[async_trait::async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn write_artifact(&self, path: &str, content: &str) -> Result<()>;
}
