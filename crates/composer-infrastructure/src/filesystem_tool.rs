//! In-memory filesystem tool.
//!
//! Files are a `path -> content` map and directories a set of known paths.
//! Paths are relative, `/`-separated and normalized; the empty path is the
//! root and always exists.

use composer_core::artifact::ArtifactSink;
use composer_core::{ComposerError, Result, ToolResult};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use strum::Display;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
    /// Content length in bytes; `None` for directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl FileEntry {
    fn file(path: &str, size: usize) -> Self {
        Self {
            path: path.to_string(),
            name: file_name(path).to_string(),
            kind: EntryKind::File,
            size: Some(size),
        }
    }

    fn directory(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: file_name(path).to_string(),
            kind: EntryKind::Directory,
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStatus {
    pub path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
}

#[derive(Default)]
struct FsState {
    files: BTreeMap<String, String>,
    directories: BTreeSet<String>,
}

impl FsState {
    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.directories.contains(path)
    }

    /// Registers every ancestor directory of `path`, plus `path` itself when
    /// `include_self` is set.
    fn create_parents(&mut self, path: &str, include_self: bool) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        let segments: Vec<&str> = path.split('/').collect();
        let end = if include_self { segments.len() } else { segments.len() - 1 };
        for i in 1..=end {
            let dir = segments[..i].join("/");
            if self.files.contains_key(&dir) {
                return Err(ComposerError::invalid_input(format!(
                    "Cannot create directory '{}': a file exists at that path",
                    dir
                )));
            }
            self.directories.insert(dir);
        }
        Ok(())
    }
}

pub struct FileSystemTool {
    state: RwLock<FsState>,
}

impl FileSystemTool {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(FsState::default()),
        }
    }

    /// Writes a file, creating any missing parent directories.
    pub async fn write_file(&self, path: &str, content: &str) -> ToolResult<FileEntry> {
        match self.try_write(path, content).await {
            Ok(entry) => {
                tracing::debug!(target: "composer::tools::filesystem", path = %entry.path, bytes = content.len(), "File written");
                let message = format!("File written: {}", entry.path);
                ToolResult::ok(entry).with_message(message)
            }
            Err(e) => ToolResult::fail(e.to_string()),
        }
    }

    async fn try_write(&self, path: &str, content: &str) -> Result<FileEntry> {
        let path = normalize_path(path)?;
        if path.is_empty() {
            return Err(ComposerError::invalid_input("File path is required"));
        }

        let mut state = self.state.write().await;
        if state.directories.contains(&path) {
            return Err(ComposerError::invalid_input(format!(
                "'{}' is a directory",
                path
            )));
        }
        state.create_parents(&path, false)?;
        state.files.insert(path.clone(), content.to_string());
        Ok(FileEntry::file(&path, content.len()))
    }

    pub async fn read_file(&self, path: &str) -> ToolResult<String> {
        let result = match normalize_path(path) {
            Ok(path) => self
                .state
                .read()
                .await
                .files
                .get(&path)
                .cloned()
                .ok_or_else(|| ComposerError::not_found("File", path)),
            Err(e) => Err(e),
        };
        ToolResult::from_result(result)
    }

    pub async fn create_directory(&self, path: &str) -> ToolResult<FileEntry> {
        let result = match normalize_path(path) {
            Ok(path) => {
                let mut state = self.state.write().await;
                state
                    .create_parents(&path, true)
                    .map(|_| FileEntry::directory(&path))
            }
            Err(e) => Err(e),
        };
        ToolResult::from_result(result)
    }

    /// Removes a file, or a directory together with everything below it.
    pub async fn delete(&self, path: &str) -> ToolResult<()> {
        let path = match normalize_path(path) {
            Ok(path) if !path.is_empty() => path,
            Ok(_) => return ToolResult::fail("Cannot delete the root directory"),
            Err(e) => return ToolResult::fail(e.to_string()),
        };

        let mut state = self.state.write().await;
        if state.files.remove(&path).is_some() {
            return ToolResult::done(format!("Deleted file: {}", path));
        }
        if state.directories.remove(&path) {
            let prefix = format!("{}/", path);
            state.files.retain(|p, _| !p.starts_with(&prefix));
            state.directories.retain(|p| !p.starts_with(&prefix));
            return ToolResult::done(format!("Deleted directory: {}", path));
        }
        ToolResult::fail(ComposerError::not_found("Path", path).to_string())
    }

    pub async fn exists(&self, path: &str) -> ToolResult<PathStatus> {
        let path = match normalize_path(path) {
            Ok(path) => path,
            Err(e) => return ToolResult::fail(e.to_string()),
        };

        let state = self.state.read().await;
        let kind = if state.files.contains_key(&path) {
            Some(EntryKind::File)
        } else if state.is_dir(&path) {
            Some(EntryKind::Directory)
        } else {
            None
        };

        ToolResult::ok(PathStatus {
            path,
            exists: kind.is_some(),
            kind,
        })
    }

    /// Lists a directory. Without `recursive` only direct children are
    /// returned; with it, everything whose path starts with the directory.
    pub async fn list(&self, path: &str, recursive: bool) -> ToolResult<Vec<FileEntry>> {
        let path = match normalize_path(path) {
            Ok(path) => path,
            Err(e) => return ToolResult::fail(e.to_string()),
        };

        let state = self.state.read().await;
        if !state.is_dir(&path) {
            return ToolResult::fail(ComposerError::not_found("Directory", path).to_string());
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path)
        };
        let in_scope = |candidate: &str| {
            candidate
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.is_empty() && (recursive || !rest.contains('/')))
        };

        let directories = state
            .directories
            .iter()
            .filter(|d| in_scope(d.as_str()))
            .map(|d| FileEntry::directory(d));
        let files = state
            .files
            .iter()
            .filter(|(f, _)| in_scope(f.as_str()))
            .map(|(f, content)| FileEntry::file(f, content.len()));

        ToolResult::ok(directories.chain(files).collect())
    }
}

impl Default for FileSystemTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ArtifactSink for FileSystemTool {
    async fn write_artifact(&self, path: &str, content: &str) -> Result<()> {
        self.write_file(path, content).await.into_result().map(|_| ())
    }
}

/// Strips `./`, leading and trailing `/` and empty segments. `..` is rejected.
fn normalize_path(path: &str) -> Result<String> {
    let mut segments = Vec::new();
    for segment in path.trim().split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(ComposerError::invalid_input(format!(
                    "Parent segments are not allowed: {}",
                    path
                )));
            }
            s => segments.push(s),
        }
    }
    Ok(segments.join("/"))
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let fs = FileSystemTool::new();
        assert!(fs.write_file("a/b/c.txt", "x").await.success);

        let status = fs.exists("a/b").await.data.unwrap();
        assert!(status.exists);
        assert_eq!(status.kind, Some(EntryKind::Directory));

        let status = fs.exists("a").await.data.unwrap();
        assert_eq!(status.kind, Some(EntryKind::Directory));

        let status = fs.exists("a/b/c.txt").await.data.unwrap();
        assert_eq!(status.kind, Some(EntryKind::File));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let fs = FileSystemTool::new();
        let result = fs.read_file("nope.txt").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("File not found: nope.txt"));
    }

    #[tokio::test]
    async fn test_paths_are_normalized() {
        let fs = FileSystemTool::new();
        fs.write_file("./src//App.tsx", "export default App;").await;
        assert_eq!(
            fs.read_file("/src/App.tsx").await.data.as_deref(),
            Some("export default App;")
        );
        assert!(!fs.write_file("../escape.txt", "x").await.success);
    }

    #[tokio::test]
    async fn test_list_direct_children_and_recursive() {
        let fs = FileSystemTool::new();
        fs.write_file("src/App.tsx", "app").await;
        fs.write_file("src/components/Button.tsx", "button").await;
        fs.write_file("README.md", "readme").await;

        let root: Vec<String> = fs.list("", false).await.data.unwrap().into_iter().map(|e| e.path).collect();
        assert_eq!(root, vec!["src", "README.md"]);

        let src: Vec<String> = fs.list("src", false).await.data.unwrap().into_iter().map(|e| e.path).collect();
        assert_eq!(src, vec!["src/components", "src/App.tsx"]);

        let all = fs.list("src", true).await.data.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|e| e.path == "src/components/Button.tsx" && e.size == Some(6)));

        assert!(!fs.list("missing", false).await.success);
    }

    #[tokio::test]
    async fn test_prefix_does_not_match_sibling_directory() {
        let fs = FileSystemTool::new();
        fs.write_file("src/a.ts", "").await;
        fs.write_file("src-old/b.ts", "").await;

        let entries = fs.list("src", true).await.data.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "src/a.ts");
    }

    #[tokio::test]
    async fn test_delete_directory_removes_subtree() {
        let fs = FileSystemTool::new();
        fs.write_file("pages/index.tsx", "").await;
        fs.write_file("pages/blog/post.tsx", "").await;

        assert!(fs.delete("pages").await.success);
        assert!(!fs.exists("pages/blog/post.tsx").await.data.unwrap().exists);
        assert!(!fs.exists("pages/blog").await.data.unwrap().exists);
        assert!(!fs.delete("pages").await.success);
        assert!(!fs.delete("/").await.success);
    }

    #[tokio::test]
    async fn test_file_and_directory_conflicts() {
        let fs = FileSystemTool::new();
        fs.write_file("a/b", "file").await;
        assert!(!fs.write_file("a/b/c.txt", "x").await.success);
        assert!(!fs.write_file("a", "x").await.success);
        assert!(fs.create_directory("docs/api").await.success);
        assert!(fs.exists("docs").await.data.unwrap().exists);
    }

    #[tokio::test]
    async fn test_artifact_sink_writes_files() {
        let fs = FileSystemTool::new();
        let sink: &dyn ArtifactSink = &fs;
        sink.write_artifact("src/components/TaskList.tsx", "tsx").await.unwrap();
        assert_eq!(
            fs.read_file("src/components/TaskList.tsx").await.data.as_deref(),
            Some("tsx")
        );
    }
}
