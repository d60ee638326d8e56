// Filesystem tools confined to the data directory

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool, ToolTier};
use anyhow::{Context, Result};
use primer_core::{FileSandbox, FsError};
use serde::Deserialize;
use std::sync::Arc;

/// Caller-facing wording for a sandbox failure.
pub fn describe_fs_error(err: &FsError) -> String {
    match err {
        FsError::EmptyName { .. } => "Please enter a file name".to_string(),
        FsError::InvalidName { candidate } => format!("Invalid file name: {}", candidate),
        FsError::AbsolutePathRejected { candidate } => format!(
            "Absolute paths are not allowed: {}. Use a path relative to the data directory",
            candidate
        ),
        FsError::TraversalRejected { candidate } => {
            format!("Parent directory access (..) is not allowed: {}", candidate)
        }
        FsError::OutsideRoot { candidate } => {
            format!("Access outside the data directory is blocked: {}", candidate)
        }
        FsError::NotFound { candidate } => format!("File not found: {}", candidate),
        FsError::NotAFile { candidate } => format!("Not a file: {}", candidate),
        FsError::Io { candidate, source, .. } => {
            format!("File operation failed for {}: {}", candidate, source)
        }
    }
}

fn fs_error_result(err: &FsError) -> CallToolResult {
    CallToolResult::error(describe_fs_error(err))
}

/// All four filesystem tools over one sandbox, in listing order.
pub fn filesystem_tools(sandbox: Arc<FileSandbox>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ReadFileTool::new(sandbox.clone())),
        Arc::new(WriteFileTool::new(sandbox.clone())),
        Arc::new(ListFilesTool::new(sandbox.clone())),
        Arc::new(DeleteFileTool::new(sandbox)),
    ]
}

#[derive(Debug, Deserialize)]
struct FilenameArgs {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct WriteFileArgs {
    filename: String,
    content: String,
}

/// Read a text file from the data directory
pub struct ReadFileTool {
    sandbox: Arc<FileSandbox>,
}

impl ReadFileTool {
    pub fn new(sandbox: Arc<FileSandbox>) -> Self {
        Self { sandbox }
    }
}

#[async_trait::async_trait]
impl Tool for ReadFileTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "read_file".to_string(),
            description: "Read the contents of a file in the data directory".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "filename": json_schema_string("Name of the file (no directories)")
                }),
                vec!["filename"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: FilenameArgs =
            serde_json::from_value(arguments).context("Invalid arguments for read_file")?;

        Ok(match self.sandbox.read_to_string(&args.filename) {
            Ok(content) => CallToolResult::text(content),
            Err(e) => fs_error_result(&e),
        })
    }
}

/// Create or overwrite a file in the data directory
pub struct WriteFileTool {
    sandbox: Arc<FileSandbox>,
}

impl WriteFileTool {
    pub fn new(sandbox: Arc<FileSandbox>) -> Self {
        Self { sandbox }
    }
}

#[async_trait::async_trait]
impl Tool for WriteFileTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "write_file".to_string(),
            description: "Write a file in the data directory, replacing it if it exists"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "filename": json_schema_string("Name of the file (no directories)"),
                    "content": json_schema_string("Text to write")
                }),
                vec!["filename", "content"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: WriteFileArgs =
            serde_json::from_value(arguments).context("Invalid arguments for write_file")?;

        Ok(match self.sandbox.write(&args.filename, &args.content) {
            Ok(_) => CallToolResult::text(format!("File written: {}", args.filename)),
            Err(e) => fs_error_result(&e),
        })
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Write
    }
}

/// List the files in the data directory
pub struct ListFilesTool {
    sandbox: Arc<FileSandbox>,
}

impl ListFilesTool {
    pub fn new(sandbox: Arc<FileSandbox>) -> Self {
        Self { sandbox }
    }
}

#[async_trait::async_trait]
impl Tool for ListFilesTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_files".to_string(),
            description: "List the files in the data directory, sorted by name".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
        Ok(match self.sandbox.list() {
            Ok(files) => CallToolResult::text(serde_json::to_string(&files)?),
            Err(e) => fs_error_result(&e),
        })
    }
}

/// Delete a file from the data directory
pub struct DeleteFileTool {
    sandbox: Arc<FileSandbox>,
}

impl DeleteFileTool {
    pub fn new(sandbox: Arc<FileSandbox>) -> Self {
        Self { sandbox }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteFileTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_file".to_string(),
            description: "Delete a file from the data directory".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "filename": json_schema_string("Name of the file (no directories)")
                }),
                vec!["filename"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: FilenameArgs =
            serde_json::from_value(arguments).context("Invalid arguments for delete_file")?;

        Ok(match self.sandbox.delete(&args.filename) {
            Ok(()) => CallToolResult::text(format!("File deleted: {}", args.filename)),
            Err(e) => fs_error_result(&e),
        })
    }

    fn tier(&self) -> ToolTier {
        ToolTier::Destructive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primer_core::AllowedRoot;
    use serde_json::json;
    use tempfile::TempDir;

    fn sandbox(dir: &TempDir) -> Arc<FileSandbox> {
        Arc::new(FileSandbox::flat(AllowedRoot::new(dir.path()).unwrap()))
    }

    #[tokio::test]
    async fn test_write_read_list_delete() {
        let dir = TempDir::new().unwrap();
        let files = sandbox(&dir);

        let write = WriteFileTool::new(files.clone())
            .execute(json!({"filename": "test_write.txt", "content": "안녕하세요, MCP"}))
            .await
            .unwrap();
        assert!(!write.is_error());
        assert_eq!(write.joined_text(), "File written: test_write.txt");

        let read = ReadFileTool::new(files.clone())
            .execute(json!({"filename": "test_write.txt"}))
            .await
            .unwrap();
        assert_eq!(read.joined_text(), "안녕하세요, MCP");

        let list = ListFilesTool::new(files.clone()).execute(json!({})).await.unwrap();
        assert_eq!(list.joined_text(), r#"["test_write.txt"]"#);

        let delete = DeleteFileTool::new(files.clone())
            .execute(json!({"filename": "test_write.txt"}))
            .await
            .unwrap();
        assert_eq!(delete.joined_text(), "File deleted: test_write.txt");

        let reread = ReadFileTool::new(files)
            .execute(json!({"filename": "test_write.txt"}))
            .await
            .unwrap();
        assert!(reread.is_error());
        assert_eq!(reread.joined_text(), "Error: File not found: test_write.txt");
    }

    #[tokio::test]
    async fn test_rejected_names_are_error_results() {
        let dir = TempDir::new().unwrap();
        let tool = ReadFileTool::new(sandbox(&dir));

        for (name, expected) in [
            ("", "Please enter a file name"),
            ("../etc/passwd", "Invalid file name"),
            (".env", "Invalid file name"),
            ("/etc/passwd", "Absolute paths are not allowed"),
        ] {
            let result = tool.execute(json!({"filename": name})).await.unwrap();
            assert!(result.is_error(), "{name}");
            assert!(result.joined_text().contains(expected), "{name}: {}", result.joined_text());
        }
    }

    #[tokio::test]
    async fn test_missing_argument_is_err() {
        let dir = TempDir::new().unwrap();
        let tool = WriteFileTool::new(sandbox(&dir));
        assert!(tool.execute(json!({"filename": "a.txt"})).await.is_err());
    }

    #[test]
    fn test_tiers() {
        let dir = TempDir::new().unwrap();
        let tools = filesystem_tools(sandbox(&dir));
        let tiers: Vec<_> = tools.iter().map(|t| (t.schema().name, t.tier())).collect();
        assert_eq!(
            tiers,
            vec![
                ("read_file".to_string(), ToolTier::ReadOnly),
                ("write_file".to_string(), ToolTier::Write),
                ("list_files".to_string(), ToolTier::ReadOnly),
                ("delete_file".to_string(), ToolTier::Destructive),
            ]
        );
    }
}
