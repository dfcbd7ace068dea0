//! File operation tools: read, write

use parley_domain::{
    ReadArgs, RiskLevel, Session, ToolDefinition, ToolError, ToolParameter, ToolResult,
    ToolResultMetadata, WriteArgs,
};
use std::fs;
use std::sync::{Arc, Mutex};

/// Tool name constants
pub const READ: &str = "read";
pub const WRITE: &str = "write";

/// Default number of lines returned by read
const DEFAULT_READ_LIMIT: usize = 50;

/// Maximum file size to read (10 MiB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Get the tool definition for read
pub fn read_definition() -> ToolDefinition {
    ToolDefinition::new(READ, "Read a file from the filesystem.", RiskLevel::Low)
        .with_parameter(
            ToolParameter::new("file_path", "The path to the file to read", true).with_type("path"),
        )
        .with_parameter(
            ToolParameter::new(
                "offset",
                "The line number to start reading from (0-based)",
                false,
            )
            .with_type("number"),
        )
        .with_parameter(
            ToolParameter::new("limit", "The number of lines to read (defaults to 50)", false)
                .with_type("number"),
        )
}

/// Get the tool definition for write
pub fn write_definition() -> ToolDefinition {
    ToolDefinition::new(WRITE, "Write a file to the filesystem.", RiskLevel::High)
        .with_parameter(
            ToolParameter::new("file_path", "The path to the file to write", true)
                .with_type("path"),
        )
        .with_parameter(
            ToolParameter::new("content", "The content to write to the file", true)
                .with_type("string"),
        )
}

/// Execute the read tool: a numbered slice of the file's lines.
///
/// A missing file is a `NOT_FOUND` result, never an error.
pub fn execute_read(args: &ReadArgs, session: &Arc<Mutex<Session>>) -> ToolResult {
    let path = session
        .lock()
        .expect("session lock poisoned")
        .resolve(&args.file_path);

    if !path.exists() {
        return ToolResult::failure(
            READ,
            ToolError::new("NOT_FOUND", format!("File not found: {}", args.file_path)),
        );
    }
    if !path.is_file() {
        return ToolResult::failure(
            READ,
            ToolError::invalid_argument(format!("'{}' is not a file", args.file_path)),
        );
    }

    match fs::metadata(&path) {
        Ok(metadata) if metadata.len() > MAX_READ_SIZE => {
            return ToolResult::failure(
                READ,
                ToolError::invalid_argument(format!(
                    "File too large ({} bytes). Maximum size is {} bytes",
                    metadata.len(),
                    MAX_READ_SIZE
                )),
            );
        }
        Ok(_) => {}
        Err(e) => {
            return ToolResult::failure(
                READ,
                ToolError::execution_failed(format!("Failed to get file metadata: {}", e)),
            );
        }
    }

    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return ToolResult::failure(READ, ToolError::permission_denied(&args.file_path));
        }
        Err(e) => {
            return ToolResult::failure(
                READ,
                ToolError::execution_failed(format!("Failed to read file: {}", e)),
            );
        }
    };

    let offset = args.offset.unwrap_or(0);
    let limit = args.limit.unwrap_or(DEFAULT_READ_LIMIT);

    let lines: Vec<&str> = content.lines().collect();
    let end = lines.len().min(offset.saturating_add(limit));
    let slice = if offset < lines.len() {
        &lines[offset..end]
    } else {
        &[]
    };

    // 1-based line numbers, right-aligned to six columns.
    let numbered: Vec<String> = slice
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>6}  {}", offset + i + 1, line))
        .collect();

    let output = if numbered.is_empty() {
        "(empty file)".to_string()
    } else {
        numbered.join("\n")
    };

    ToolResult::success(READ, output).with_metadata(ToolResultMetadata {
        bytes: Some(content.len()),
        path: Some(path.display().to_string()),
        ..Default::default()
    })
}

/// Execute the write tool: create or overwrite the target file.
pub fn execute_write(args: &WriteArgs, session: &Arc<Mutex<Session>>) -> ToolResult {
    let path = session
        .lock()
        .expect("session lock poisoned")
        .resolve(&args.file_path);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return ToolResult::failure(
            WRITE,
            ToolError::execution_failed(format!(
                "Failed to create parent directory: {}",
                e
            )),
        );
    }

    match fs::write(&path, &args.content) {
        Ok(()) => ToolResult::success(
            WRITE,
            format!(
                "Successfully wrote {} bytes to {}",
                args.content.len(),
                args.file_path
            ),
        )
        .with_metadata(ToolResultMetadata {
            bytes: Some(args.content.len()),
            path: Some(path.display().to_string()),
            ..Default::default()
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            ToolResult::failure(WRITE, ToolError::permission_denied(&args.file_path))
        }
        Err(e) => ToolResult::failure(
            WRITE,
            ToolError::execution_failed(format!("Failed to write file: {}", e)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn session_at(path: &std::path::Path) -> Arc<Mutex<Session>> {
        Arc::new(Mutex::new(Session::new(path)))
    }

    #[test]
    fn test_read_numbers_lines_one_based() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("f.txt"), "alpha\nbeta\ngamma").unwrap();
        let session = session_at(dir.path());

        let result = execute_read(
            &ReadArgs {
                file_path: "f.txt".to_string(),
                offset: None,
                limit: None,
            },
            &session,
        );

        assert!(result.is_success());
        let output = result.output().unwrap();
        assert!(output.contains("     1  alpha"));
        assert!(output.contains("     3  gamma"));
    }

    #[test]
    fn test_read_offset_and_limit() {
        let dir = tempdir().unwrap();
        let content: String = (1..=10).map(|i| format!("line{}\n", i)).collect();
        fs::write(dir.path().join("f.txt"), content).unwrap();
        let session = session_at(dir.path());

        let result = execute_read(
            &ReadArgs {
                file_path: "f.txt".to_string(),
                offset: Some(2),
                limit: Some(3),
            },
            &session,
        );

        let output = result.output().unwrap();
        assert!(output.contains("     3  line3"));
        assert!(output.contains("     5  line5"));
        assert!(!output.contains("line6"));
        assert!(!output.contains("line2\n"));
    }

    #[test]
    fn test_read_missing_file_is_a_result() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());

        let result = execute_read(
            &ReadArgs {
                file_path: "missing.txt".to_string(),
                offset: None,
                limit: None,
            },
            &session,
        );

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
        assert!(result.error().unwrap().message.contains("missing.txt"));
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();
        let session = session_at(dir.path());

        let result = execute_read(
            &ReadArgs {
                file_path: "empty.txt".to_string(),
                offset: None,
                limit: None,
            },
            &session,
        );

        assert_eq!(result.output(), Some("(empty file)"));
    }

    #[test]
    fn test_write_reports_byte_count() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());

        let result = execute_write(
            &WriteArgs {
                file_path: "out.txt".to_string(),
                content: "written content".to_string(),
            },
            &session,
        );

        assert!(result.is_success());
        assert!(result.output().unwrap().contains("15 bytes"));
        assert_eq!(
            fs::read_to_string(dir.path().join("out.txt")).unwrap(),
            "written content"
        );
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());

        let result = execute_write(
            &WriteArgs {
                file_path: "nested/deep/out.txt".to_string(),
                content: "x".to_string(),
            },
            &session,
        );

        assert!(result.is_success());
        assert!(dir.path().join("nested/deep/out.txt").exists());
    }
}
