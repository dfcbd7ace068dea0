//! Shell command tool: bash

use parley_domain::{
    BashArgs, RiskLevel, Session, ToolDefinition, ToolError, ToolParameter, ToolResult,
    ToolResultMetadata,
};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Tool name constant
pub const BASH: &str = "bash";

/// Default timeout for command execution (10 seconds)
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Maximum output size (1 MiB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Get the tool definition for bash
pub fn bash_definition() -> ToolDefinition {
    ToolDefinition::new(
        BASH,
        "Executes a bash command in the shell. Use this for running system commands, git operations, package management, etc.",
        RiskLevel::High,
    )
    .with_parameter(
        ToolParameter::new("command", "The command to execute", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("description", "Brief description of what this command does", false)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("timeout", "Timeout in milliseconds (default: 10000)", false)
            .with_type("number"),
    )
    .with_parameter(
        ToolParameter::new("workdir", "Working directory to run the command in", false)
            .with_type("path"),
    )
}

/// Cap `output` at `max_bytes`, backing up to the nearest char boundary
/// so the cut never lands inside a multibyte character.
fn truncate_output(output: &mut String, max_bytes: usize) {
    let mut cut = max_bytes;
    while !output.is_char_boundary(cut) {
        cut -= 1;
    }
    output.truncate(cut);
    output.push_str("\n... (output truncated)");
}

/// Execute the bash tool.
///
/// A leading `cd <path>` mutates the session cwd and returns without
/// spawning a process. Everything else runs under `sh -c` with the
/// session cwd (or the explicit workdir), a bounded timeout, and an
/// output cap. Command failure is a result, never an error.
pub async fn execute_bash(args: &BashArgs, session: &Arc<Mutex<Session>>) -> ToolResult {
    let start = Instant::now();
    let command_str = args.command.trim();

    // `cd` special case: update the session, spawn nothing.
    if let Some(target) = command_str.strip_prefix("cd ") {
        let cwd = {
            let mut session = session.lock().expect("session lock poisoned");
            session.change_dir(target).display().to_string()
        };
        return ToolResult::success(BASH, format!("Changed to {}", cwd))
            .with_path(cwd);
    }

    let cwd = {
        let session = session.lock().expect("session lock poisoned");
        match &args.workdir {
            Some(dir) => session.resolve(dir),
            None => session.cwd().to_path_buf(),
        }
    };

    if !cwd.is_dir() {
        return ToolResult::failure(
            BASH,
            ToolError::new(
                "NOT_FOUND",
                format!("Working directory does not exist: {}", cwd.display()),
            ),
        );
    }

    let timeout = Duration::from_millis(args.timeout.unwrap_or(DEFAULT_TIMEOUT_MS));

    let mut cmd = Command::new("sh");
    cmd.args(["-c", command_str])
        .current_dir(&cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // The child must not outlive an abandoned timeout race.
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return ToolResult::failure(
                BASH,
                ToolError::execution_failed(format!("Failed to spawn command: {}", e)),
            );
        }
        Err(_) => {
            return ToolResult::failure(
                BASH,
                ToolError::timeout(format!("{} ({} ms)", command_str, timeout.as_millis())),
            )
            .with_metadata(ToolResultMetadata {
                duration_ms: Some(start.elapsed().as_millis() as u64),
                ..Default::default()
            });
        }
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    let exit_code = output.status.code().unwrap_or(-1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut combined = String::new();
    if !stdout.is_empty() {
        combined.push_str(&stdout);
    }
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(&stderr);
    }
    if combined.len() > MAX_OUTPUT_SIZE {
        truncate_output(&mut combined, MAX_OUTPUT_SIZE);
    }
    if combined.is_empty() {
        combined.push_str("(no output)");
    }

    let metadata = ToolResultMetadata {
        duration_ms: Some(duration_ms),
        bytes: Some(combined.len()),
        exit_code: Some(exit_code),
        ..Default::default()
    };

    if output.status.success() {
        ToolResult::success(BASH, combined).with_metadata(metadata)
    } else {
        // Nonzero exit is still a result for the model to react to,
        // with the exact exit code preserved.
        ToolResult::success(
            BASH,
            format!("Command exited with code {}\n{}", exit_code, combined),
        )
        .with_metadata(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn session_at(path: &std::path::Path) -> Arc<Mutex<Session>> {
        Arc::new(Mutex::new(Session::new(path)))
    }

    #[tokio::test]
    async fn test_bash_echo() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());
        let args = BashArgs {
            command: "echo hello".to_string(),
            description: None,
            timeout: None,
            workdir: None,
        };

        let result = execute_bash(&args, &session).await;
        assert!(result.is_success());
        assert!(result.output().unwrap().contains("hello"));
        assert_eq!(result.metadata.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_bash_nonzero_exit_preserves_code_and_stderr() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());
        let args = BashArgs {
            command: "echo oops >&2; exit 3".to_string(),
            description: None,
            timeout: None,
            workdir: None,
        };

        let result = execute_bash(&args, &session).await;
        assert!(result.is_success());
        assert_eq!(result.metadata.exit_code, Some(3));
        let output = result.output().unwrap();
        assert!(output.contains("exited with code 3"));
        assert!(output.contains("oops"));
    }

    #[tokio::test]
    async fn test_bash_cd_updates_session_without_spawning() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());
        let args = BashArgs {
            command: "cd sub".to_string(),
            description: None,
            timeout: None,
            workdir: None,
        };

        let result = execute_bash(&args, &session).await;
        assert!(result.is_success());
        assert!(result.output().unwrap().starts_with("Changed to "));
        assert_eq!(
            session.lock().unwrap().cwd(),
            dir.path().join("sub").as_path()
        );
    }

    #[tokio::test]
    async fn test_bash_relative_paths_resolve_against_session_cwd() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/marker.txt"), "here").unwrap();

        let session = session_at(dir.path());
        execute_bash(
            &BashArgs {
                command: "cd sub".to_string(),
                description: None,
                timeout: None,
                workdir: None,
            },
            &session,
        )
        .await;

        let result = execute_bash(
            &BashArgs {
                command: "cat marker.txt".to_string(),
                description: None,
                timeout: None,
                workdir: None,
            },
            &session,
        )
        .await;
        assert!(result.is_success());
        assert!(result.output().unwrap().contains("here"));
    }

    #[tokio::test]
    async fn test_bash_timeout_returns_timeout_result() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());
        let args = BashArgs {
            command: "sleep 5".to_string(),
            description: None,
            timeout: Some(100),
            workdir: None,
        };

        let result = execute_bash(&args, &session).await;
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "TIMEOUT");
    }

    #[test]
    fn test_truncate_backs_up_to_char_boundary() {
        // '€' is 3 bytes; a 10-byte cap lands mid-character
        let mut output = "€€€€".to_string();
        truncate_output(&mut output, 10);
        assert!(output.starts_with("€€€"));
        assert!(output.ends_with("... (output truncated)"));

        let mut ascii = "abcdef".to_string();
        truncate_output(&mut ascii, 4);
        assert!(ascii.starts_with("abcd"));
    }

    #[tokio::test]
    async fn test_bash_multibyte_output_over_cap_is_truncated() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());
        // ~1.2 MiB of 3-byte characters on one line, so the 1 MiB cap
        // cannot fall on a character boundary by accident
        let args = BashArgs {
            command: "yes € | head -n 400000 | tr -d '\\n'".to_string(),
            description: None,
            timeout: Some(30_000),
            workdir: None,
        };

        let result = execute_bash(&args, &session).await;
        assert!(result.is_success());
        let output = result.output().unwrap();
        assert!(output.ends_with("... (output truncated)"));
        assert!(output.len() <= MAX_OUTPUT_SIZE + "\n... (output truncated)".len());
    }

    #[tokio::test]
    async fn test_bash_missing_workdir() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());
        let args = BashArgs {
            command: "echo hi".to_string(),
            description: None,
            timeout: None,
            workdir: Some("/nonexistent/directory".to_string()),
        };

        let result = execute_bash(&args, &session).await;
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }
}
