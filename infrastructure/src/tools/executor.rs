//! Local tool executor — validates, parses, and dispatches tool calls

use async_trait::async_trait;
use parley_application::ToolExecutorPort;
use parley_domain::{
    DefaultToolValidator, InvocationError, Session, ToolCall, ToolError, ToolInvocation,
    ToolResult, ToolSpec, ToolValidator,
};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::debug;

use super::command::execute_bash;
use super::file::{execute_read, execute_write};
use super::search::{execute_glob, execute_grep};
use super::testing::execute_test;

/// Executes tools locally against the filesystem and shell.
///
/// All expected failures (unknown tool, bad arguments, missing files,
/// nonzero exits) are failure results; `execute` itself never errors.
pub struct LocalToolExecutor {
    tool_spec: ToolSpec,
    session: Arc<Mutex<Session>>,
    validator: DefaultToolValidator,
    command_timeout_ms: Option<u64>,
}

impl LocalToolExecutor {
    pub fn new(tool_spec: ToolSpec, session: Arc<Mutex<Session>>) -> Self {
        Self {
            tool_spec,
            session,
            validator: DefaultToolValidator,
            command_timeout_ms: None,
        }
    }

    /// Convenience constructor with the default tool set, rooted at `cwd`.
    pub fn with_defaults(cwd: impl AsRef<Path>) -> Self {
        Self::new(
            super::default_tool_spec(),
            Arc::new(Mutex::new(Session::new(cwd.as_ref()))),
        )
    }

    /// Default timeout applied to bash calls that don't set their own.
    pub fn with_command_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.command_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.session)
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let started = Instant::now();

        let Some(definition) = self.tool_spec.get(&call.tool_name) else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::new("NOT_FOUND", format!("Unknown tool: {}", call.tool_name)),
            );
        };

        if let Err(message) = self.validator.validate(call, definition) {
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
        }

        let invocation = match ToolInvocation::parse(call) {
            Ok(invocation) => invocation,
            Err(InvocationError::UnknownTool(name)) => {
                return ToolResult::failure(
                    &name,
                    ToolError::new("NOT_FOUND", format!("Unknown tool: {}", name)),
                );
            }
            Err(e @ InvocationError::InvalidArguments { .. }) => {
                return ToolResult::failure(
                    &call.tool_name,
                    ToolError::invalid_argument(e.to_string()),
                );
            }
        };

        debug!(tool = invocation.tool_name(), "executing tool");

        let mut result = match &invocation {
            ToolInvocation::Test(args) => execute_test(args).await,
            ToolInvocation::Bash(args) => {
                let mut args = args.clone();
                if args.timeout.is_none() {
                    args.timeout = self.command_timeout_ms;
                }
                execute_bash(&args, &self.session).await
            }
            ToolInvocation::Read(args) => execute_read(args, &self.session),
            ToolInvocation::Write(args) => execute_write(args, &self.session),
            ToolInvocation::Grep(args) => execute_grep(args, &self.session),
            ToolInvocation::Glob(args) => execute_glob(args, &self.session),
        };

        if result.metadata.duration_ms.is_none() {
            result.metadata.duration_ms = Some(started.elapsed().as_millis() as u64);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_with_defaults_roots_session_at_cwd() {
        let dir = tempdir().unwrap();
        let executor = LocalToolExecutor::with_defaults(dir.path());

        let session = executor.session();
        assert_eq!(session.lock().unwrap().cwd(), dir.path());
    }

    #[tokio::test]
    async fn test_unknown_tool_is_a_result() {
        let dir = tempdir().unwrap();
        let executor = LocalToolExecutor::with_defaults(dir.path());

        let result = executor.execute(&ToolCall::new("teleport")).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
        assert!(result.error().unwrap().message.contains("teleport"));
    }

    #[tokio::test]
    async fn test_schema_validation_failure_is_a_result() {
        let dir = tempdir().unwrap();
        let executor = LocalToolExecutor::with_defaults(dir.path());

        // write without its required content argument
        let call = ToolCall::new("write").with_arg("file_path", "x.txt");
        let result = executor.execute(&call).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let dir = tempdir().unwrap();
        let executor = LocalToolExecutor::with_defaults(dir.path());

        let write = ToolCall::new("write")
            .with_arg("file_path", "notes.txt")
            .with_arg("content", "remember this");
        assert!(executor.execute(&write).await.is_success());

        let read = ToolCall::new("read").with_arg("file_path", "notes.txt");
        let result = executor.execute(&read).await;
        assert!(result.output().unwrap().contains("     1  remember this"));
    }

    #[tokio::test]
    async fn test_relative_paths_follow_session_cwd() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let executor = LocalToolExecutor::with_defaults(dir.path());

        let cd = ToolCall::new("bash").with_arg("command", "cd sub");
        assert!(executor.execute(&cd).await.is_success());

        let write = ToolCall::new("write")
            .with_arg("file_path", "here.txt")
            .with_arg("content", "x");
        assert!(executor.execute(&write).await.is_success());
        assert!(dir.path().join("sub/here.txt").exists());
    }

    #[tokio::test]
    async fn test_records_duration() {
        let dir = tempdir().unwrap();
        let executor = LocalToolExecutor::with_defaults(dir.path());

        let call = ToolCall::new("glob").with_arg("pattern", "*.txt");
        let result = executor.execute(&call).await;

        assert!(result.metadata.duration_ms.is_some());
    }
}
