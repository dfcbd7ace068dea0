//! Typed tool invocations.
//!
//! A [`ToolInvocation`] is the closed set of built-in tools, one variant
//! per tool, each carrying a strongly-typed argument struct. Raw
//! [`ToolCall`]s are parsed into this set at the dispatch boundary, so
//! tool bodies never touch loosely-typed argument bags.

use super::entities::ToolCall;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a raw tool call could not be turned into a typed invocation.
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    /// The tool name is not in the registry. A distinct case, not a
    /// validation failure — the dispatcher renders it as an
    /// "Unknown tool" result.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments did not match the tool's schema.
    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },
}

/// Arguments for the `test` diagnostic tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestArgs {
    /// Any language name; echoed back in the result.
    pub language: String,
}

/// Arguments for the `bash` shell tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BashArgs {
    /// The command to execute.
    pub command: String,
    /// Brief description of what this command does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Timeout in milliseconds (default 10000).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Working directory override; defaults to the session cwd.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
}

/// Arguments for the `read` file tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadArgs {
    /// The path to the file to read.
    pub file_path: String,
    /// The line number to start reading from (0-based).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    /// The number of lines to read (defaults to 50).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Arguments for the `write` file tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteArgs {
    /// The path to the file to write.
    pub file_path: String,
    /// The content to write.
    pub content: String,
}

/// Arguments for the `grep` content search tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrepArgs {
    /// Regex pattern to search for.
    pub pattern: String,
    /// Directory to search in; defaults to the session cwd.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Glob pattern filtering which files are searched (e.g. "*.rs").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
}

/// Arguments for the `glob` file listing tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobArgs {
    /// Glob pattern to match files (e.g. "**/*.rs").
    pub pattern: String,
    /// Directory to search in; defaults to the session cwd.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// The closed set of built-in tools, with validated arguments.
#[derive(Debug, Clone)]
pub enum ToolInvocation {
    Test(TestArgs),
    Bash(BashArgs),
    Read(ReadArgs),
    Write(WriteArgs),
    Grep(GrepArgs),
    Glob(GlobArgs),
}

impl ToolInvocation {
    /// Parse a raw tool call into a typed invocation.
    ///
    /// Unknown names and schema mismatches are the two failure cases;
    /// both are data for the dispatcher, never a panic.
    pub fn parse(call: &ToolCall) -> Result<Self, InvocationError> {
        let args = serde_json::Value::Object(
            call.arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        let invalid = |e: serde_json::Error| InvocationError::InvalidArguments {
            tool: call.tool_name.clone(),
            message: e.to_string(),
        };

        match call.tool_name.as_str() {
            "test" => Ok(Self::Test(serde_json::from_value(args).map_err(invalid)?)),
            "bash" => Ok(Self::Bash(serde_json::from_value(args).map_err(invalid)?)),
            "read" => Ok(Self::Read(serde_json::from_value(args).map_err(invalid)?)),
            "write" => Ok(Self::Write(serde_json::from_value(args).map_err(invalid)?)),
            "grep" => Ok(Self::Grep(serde_json::from_value(args).map_err(invalid)?)),
            "glob" => Ok(Self::Glob(serde_json::from_value(args).map_err(invalid)?)),
            other => Err(InvocationError::UnknownTool(other.to_string())),
        }
    }

    /// Canonical name of the tool this invocation targets.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::Test(_) => "test",
            Self::Bash(_) => "bash",
            Self::Read(_) => "read",
            Self::Write(_) => "write",
            Self::Grep(_) => "grep",
            Self::Glob(_) => "glob",
        }
    }
}
