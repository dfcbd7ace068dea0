//! Tool executor port.
//!
//! The dispatch surface between the orchestrator and the tool adapters:
//! a catalog of tool definitions plus one execute entry point. Expected
//! failures are data in the returned [`ToolResult`], never an `Err`.

use async_trait::async_trait;
use parley_domain::{ToolCall, ToolResult, ToolSpec};

/// Executes tool calls on behalf of the chat use case.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// The catalog of available tools.
    fn tool_spec(&self) -> &ToolSpec;

    /// Execute a tool call. Unknown tools and invalid arguments come
    /// back as failure results, not errors.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
