//! Domain layer for parley
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! An append-only sequence of user/assistant turns. The single mutation
//! exception is replacing the last assistant turn's content while a
//! streaming response is still arriving.
//!
//! ## Approval Gate
//!
//! High-risk tools (`bash`, `write`) suspend execution until the user
//! approves or rejects the pending call. At most one call is pending at
//! any time.

pub mod approval;
pub mod conversation;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use approval::{ApprovalGate, GateError, HumanDecision, PendingToolCall};
pub use conversation::{
    entities::{Conversation, Message, Role},
    response::ModelResponse,
    stream::{ChatEvent, ModelEvent},
};
pub use session::Session;
pub use tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    invocation::{
        BashArgs, GlobArgs, GrepArgs, InvocationError, ReadArgs, TestArgs, ToolInvocation,
        WriteArgs,
    },
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
