//! Approval gate for high-risk tool calls.
//!
//! State machine:
//!
//! ```text
//! NONE --(request, requires_approval)--> PENDING
//! PENDING --(approve)--> EXECUTING --> NONE
//! PENDING --(reject)--> NONE
//! NONE --(request, auto)--> EXECUTING --> NONE
//! ```
//!
//! Invariant: at most one call is pending at any time. A second request
//! while one is pending is rejected with [`GateError::AlreadyPending`]
//! rather than overwriting the record.

use crate::tool::entities::{ToolCall, ToolSpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The user's verdict on a pending tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanDecision {
    Approve,
    Reject,
}

/// The singular in-flight tool request awaiting approval.
///
/// Exists only between a request being surfaced and its resolution.
#[derive(Debug, Clone)]
pub struct PendingToolCall {
    pub call: ToolCall,
}

impl PendingToolCall {
    pub fn new(call: ToolCall) -> Self {
        Self { call }
    }

    pub fn tool_name(&self) -> &str {
        &self.call.tool_name
    }
}

/// Errors from the approval gate.
#[derive(Debug, Clone, Error)]
pub enum GateError {
    #[error("A tool call is already pending approval: {0}")]
    AlreadyPending(String),
}

/// Tracks the at-most-one pending tool call.
#[derive(Debug, Default)]
pub struct ApprovalGate {
    pending: Option<PendingToolCall>,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure decision: does this tool name require user consent?
    ///
    /// Unknown names default to false; they fail inside the dispatcher
    /// instead.
    pub fn requires_approval(spec: &ToolSpec, tool_name: &str) -> bool {
        spec.requires_approval(tool_name)
    }

    /// Park a call as pending. Fails if one is already outstanding.
    pub fn suspend(&mut self, call: ToolCall) -> Result<(), GateError> {
        if let Some(existing) = &self.pending {
            return Err(GateError::AlreadyPending(existing.tool_name().to_string()));
        }
        self.pending = Some(PendingToolCall::new(call));
        Ok(())
    }

    /// Take the pending call, clearing it unconditionally.
    ///
    /// Used by both the approve and reject paths.
    pub fn take(&mut self) -> Option<PendingToolCall> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingToolCall> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending call (conversation reset).
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
