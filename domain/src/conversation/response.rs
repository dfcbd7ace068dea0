//! Model response type for the provider boundary.
//!
//! A [`ModelResponse`] is either final text or one-or-more tool call
//! requests. The orchestrator honors only the first tool call per step.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// A response from the language model.
///
/// Providers return either assistant text (terminal for the step loop)
/// or tool call requests (the loop executes or suspends). A response may
/// technically carry both; text takes precedence, matching the
/// orchestration contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Final assistant text, if the model produced any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Tool call requests. Only the first is honored per step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ModelResponse {
    /// Wrap a plain text response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Wrap a list of tool call requests.
    pub fn from_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            text: None,
            tool_calls,
        }
    }

    /// Non-empty text content, if any.
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// The first tool call request, dropping any later ones in the same step.
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.tool_calls.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let response = ModelResponse::from_text("hello");
        assert_eq!(response.text_content(), Some("hello"));
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_empty_text_is_not_content() {
        let response = ModelResponse::from_text("");
        assert_eq!(response.text_content(), None);
    }

    #[test]
    fn test_first_tool_call_truncates() {
        let response = ModelResponse::from_tool_calls(vec![
            ToolCall::new("read"),
            ToolCall::new("bash"),
        ]);

        assert!(response.has_tool_calls());
        assert_eq!(response.first_tool_call().unwrap().tool_name, "read");
    }
}
