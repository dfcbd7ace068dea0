//! Streaming events for the two streaming boundaries.
//!
//! [`ModelEvent`] carries events arriving from the provider stream;
//! [`ChatEvent`] carries events the orchestrator emits toward a renderer.
//! Both are structured discriminated unions delivered over channels —
//! tool boundaries are variants, never marker substrings that a renderer
//! would have to recover by text scanning.

use crate::tool::entities::ToolCall;

/// An event in a streaming model response (provider → orchestrator).
#[derive(Debug, Clone)]
pub enum ModelEvent {
    /// A text fragment from the model, in arrival order.
    TextDelta(String),
    /// The model requests a tool call.
    ToolCall(ToolCall),
    /// The model finished this response (signals stream end).
    Completed,
    /// An error occurred during streaming (terminal).
    Error(String),
}

impl ModelEvent {
    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ModelEvent::Completed | ModelEvent::Error(_))
    }
}

/// An event in a streamed chat response (orchestrator → renderer).
///
/// `ToolStart`/`ToolEnd` bracket tool execution; everything between a
/// matched pair belongs to that tool's lifecycle, everything outside is
/// literal assistant text.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A literal output fragment, concatenated in arrival order.
    TextDelta(String),
    /// A tool began executing.
    ToolStart { name: String },
    /// The matching tool finished executing.
    ToolEnd { name: String },
    /// Streaming failed; the stream ends after this event.
    Error(String),
}

impl ChatEvent {
    /// Returns the text content if this is a TextDelta event.
    pub fn text(&self) -> Option<&str> {
        match self {
            ChatEvent::TextDelta(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_and_error_are_terminal() {
        assert!(ModelEvent::Completed.is_terminal());
        assert!(ModelEvent::Error("oops".to_string()).is_terminal());
        assert!(!ModelEvent::TextDelta("hi".to_string()).is_terminal());
        assert!(!ModelEvent::ToolCall(ToolCall::new("read")).is_terminal());
    }

    #[test]
    fn chat_event_text_returns_content() {
        assert_eq!(ChatEvent::TextDelta("hello".to_string()).text(), Some("hello"));
        assert_eq!(ChatEvent::ToolStart { name: "bash".to_string() }.text(), None);
    }

    #[test]
    fn chat_events_compare_by_variant_and_payload() {
        assert_eq!(
            ChatEvent::ToolStart { name: "grep".to_string() },
            ChatEvent::ToolStart { name: "grep".to_string() },
        );
        assert_ne!(
            ChatEvent::ToolStart { name: "grep".to_string() },
            ChatEvent::ToolEnd { name: "grep".to_string() },
        );
    }
}
