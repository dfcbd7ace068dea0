//! Port for transcript logging.
//!
//! Records what happened in a conversation (user turns, model
//! responses, tool results, approval decisions) as machine-readable
//! events, one record per event. Diagnostic output goes through
//! `tracing` instead; this port is only the transcript.

use serde_json::Value;

/// One transcript event.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "user_message", "tool_result").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript events.
///
/// `log` is synchronous and infallible on purpose: a failing transcript
/// writer must never interrupt the chat loop, so implementations swallow
/// their own I/O errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event; used in tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
