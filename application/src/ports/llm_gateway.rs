//! LLM Gateway port
//!
//! Defines the interface for communicating with the model provider.
//! The provider sees the ordered turn history plus the tool catalog
//! (names, descriptions, schemas) — tool execution never crosses this
//! boundary.

use async_trait::async_trait;
use parley_domain::{Message, ModelEvent, ModelResponse, ToolSpec};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations.
///
/// These are not recovered locally; they propagate to the caller of the
/// chat use case.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Handle for receiving streaming events from a model response.
///
/// Wraps an `mpsc::Receiver<ModelEvent>` and provides convenience
/// methods for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<ModelEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<ModelEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text deltas into a single string.
    ///
    /// Tool call events are ignored; useful when only the final text is
    /// needed.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                ModelEvent::TextDelta(chunk) => full_text.push_str(&chunk),
                ModelEvent::Completed => return Ok(full_text),
                ModelEvent::Error(e) => return Err(GatewayError::RequestFailed(e)),
                ModelEvent::ToolCall(_) => {}
            }
        }
        // Channel closed without Completed — return what we have
        Ok(full_text)
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with the
/// model provider. Implementations (adapters) live in the infrastructure
/// layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// One model round-trip: full history + tool catalog in, either
    /// final text or tool call requests out.
    async fn generate(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &ToolSpec,
    ) -> Result<ModelResponse, GatewayError>;

    /// Open a token stream for one model round-trip.
    async fn generate_stream(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &ToolSpec,
    ) -> Result<StreamHandle, GatewayError>;
}
