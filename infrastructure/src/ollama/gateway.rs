//! Ollama LLM gateway adapter.
//!
//! Talks to a local Ollama server over its `/api/chat` endpoint. The
//! non-streaming path does one request/response round-trip; the streaming
//! path reads the NDJSON body line by line and forwards [`ModelEvent`]s
//! over a channel.

use async_trait::async_trait;
use futures::StreamExt;
use parley_application::{GatewayError, LlmGateway, StreamHandle};
use parley_domain::{Message, ModelEvent, ModelResponse, ToolSpec};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::protocol::{ChatRequest, ChatResponse};

/// Default model served by a stock Ollama install
pub const DEFAULT_MODEL: &str = "qwen3:8b";

/// Default Ollama server address
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const STREAM_CHANNEL_CAPACITY: usize = 64;

pub struct OllamaGateway {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaGateway {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .client
            .post(self.chat_url())
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::NOT_FOUND && body.contains("model") {
                return Err(GatewayError::ModelNotAvailable(self.model.clone()));
            }
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    async fn generate(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &ToolSpec,
    ) -> Result<ModelResponse, GatewayError> {
        let request = ChatRequest::new(&self.model, system_prompt, messages, tools, false);
        debug!(model = %self.model, turns = messages.len(), "chat request");

        let response = self.post_chat(&request).await?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(GatewayError::RequestFailed(error));
        }
        let message = parsed
            .message
            .ok_or_else(|| GatewayError::InvalidResponse("missing message".to_string()))?;

        if !message.tool_calls.is_empty() {
            let calls: Vec<_> = message
                .tool_calls
                .into_iter()
                .map(|c| c.into_tool_call())
                .collect();
            // Keep any accompanying text; the orchestrator decides
            // which side of the response wins.
            return Ok(ModelResponse {
                text: (!message.content.is_empty()).then_some(message.content),
                tool_calls: calls,
            });
        }
        Ok(ModelResponse::from_text(message.content))
    }

    async fn generate_stream(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &ToolSpec,
    ) -> Result<StreamHandle, GatewayError> {
        let request = ChatRequest::new(&self.model, system_prompt, messages, tools, true);
        debug!(model = %self.model, turns = messages.len(), "streaming chat request");

        let response = self.post_chat(&request).await?;
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(ModelEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // NDJSON: one complete JSON object per line
                while let Some(newline) = buffer.find('\n') {
                    let line = buffer[..newline].trim().to_string();
                    buffer.drain(..=newline);
                    if line.is_empty() {
                        continue;
                    }
                    if forward_line(&line, &tx).await.is_err() {
                        return;
                    }
                }
            }

            // A final object may arrive without a trailing newline
            let tail = buffer.trim();
            if !tail.is_empty() {
                let _ = forward_line(tail, &tx).await;
            }
            let _ = tx.send(ModelEvent::Completed).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

/// Translate one NDJSON line into model events. Returns `Err(())` when
/// the receiver is gone or the stream hit a terminal error.
async fn forward_line(line: &str, tx: &mpsc::Sender<ModelEvent>) -> Result<(), ()> {
    let parsed: ChatResponse = match serde_json::from_str(line) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "skipping malformed stream line");
            return Ok(());
        }
    };

    if let Some(error) = parsed.error {
        let _ = tx.send(ModelEvent::Error(error)).await;
        return Err(());
    }
    if let Some(message) = parsed.message {
        if !message.content.is_empty()
            && tx
                .send(ModelEvent::TextDelta(message.content))
                .await
                .is_err()
        {
            return Err(());
        }
        for call in message.tool_calls {
            if tx
                .send(ModelEvent::ToolCall(call.into_tool_call()))
                .await
                .is_err()
            {
                return Err(());
            }
        }
    }
    Ok(())
}
