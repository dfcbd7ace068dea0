//! The chat orchestration use case.
//!
//! [`ChatUseCase`] drives the model through turns of text generation and
//! tool invocation. Each user message starts a bounded step loop: one
//! model round-trip per step, tool results fed back as synthetic turns,
//! terminating on final text, on an approval-requiring tool request, or
//! at the step bound.
//!
//! High-risk tools suspend the loop: the pending call is parked in the
//! [`ApprovalGate`] and nothing executes until
//! [`continue_after_approval`](ChatUseCase::continue_after_approval)
//! resolves it.
//!
//! The streaming entry point re-emits model text deltas verbatim and
//! brackets tool execution with [`ChatEvent::ToolStart`]/[`ChatEvent::ToolEnd`]
//! over an mpsc channel. Tools on the streaming path execute without the
//! gate; callers that need gating use the non-streaming entry points.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use parley_domain::{
    ApprovalGate, ChatEvent, Conversation, GateError, HumanDecision, Message, ModelEvent,
    PendingToolCall, ToolCall,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Prefix tagging synthetic tool-result turns in the history.
const TOOL_RESULT_TAG: &str = "[TOOL_RESULT]";

/// Sentinel returned when approval is continued with nothing pending.
const NO_PENDING_SENTINEL: &str = "No pending tool call";

/// Default bound on model round-trips per user message.
pub const DEFAULT_MAX_STEPS: usize = 10;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a concise AI assistant.

Available tools:
- test: Test tool
- bash: Run shell commands (REQUIRES APPROVAL)
- write: Write files (REQUIRES APPROVAL)
- read: Read files
- grep: Search in files
- glob: Find files by pattern

Be concise. When you need a tool, the user will approve it first. Just describe what you need.";

/// Errors from the chat use case.
///
/// Model-layer failures propagate; tool failures never appear here —
/// they are rendered into the conversation as result text.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Gate(#[from] GateError),
}

/// Result of a `send_message` call.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Assistant text, or a human-readable placeholder when suspended.
    pub response: String,
    /// True iff the loop is suspended on a pending tool call.
    pub needs_approval: bool,
}

/// How one pass of the step loop ended.
enum StepOutcome {
    /// The model produced final text (already appended).
    Text(String),
    /// Suspended on an approval-requiring tool request.
    NeedsApproval(String),
    /// The step bound was reached before the model produced text.
    StepLimit,
}

/// The conversational agent loop.
///
/// An explicit context object: conversation history, the approval gate,
/// and the injected ports all live here, so independent conversations
/// are independent values.
pub struct ChatUseCase {
    gateway: Arc<dyn LlmGateway>,
    executor: Arc<dyn ToolExecutorPort>,
    logger: Arc<dyn ConversationLogger>,
    conversation: Conversation,
    gate: ApprovalGate,
    system_prompt: String,
    max_steps: usize,
}

impl ChatUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            gateway,
            executor,
            logger: Arc::new(NoConversationLogger),
            conversation: Conversation::new(),
            gate: ApprovalGate::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Ordered turn history for the presentation layer.
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    /// The current pending tool call, if the loop is suspended.
    pub fn pending_tool_call(&self) -> Option<&PendingToolCall> {
        self.gate.pending()
    }

    /// The tool catalog, for display surfaces.
    pub fn tool_catalog(&self) -> Vec<&parley_domain::ToolDefinition> {
        self.executor.tool_spec().all().collect()
    }

    /// Clear all turns and any pending call.
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.gate.clear();
        info!("Conversation reset");
    }

    /// Send a user message and run the bounded step loop.
    ///
    /// Returns final assistant text, or a `Tool request: <name>`
    /// placeholder with `needs_approval = true` when suspended on a
    /// high-risk tool.
    pub async fn send_message(&mut self, text: &str) -> Result<ChatOutcome, ChatError> {
        self.conversation.push_user(text);
        self.logger.log(ConversationEvent::new(
            "user_message",
            json!({ "content": text }),
        ));

        match self.run_steps().await? {
            StepOutcome::Text(response) => Ok(ChatOutcome {
                response,
                needs_approval: false,
            }),
            StepOutcome::NeedsApproval(name) => Ok(ChatOutcome {
                response: format!("Tool request: {}", name),
                needs_approval: true,
            }),
            StepOutcome::StepLimit => Ok(ChatOutcome {
                response: self.step_limit_notice(),
                needs_approval: false,
            }),
        }
    }

    /// Resolve the pending tool call and, if approved, resume the loop.
    ///
    /// Rejection appends a rejection turn and guarantees the tool never
    /// runs — session and filesystem state stay untouched.
    pub async fn continue_after_approval(
        &mut self,
        decision: HumanDecision,
    ) -> Result<String, ChatError> {
        // take() clears the pending call unconditionally
        let Some(pending) = self.gate.take() else {
            return Ok(NO_PENDING_SENTINEL.to_string());
        };
        let tool_name = pending.tool_name().to_string();

        self.logger.log(ConversationEvent::new(
            "approval_decision",
            json!({ "tool": tool_name, "decision": decision }),
        ));

        match decision {
            HumanDecision::Reject => {
                info!(tool = %tool_name, "Tool call rejected by user");
                self.conversation
                    .push_assistant(format!("User rejected the {} tool call.", tool_name));
                Ok(format!("[REJECTED:{}]", tool_name))
            }
            HumanDecision::Approve => {
                self.execute_and_record(&pending.call).await;
                match self.run_steps().await? {
                    StepOutcome::Text(response) => Ok(response),
                    StepOutcome::NeedsApproval(name) => Ok(format!("Tool request: {}", name)),
                    StepOutcome::StepLimit => Ok(self.step_limit_notice()),
                }
            }
        }
    }

    /// Send a user message and stream the response as structured events.
    ///
    /// Text deltas are re-emitted verbatim; tool execution is bracketed
    /// by `ToolStart`/`ToolEnd` events and followed by a synthetic
    /// confirmation turn (not the raw output) so the model's next step
    /// sees that the tool ran. All tools on this path execute
    /// immediately — the approval gate applies only to the
    /// non-streaming entry points.
    pub async fn send_message_stream(
        &mut self,
        text: &str,
        tx: mpsc::Sender<ChatEvent>,
    ) -> Result<(), ChatError> {
        self.conversation.push_user(text);
        self.logger.log(ConversationEvent::new(
            "user_message",
            json!({ "content": text, "streaming": true }),
        ));

        for step in 1..=self.max_steps {
            debug!(step, "Opening model stream");
            let mut handle = self
                .gateway
                .generate_stream(&self.system_prompt, self.conversation.messages(), self.executor.tool_spec())
                .await?;

            let mut accumulated = String::new();
            let mut executed_tool = false;

            while let Some(event) = handle.receiver.recv().await {
                match event {
                    ModelEvent::TextDelta(delta) => {
                        if accumulated.is_empty() {
                            self.conversation.push_assistant(delta.as_str());
                        }
                        accumulated.push_str(&delta);
                        self.conversation.replace_last_assistant(accumulated.as_str());
                        let _ = tx.send(ChatEvent::TextDelta(delta)).await;
                    }
                    ModelEvent::ToolCall(call) => {
                        executed_tool = true;
                        let name = call.tool_name.clone();
                        let _ = tx.send(ChatEvent::ToolStart { name: name.clone() }).await;
                        let result = self.executor.execute(&call).await;
                        let _ = tx.send(ChatEvent::ToolEnd { name: name.clone() }).await;

                        // Confirmation only; the raw output stays out of
                        // the history on the streaming path.
                        let note = if result.is_success() {
                            format!("Tool {} executed successfully.", name)
                        } else {
                            format!("Tool {} failed: {}", name, result.render())
                        };
                        self.logger.log(ConversationEvent::new(
                            "tool_result",
                            json!({ "tool": name, "success": result.is_success(), "streaming": true }),
                        ));
                        self.conversation.push_assistant(note);
                        // Any further text in this stream opens a fresh turn.
                        accumulated.clear();
                    }
                    ModelEvent::Completed => {}
                    ModelEvent::Error(message) => {
                        let _ = tx.send(ChatEvent::Error(message.clone())).await;
                        return Err(GatewayError::RequestFailed(message).into());
                    }
                }
            }

            if !accumulated.is_empty() {
                self.logger.log(ConversationEvent::new(
                    "assistant_message",
                    json!({ "content": accumulated, "streaming": true }),
                ));
            }

            // No tool ran this step: the model's text is final.
            if !executed_tool {
                return Ok(());
            }
        }

        warn!(max_steps = self.max_steps, "Streaming step bound reached");
        let notice = self.step_limit_notice();
        self.conversation.push_assistant(notice.as_str());
        let _ = tx.send(ChatEvent::TextDelta(notice)).await;
        Ok(())
    }

    /// The bounded iterative step loop shared by `send_message` and the
    /// approved-continuation path. The counter resets on each public
    /// entry call.
    async fn run_steps(&mut self) -> Result<StepOutcome, ChatError> {
        for step in 1..=self.max_steps {
            debug!(step, "Model round-trip");
            let response = self
                .gateway
                .generate(&self.system_prompt, self.conversation.messages(), self.executor.tool_spec())
                .await?;

            if let Some(text) = response.text_content() {
                let text = text.to_string();
                self.conversation.push_assistant(text.as_str());
                self.logger.log(ConversationEvent::new(
                    "assistant_message",
                    json!({ "content": text }),
                ));
                return Ok(StepOutcome::Text(text));
            }

            let Some(call) = response.first_tool_call() else {
                // Neither text nor tool calls: treat as an empty reply.
                self.conversation.push_assistant("");
                return Ok(StepOutcome::Text(String::new()));
            };
            if response.tool_calls.len() > 1 {
                debug!(
                    dropped = response.tool_calls.len() - 1,
                    "Honoring only the first tool request of this step"
                );
            }
            let call = call.clone();

            if ApprovalGate::requires_approval(self.executor.tool_spec(), &call.tool_name) {
                info!(tool = %call.tool_name, "Suspending on approval-required tool");
                self.logger.log(ConversationEvent::new(
                    "tool_request",
                    json!({ "tool": call.tool_name, "args": call.arguments }),
                ));
                self.gate.suspend(call.clone())?;
                return Ok(StepOutcome::NeedsApproval(call.tool_name));
            }

            self.execute_and_record(&call).await;
        }

        warn!(max_steps = self.max_steps, "Step bound reached without final text");
        Ok(StepOutcome::StepLimit)
    }

    /// Execute a tool and append the result as a synthetic user turn.
    ///
    /// Failures never abort the conversation; they are rendered into the
    /// result text for the model to react to.
    async fn execute_and_record(&mut self, call: &ToolCall) {
        let result = self.executor.execute(call).await;
        let rendered = result.render();
        self.logger.log(ConversationEvent::new(
            "tool_result",
            json!({
                "tool": call.tool_name,
                "success": result.is_success(),
                "output": rendered,
            }),
        ));
        self.conversation.push(Message::user(format!(
            "{}{}: {}",
            TOOL_RESULT_TAG, call.tool_name, rendered
        )));
    }

    fn step_limit_notice(&self) -> String {
        format!(
            "Stopped after {} steps without a final response.",
            self.max_steps
        )
    }
}
