//! Application layer for parley
//!
//! Use cases orchestrate domain logic; ports define the interfaces that
//! infrastructure adapters implement (LLM gateway, tool executor,
//! conversation transcript logging).

pub mod ports;
pub mod use_cases;

pub use ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
pub use ports::llm_gateway::{GatewayError, LlmGateway, StreamHandle};
pub use ports::tool_executor::ToolExecutorPort;
pub use use_cases::chat::{ChatError, ChatOutcome, ChatUseCase};
