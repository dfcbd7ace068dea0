//! Ports (interfaces) implemented by infrastructure adapters

pub mod conversation_logger;
pub mod llm_gateway;
pub mod tool_executor;
