//! Infrastructure layer for parley
//!
//! Concrete adapters for the application layer's ports: the local tool
//! executor (shell, file, and search tools), the Ollama LLM gateway,
//! configuration loading, and JSONL conversation logging.

pub mod config;
pub mod logging;
pub mod ollama;
pub mod tools;

pub use config::{ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use ollama::OllamaGateway;
pub use tools::{LocalToolExecutor, default_tool_spec};
