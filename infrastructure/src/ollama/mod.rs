//! Ollama provider adapter

mod gateway;
pub mod protocol;

pub use gateway::{DEFAULT_BASE_URL, DEFAULT_MODEL, OllamaGateway};
