//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file
//! and are deserialized directly.

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model provider settings
    pub model: FileModelConfig,
    /// Agent loop settings
    pub agent: FileAgentConfig,
    /// Tool execution settings
    pub tools: FileToolsConfig,
    /// Conversation logging settings
    pub logging: FileLoggingConfig,
}

/// `[model]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model name as known to the Ollama server
    pub name: String,
    /// Base URL of the Ollama server
    pub base_url: String,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            name: crate::ollama::DEFAULT_MODEL.to_string(),
            base_url: crate::ollama::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// `[agent]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Maximum model round-trips per user message
    pub max_steps: usize,
    /// Optional system prompt override
    pub system_prompt: Option<String>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            system_prompt: None,
        }
    }
}

/// `[tools]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Default timeout for shell commands, in milliseconds
    pub command_timeout_ms: u64,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: 10_000,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Whether to append conversation events to a JSONL log file
    pub conversation_log: bool,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            conversation_log: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.model.name, "qwen3:8b");
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert_eq!(config.agent.max_steps, 10);
        assert!(config.agent.system_prompt.is_none());
        assert_eq!(config.tools.command_timeout_ms, 10_000);
        assert!(config.logging.conversation_log);
    }

    #[test]
    fn test_partial_toml_merges_with_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [model]
            name = "llama3.2:3b"

            [agent]
            max_steps = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.model.name, "llama3.2:3b");
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert_eq!(config.agent.max_steps, 4);
        assert_eq!(config.tools.command_timeout_ms, 10_000);
    }
}
