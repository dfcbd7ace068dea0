//! Configuration loading and raw TOML types

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileConfig, FileLoggingConfig, FileModelConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
