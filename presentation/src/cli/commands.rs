//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for parley
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about = "Chat with a local model that can use tools")]
#[command(long_about = r#"
Parley is a terminal chat client for local Ollama models with tool use.

The model can read and search files, run shell commands, and write files.
State-changing tools (bash, write) require your approval before running.

Configuration files are loaded from (in priority order):
1. --config <path>   Explicit config file
2. ./parley.toml     Project-level config
3. ~/.config/parley/config.toml   Global config

Example:
  parley                          Start an interactive session
  parley "what does src/main.rs do?"
  parley --stream -m llama3.2:3b
"#)]
pub struct Cli {
    /// Send one message and exit (omit for interactive mode)
    pub message: Option<String>,

    /// Stream responses token by token
    #[arg(short, long)]
    pub stream: bool,

    /// Model to chat with (overrides config)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum model round-trips per message (overrides config)
    #[arg(long, value_name = "N")]
    pub max_steps: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable the conversation transcript log
    #[arg(long)]
    pub no_log: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
