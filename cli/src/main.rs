//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use parley_application::{ChatUseCase, ConversationLogger};
use parley_domain::HumanDecision;
use parley_infrastructure::{
    ConfigLoader, JsonlConversationLogger, LocalToolExecutor, OllamaGateway,
};
use parley_presentation::{ChatRepl, Cli, ConsoleFormatter};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    let model = cli.model.clone().unwrap_or(config.model.name);
    let max_steps = cli.max_steps.unwrap_or(config.agent.max_steps);

    info!(model = %model, "Starting parley");

    // === Dependency Injection ===
    let gateway = Arc::new(OllamaGateway::new(&config.model.base_url, &model));
    let cwd = std::env::current_dir().context("could not determine working directory")?;
    let executor = Arc::new(
        LocalToolExecutor::with_defaults(&cwd)
            .with_command_timeout_ms(config.tools.command_timeout_ms),
    );

    let mut use_case = ChatUseCase::new(gateway, executor).with_max_steps(max_steps);
    if let Some(prompt) = config.agent.system_prompt {
        use_case = use_case.with_system_prompt(prompt);
    }
    if config.logging.conversation_log
        && !cli.no_log
        && let Some(logger) = JsonlConversationLogger::for_new_session()
    {
        info!(path = %logger.path().display(), "Transcript logging enabled");
        use_case = use_case.with_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
    }

    // One-shot mode
    if let Some(message) = cli.message {
        run_one_shot(use_case, &message).await?;
        return Ok(());
    }

    // Interactive mode
    let mut repl = ChatRepl::new(use_case, model).with_streaming(cli.stream);
    repl.run().await?;
    Ok(())
}

/// Send a single message, auto-approving nothing: pending tool calls are
/// rejected so a scripted invocation can never mutate state unprompted.
async fn run_one_shot(mut use_case: ChatUseCase, message: &str) -> Result<()> {
    let outcome = use_case.send_message(message).await?;

    if !outcome.needs_approval {
        println!("{}", ConsoleFormatter::format_response(&outcome.response));
        return Ok(());
    }

    while let Some(pending) = use_case.pending_tool_call() {
        let name = pending.tool_name().to_string();
        eprintln!(
            "Tool request for '{}' rejected: approvals need interactive mode.",
            name
        );
        let response = use_case.continue_after_approval(HumanDecision::Reject).await?;
        if use_case.pending_tool_call().is_none() {
            println!("{}", ConsoleFormatter::format_response(&response));
        }
    }
    Ok(())
}
