//! Console formatting for chat output and tool approval prompts

use colored::Colorize;
use parley_domain::{PendingToolCall, ToolDefinition};

/// Formats chat output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a pending tool call as an approval prompt block.
    pub fn format_pending(pending: &PendingToolCall) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "\n{} {}\n",
            "Tool request:".yellow().bold(),
            pending.tool_name().yellow().bold()
        ));

        let args = serde_json::Map::from_iter(
            pending
                .call
                .arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        let rendered = serde_json::to_string_pretty(&serde_json::Value::Object(args))
            .unwrap_or_else(|_| "{}".to_string());
        for line in rendered.lines() {
            output.push_str(&format!("  {}\n", line.dimmed()));
        }
        output
    }

    /// Render a final assistant response.
    pub fn format_response(text: &str) -> String {
        if text.is_empty() {
            "(empty response)".dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Render a rejection confirmation.
    pub fn format_rejection(tool_name: &str) -> String {
        format!("{} {}", "Rejected:".red().bold(), tool_name)
    }

    /// One catalog line per tool, for the `/tools` command.
    pub fn format_tool_line(tool: &ToolDefinition) -> String {
        let marker = if tool.requires_approval() {
            " (requires approval)".yellow().to_string()
        } else {
            String::new()
        };
        format!("  {:<6} - {}{}", tool.name.bold(), tool.description, marker)
    }

    /// Bracket line shown while a streamed tool executes.
    pub fn format_tool_start(name: &str) -> String {
        format!("{}", format!("[{} running...]", name).dimmed())
    }

    pub fn format_tool_end(name: &str) -> String {
        format!("{}", format!("[{} finished]", name).dimmed())
    }
}
