//! Diagnostic test tool — fixed-delay echo for exercising the loop

use parley_domain::{RiskLevel, TestArgs, ToolDefinition, ToolParameter, ToolResult};
use std::time::Duration;

/// Tool name constant
pub const TEST: &str = "test";

/// Simulated work before the echo completes
const SIMULATED_DELAY: Duration = Duration::from_millis(500);

/// Get the tool definition for test
pub fn test_definition() -> ToolDefinition {
    ToolDefinition::new(
        TEST,
        "A diagnostic tool that echoes an opinion about a language.",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new("language", "The language to praise", true).with_type("string"),
    )
}

/// Execute the test tool: sleep, then echo.
pub async fn execute_test(args: &TestArgs) -> ToolResult {
    tokio::time::sleep(SIMULATED_DELAY).await;
    ToolResult::success(TEST, format!("{} is best", args.language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_echoes_after_delay() {
        let result = execute_test(&TestArgs {
            language: "Go".to_string(),
        })
        .await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some("Go is best"));
    }
}
