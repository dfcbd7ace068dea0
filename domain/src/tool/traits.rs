//! Schema validation for incoming tool calls.
//!
//! Validation is pure (no I/O): a call is checked against its
//! definition's parameter list before it is parsed into a typed
//! invocation. The async executor port lives in the application layer.

use super::entities::{ToolCall, ToolDefinition};

/// Checks a raw tool call against a tool definition.
pub trait ToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Standard schema check: every required parameter present, no
/// arguments outside the declared parameter set.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        if let Some(missing) = definition
            .parameters
            .iter()
            .find(|p| p.required && !call.arguments.contains_key(&p.name))
        {
            return Err(format!(
                "Tool '{}' requires the '{}' argument",
                definition.name, missing.name
            ));
        }

        if let Some(extra) = call
            .arguments
            .keys()
            .find(|name| !definition.parameters.iter().any(|p| &p.name == *name))
        {
            return Err(format!(
                "Tool '{}' does not accept an '{}' argument",
                definition.name, extra
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{RiskLevel, ToolParameter};

    fn write_definition() -> ToolDefinition {
        ToolDefinition::new("write", "Write a file", RiskLevel::High)
            .with_parameter(ToolParameter::new("file_path", "Target path", true))
            .with_parameter(ToolParameter::new("content", "File content", true))
    }

    #[test]
    fn test_missing_required_argument_is_rejected() {
        let call = ToolCall::new("write").with_arg("file_path", "/tmp/out.txt");
        let err = DefaultToolValidator
            .validate(&call, &write_definition())
            .unwrap_err();
        assert!(err.contains("'content'"));
    }

    #[test]
    fn test_undeclared_argument_is_rejected() {
        let definition = ToolDefinition::new("glob", "Find files", RiskLevel::Low)
            .with_parameter(ToolParameter::new("pattern", "Glob pattern", true));

        let call = ToolCall::new("glob")
            .with_arg("pattern", "*.rs")
            .with_arg("recursive", true);
        let err = DefaultToolValidator.validate(&call, &definition).unwrap_err();
        assert!(err.contains("'recursive'"));
    }

    #[test]
    fn test_complete_call_passes() {
        let call = ToolCall::new("write")
            .with_arg("file_path", "/tmp/out.txt")
            .with_arg("content", "hello");
        assert!(DefaultToolValidator.validate(&call, &write_definition()).is_ok());
    }
}
