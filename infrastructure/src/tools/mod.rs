//! Tool implementations for the agent loop.
//!
//! Each tool module exposes a definition (name, description, risk level,
//! parameter schema) and an execute function taking the typed argument
//! struct. Dispatch happens in [`LocalToolExecutor`]: registry lookup,
//! schema validation, typed parse, then the tool body.

pub mod command;
pub mod file;
pub mod search;
pub mod testing;

mod executor;

pub use executor::LocalToolExecutor;

use parley_domain::ToolSpec;

/// Create the default tool specification with all built-in tools.
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(testing::test_definition())
        .register(command::bash_definition())
        .register(file::read_definition())
        .register(file::write_definition())
        .register(search::grep_definition())
        .register(search::glob_definition())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_registers_all_tools() {
        let spec = default_tool_spec();
        for name in ["test", "bash", "read", "write", "grep", "glob"] {
            assert!(spec.get(name).is_some(), "missing tool {}", name);
        }
    }

    #[test]
    fn test_approval_split() {
        let spec = default_tool_spec();
        assert!(spec.requires_approval("bash"));
        assert!(spec.requires_approval("write"));
        assert!(!spec.requires_approval("test"));
        assert!(!spec.requires_approval("read"));
        assert!(!spec.requires_approval("grep"));
        assert!(!spec.requires_approval("glob"));
    }
}
