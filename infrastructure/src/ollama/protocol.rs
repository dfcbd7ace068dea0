//! Wire types for the Ollama `/api/chat` endpoint.
//!
//! Requests carry the full turn history plus the tool catalog rendered
//! as JSON-schema function declarations. Responses arrive either as a
//! single JSON object (`stream: false`) or as NDJSON lines
//! (`stream: true`), each line a partial message with a `done` flag.

use parley_domain::{Message, Role, ToolCall, ToolDefinition, ToolSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: WireFunction,
}

#[derive(Debug, Serialize)]
pub struct WireFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
pub struct WireToolCall {
    pub function: WireFunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ChatRequest {
    pub fn new(
        model: impl Into<String>,
        system_prompt: &str,
        messages: &[Message],
        tools: &ToolSpec,
        stream: bool,
    ) -> Self {
        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        wire_messages.push(WireMessage {
            role: "system",
            content: system_prompt.to_string(),
        });
        wire_messages.extend(messages.iter().map(|m| WireMessage {
            role: match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: m.content.clone(),
        }));

        let mut tool_declarations: Vec<WireTool> =
            tools.all().map(declare_tool).collect();
        // Stable ordering for reproducible request bodies
        tool_declarations.sort_by(|a, b| a.function.name.cmp(&b.function.name));

        Self {
            model: model.into(),
            messages: wire_messages,
            tools: tool_declarations,
            stream,
        }
    }
}

/// Render a tool definition as an Ollama function declaration.
fn declare_tool(definition: &ToolDefinition) -> WireTool {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for param in &definition.parameters {
        properties.insert(
            param.name.clone(),
            json!({
                "type": json_schema_type(&param.param_type),
                "description": param.description,
            }),
        );
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    WireTool {
        tool_type: "function",
        function: WireFunction {
            name: definition.name.clone(),
            description: definition.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        },
    }
}

/// Map internal parameter type hints onto JSON-schema types.
fn json_schema_type(param_type: &str) -> &'static str {
    match param_type {
        "number" => "number",
        "boolean" => "boolean",
        // "path" and anything unrecognized is a string on the wire
        _ => "string",
    }
}

impl WireToolCall {
    /// Convert a wire tool call into the domain representation.
    pub fn into_tool_call(self) -> ToolCall {
        ToolCall {
            tool_name: self.function.name,
            arguments: self
                .function
                .arguments
                .into_iter()
                .collect::<HashMap<String, Value>>(),
        }
    }
}
