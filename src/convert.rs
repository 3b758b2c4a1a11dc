//! Conversion helpers between JSON arguments and MCP content blocks.

use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Helper to get a required string argument from JSON arguments.
pub fn get_string_arg(args: &Map<String, JsonValue>, name: &str) -> Result<String> {
    match args.get(name) {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(McpError::InvalidArg {
            name: name.to_string(),
            reason: "Expected a string".to_string(),
        }),
        None => Err(McpError::MissingArg(name.to_string())),
    }
}

/// Wrap a tool handler's output in an MCP `tools/call` result.
///
/// Strings are passed through as text, `null` becomes an empty content
/// list, anything else is serialized as JSON text.
pub fn tool_result(output: JsonValue) -> JsonValue {
    let content = match output {
        JsonValue::Null => Vec::new(),
        JsonValue::String(text) => vec![text_content(text)],
        other => vec![text_content(other.to_string())],
    };
    serde_json::json!({ "content": content, "isError": false })
}

/// An MCP `tools/call` result reporting a failed execution.
pub fn tool_error(err: &McpError) -> JsonValue {
    serde_json::json!({
        "content": [text_content(err.to_string())],
        "isError": true
    })
}

/// A single text content block.
pub fn text_content(text: impl Into<String>) -> JsonValue {
    serde_json::json!({ "type": "text", "text": text.into() })
}
