//! Argument validation against advertised JSON Schemas.
//!
//! Runs before any tool handler, so malformed arguments never reach the store.

use jsonschema::validator_for;
use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Validate tool arguments against the tool's input schema.
pub fn validate_args(schema: &JsonValue, args: &Map<String, JsonValue>) -> Result<()> {
    let validator = validator_for(schema)
        .map_err(|e| McpError::Internal(format!("invalid tool schema: {}", e)))?;

    let instance = JsonValue::Object(args.clone());
    let problems: Vec<String> = validator
        .iter_errors(&instance)
        .map(|e| e.to_string())
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(McpError::InvalidArg {
            name: "arguments".to_string(),
            reason: problems.join("; "),
        })
    }
}
