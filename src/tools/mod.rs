//! Tool registry and definitions.
//!
//! Provides the infrastructure for registering and dispatching MCP tools.

pub mod docs;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{McpError, Result};
use crate::store::DocumentStore;
use crate::validate::validate_args;

/// Common signature of every tool handler.
pub type ToolHandler = fn(&mut DocumentStore, &Map<String, JsonValue>) -> Result<JsonValue>;

/// A tool definition for the MCP tools/list response.
#[derive(Clone, Serialize)]
pub struct ToolDef {
    /// Tool name (e.g., "read_doc")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
    #[serde(skip)]
    handler: ToolHandler,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue, handler: ToolHandler) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
            handler,
        }
    }
}

impl std::fmt::Debug for ToolDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDef")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Registry of all available tools.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    /// Create a new registry with all tools registered.
    pub fn new() -> Self {
        Self {
            tools: docs::tools(),
        }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDef> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Dispatch a tool call to the appropriate handler.
    ///
    /// Arguments are validated against the tool's input schema first; a
    /// rejected call never reaches the store.
    pub fn dispatch(
        &self,
        store: &mut DocumentStore,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        let tool = self
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        validate_args(&tool.input_schema, &args)?;
        tracing::debug!(tool = name, "invoking tool");
        (tool.handler)(store, &args)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
///
/// Each property takes a type and an optional description:
/// `"doc_id": string => "Id of the document"`.
#[macro_export]
macro_rules! schema {
    // Object whose properties are all required
    (object {
        required: { $($name:literal : $ty:tt $(=> $desc:literal)?),* $(,)? }
    }) => {{
        let mut required: Vec<&str> = Vec::new();
        $(required.push($name);)*

        let mut props = serde_json::Map::new();
        $(props.insert($name.to_string(), $crate::schema!(@prop $ty $(, $desc)?));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    (@prop $ty:tt) => { $crate::schema!(@type $ty) };
    (@prop $ty:tt, $desc:literal) => {{
        let mut prop = $crate::schema!(@type $ty);
        prop["description"] = serde_json::json!($desc);
        prop
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type nonempty_string) => { serde_json::json!({"type": "string", "minLength": 1}) };
}
