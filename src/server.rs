//! MCP server implementation.
//!
//! Handles JSON-RPC 2.0 over stdio according to the MCP protocol specification.
//! One request is read, dispatched and answered before the next line is read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::convert::{tool_error, tool_result};
use crate::error::{rpc_codes, McpError, Result};
use crate::prompts::{self, PromptRegistry};
use crate::resources::{self, ResourceRegistry};
use crate::store::DocumentStore;
use crate::tools::ToolRegistry;

/// MCP protocol version we support.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server information.
const SERVER_NAME: &str = "doc-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON-RPC 2.0 request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent and `"id": null` both deserialize to `None`; either way the
    /// request is handled as a notification and gets no response.
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<JsonValue>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
        }
    }

    /// Create an error response from an McpError.
    pub fn from_error(id: Option<JsonValue>, err: McpError) -> Self {
        Self::error(id, err.rpc_code(), err.to_string())
    }
}

/// MCP server.
///
/// Owns the document store; registries borrow it for the duration of a
/// single request.
pub struct McpServer {
    store: DocumentStore,
    tools: ToolRegistry,
    resources: ResourceRegistry,
    prompts: PromptRegistry,
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server over the given store.
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            tools: ToolRegistry::new(),
            resources: ResourceRegistry::new(),
            prompts: PromptRegistry::new(),
            initialized: false,
        }
    }

    /// The document store backing this server.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Whether the client has sent `initialize`.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the server, reading from stdin and writing to stdout.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve newline-delimited JSON-RPC requests until the reader hits EOF.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                // EOF - client disconnected
                tracing::debug!("client closed input, shutting down");
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse request");
                    Some(JsonRpcResponse::error(
                        None,
                        rpc_codes::PARSE_ERROR,
                        format!("Parse error: {}", e),
                    ))
                }
            };

            if let Some(response) = response {
                let response_json = serde_json::to_string(&response)?;
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    ///
    /// Returns `None` for notifications, which get no response.
    pub fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                rpc_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version".to_string(),
            ));
        }

        tracing::debug!(method = %request.method, "handling request");

        if request.id.is_none() {
            if request.method == "notifications/initialized" || request.method == "initialized" {
                self.initialized = true;
            }
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            "resources/list" => self.handle_resources_list(request),
            "resources/templates/list" => self.handle_resource_templates_list(request),
            "resources/read" => self.handle_resources_read(request),
            "prompts/list" => self.handle_prompts_list(request),
            "prompts/get" => self.handle_prompts_get(request),
            _ => JsonRpcResponse::error(
                request.id,
                rpc_codes::METHOD_NOT_FOUND,
                format!("Unknown method: {}", request.method),
            ),
        };
        Some(response)
    }

    /// Handle the initialize request.
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        self.initialized = true;

        JsonRpcResponse::success(
            request.id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    /// Handle the tools/list request.
    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            request.id,
            serde_json::json!({ "tools": self.tools.tools() }),
        )
    }

    /// Handle the tools/call request.
    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = match object_params(&request.params) {
            Ok(params) => params,
            Err(err) => return JsonRpcResponse::from_error(request.id, err),
        };

        let name = match params.get("name").and_then(|v| v.as_str()) {
            Some(n) => n.to_string(),
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    rpc_codes::INVALID_PARAMS,
                    "Missing 'name' in params".to_string(),
                )
            }
        };

        let arguments = match object_field(params, "arguments") {
            Ok(args) => args,
            Err(err) => return JsonRpcResponse::from_error(request.id, err),
        };

        match self.tools.dispatch(&mut self.store, &name, arguments) {
            Ok(output) => JsonRpcResponse::success(request.id, tool_result(output)),
            // Execution failures are reported inside the tool result so the
            // agent can see and react to them.
            Err(err) if err.is_not_found() => {
                tracing::warn!(tool = %name, error = %err, "tool call failed");
                JsonRpcResponse::success(request.id, tool_error(&err))
            }
            Err(err) => {
                tracing::warn!(tool = %name, error = %err, "tool call rejected");
                JsonRpcResponse::from_error(request.id, err)
            }
        }
    }

    /// Handle the resources/list request.
    fn handle_resources_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            request.id,
            serde_json::json!({ "resources": self.resources.resources() }),
        )
    }

    /// Handle the resources/templates/list request.
    fn handle_resource_templates_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            request.id,
            serde_json::json!({ "resourceTemplates": self.resources.templates() }),
        )
    }

    /// Handle the resources/read request.
    fn handle_resources_read(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = match object_params(&request.params) {
            Ok(params) => params,
            Err(err) => return JsonRpcResponse::from_error(request.id, err),
        };

        let uri = match params.get("uri").and_then(|v| v.as_str()) {
            Some(uri) => uri,
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    rpc_codes::INVALID_PARAMS,
                    "Missing 'uri' in params".to_string(),
                )
            }
        };

        match self.resources.read(&self.store, uri) {
            Ok(contents) => JsonRpcResponse::success(request.id, resources::read_result(contents)),
            Err(err) => {
                tracing::warn!(uri, error = %err, "resource read failed");
                let code = if err.is_not_found() {
                    rpc_codes::RESOURCE_NOT_FOUND
                } else {
                    err.rpc_code()
                };
                JsonRpcResponse::error(request.id, code, err.to_string())
            }
        }
    }

    /// Handle the prompts/list request.
    fn handle_prompts_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            request.id,
            serde_json::json!({ "prompts": self.prompts.prompts() }),
        )
    }

    /// Handle the prompts/get request.
    fn handle_prompts_get(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = match object_params(&request.params) {
            Ok(params) => params,
            Err(err) => return JsonRpcResponse::from_error(request.id, err),
        };

        let name = match params.get("name").and_then(|v| v.as_str()) {
            Some(n) => n,
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    rpc_codes::INVALID_PARAMS,
                    "Missing 'name' in params".to_string(),
                )
            }
        };

        let arguments = match object_field(params, "arguments") {
            Ok(args) => args,
            Err(err) => return JsonRpcResponse::from_error(request.id, err),
        };

        let rendered = self
            .prompts
            .render(name, &arguments)
            .and_then(|messages| {
                self.prompts
                    .get(name)
                    .map(|prompt| prompts::get_result(prompt, messages))
                    .ok_or_else(|| McpError::UnknownPrompt(name.to_string()))
            });

        match rendered {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(err) => {
                tracing::warn!(prompt = name, error = %err, "prompt rendering failed");
                JsonRpcResponse::from_error(request.id, err)
            }
        }
    }
}

/// Borrow the request params as a JSON object.
fn object_params(params: &Option<JsonValue>) -> Result<&Map<String, JsonValue>> {
    match params {
        Some(JsonValue::Object(obj)) => Ok(obj),
        _ => Err(McpError::InvalidArg {
            name: "params".to_string(),
            reason: "Missing params object".to_string(),
        }),
    }
}

/// Extract an optional object-valued field; absent or `null` is empty.
fn object_field(params: &Map<String, JsonValue>, name: &str) -> Result<Map<String, JsonValue>> {
    match params.get(name) {
        Some(JsonValue::Object(obj)) => Ok(obj.clone()),
        Some(JsonValue::Null) | None => Ok(Map::new()),
        _ => Err(McpError::InvalidArg {
            name: name.to_string(),
            reason: "must be an object".to_string(),
        }),
    }
}
