//! Error types for the MCP server.
//!
//! Every failure is scoped to the request that triggered it. Document and
//! argument failures keep the offending id or argument name so the caller
//! sees it in the message.

use serde::{Deserialize, Serialize};

/// MCP server errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum McpError {
    /// Referenced document id does not exist in the store.
    #[error("document with id '{0}' not found")]
    DocumentNotFound(String),

    /// Unknown tool requested.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// No resource or resource template matches the address.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Unknown prompt requested.
    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),

    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArg(String),

    /// Invalid argument value.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArg {
        /// Argument name
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// JSON-RPC protocol error.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Startup configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Protocol(format!("JSON error: {}", err))
    }
}

/// JSON-RPC error codes.
pub mod rpc_codes {
    /// Parse error - Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found - The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params - Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error - Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Resource not found - MCP extension for `resources/read`.
    pub const RESOURCE_NOT_FOUND: i32 = -32002;
}

impl McpError {
    /// Convert to JSON-RPC error code.
    pub fn rpc_code(&self) -> i32 {
        match self {
            McpError::UnknownTool(_) => rpc_codes::METHOD_NOT_FOUND,
            McpError::UnknownResource(_) => rpc_codes::RESOURCE_NOT_FOUND,
            McpError::UnknownPrompt(_) => rpc_codes::INVALID_PARAMS,
            McpError::MissingArg(_) | McpError::InvalidArg { .. } => rpc_codes::INVALID_PARAMS,
            McpError::DocumentNotFound(_) => rpc_codes::INVALID_PARAMS,
            McpError::Protocol(_) => rpc_codes::INVALID_REQUEST,
            McpError::Config(_) | McpError::Io(_) | McpError::Internal(_) => {
                rpc_codes::INTERNAL_ERROR
            }
        }
    }

    /// Whether this is the `NotFound` kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, McpError::DocumentNotFound(_))
    }

    /// Whether this is the `InvalidArgument` kind.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, McpError::MissingArg(_) | McpError::InvalidArg { .. })
    }
}

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;
