//! # doc-mcp
//!
//! MCP (Model Context Protocol) server exposing a small in-memory document set.
//!
//! This crate provides an MCP server that lets AI agents list, read and edit
//! named text documents, and fetch ready-made prompts for reformatting or
//! summarizing them. It implements the MCP protocol over stdin/stdout using
//! JSON-RPC 2.0.
//!
//! ## Features
//!
//! - **Tools**: `read_doc`, `edit_doc` (literal replace-all, schema-validated arguments)
//! - **Resources**: `docs://documents` and the `docs://document/{doc_id}` template
//! - **Prompts**: `format_doc`, `summarize_doc`
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "docs": {
//!       "command": "/path/to/doc-mcp",
//!       "args": ["--seed", "/path/to/docs.json"]
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! For testing or embedding, you can use the library API:
//!
//! ```
//! use doc_mcp::{DocumentStore, ToolRegistry};
//! use serde_json::json;
//!
//! let mut store = DocumentStore::new([("a.md", "hello world")]);
//! let registry = ToolRegistry::new();
//!
//! let args = json!({"doc_id": "a.md", "old_str": "world", "new_str": "there"});
//! registry
//!     .dispatch(&mut store, "edit_doc", args.as_object().cloned().unwrap_or_default())
//!     .expect("edit failed");
//! assert_eq!(store.get("a.md").unwrap(), "hello there");
//! ```

#![warn(missing_docs)]

mod convert;
mod error;
mod prompts;
mod resources;
mod server;
mod store;
mod tools;
mod validate;

pub use error::{rpc_codes, McpError, Result};
pub use prompts::{PromptArgument, PromptDef, PromptMessage, PromptRegistry, Role};
pub use resources::{
    match_template, ResourceContents, ResourceDef, ResourceRegistry, ResourceTemplateDef,
};
pub use server::{JsonRpcRequest, JsonRpcResponse, McpServer};
pub use store::DocumentStore;
pub use tools::{ToolDef, ToolRegistry};
