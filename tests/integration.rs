//! Integration tests for the MCP server.

use std::io::Write;

use doc_mcp::{
    rpc_codes, DocumentStore, JsonRpcRequest, McpError, McpServer, PromptRegistry,
    ResourceRegistry, Role, ToolRegistry,
};
use serde_json::{json, Map, Value as JsonValue};

/// Create a store holding a single document.
fn test_store() -> DocumentStore {
    DocumentStore::new([("a.md", "hello world")])
}

fn as_args(args: JsonValue) -> Map<String, JsonValue> {
    match args {
        JsonValue::Object(m) => m,
        _ => Map::new(),
    }
}

/// Helper to dispatch a tool call.
fn call_tool(
    store: &mut DocumentStore,
    registry: &ToolRegistry,
    name: &str,
    args: JsonValue,
) -> JsonValue {
    registry
        .dispatch(store, name, as_args(args))
        .unwrap_or_else(|e| panic!("Tool {} failed: {}", name, e))
}

/// Helper to dispatch a tool call and expect an error.
fn call_tool_err(
    store: &mut DocumentStore,
    registry: &ToolRegistry,
    name: &str,
    args: JsonValue,
) -> McpError {
    registry
        .dispatch(store, name, as_args(args))
        .expect_err(&format!("Expected tool {} to fail", name))
}

/// Helper to send one request through the dispatcher.
fn rpc(server: &mut McpServer, method: &str, params: JsonValue) -> JsonValue {
    let request: JsonRpcRequest = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params
    }))
    .expect("valid request");
    let response = server.handle_request(request).expect("expected a response");
    serde_json::to_value(&response).expect("response serializes")
}

// =============================================================================
// Store
// =============================================================================

#[test]
fn test_seeded_store_resolves_every_id() {
    let store = DocumentStore::seeded();
    let ids = store.list_ids();
    assert_eq!(ids.len(), 6);
    assert!(ids.contains(&"deposition.md".to_string()));
    assert_eq!(
        store.get("report.pdf").unwrap(),
        "The report details the state of a 20m condenser tower."
    );
}

#[test]
fn test_seed_file() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(file, r#"{{"notes.txt": "alpha", "todo.md": "beta"}}"#).unwrap();

    let store = DocumentStore::from_json_file(file.path()).unwrap();
    assert_eq!(store.list_ids(), vec!["notes.txt".to_string(), "todo.md".to_string()]);
    assert_eq!(store.get("todo.md").unwrap(), "beta");
}

#[test]
fn test_seed_file_wrong_shape() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(file, r#"{{"notes.txt": 42}}"#).unwrap();

    let err = DocumentStore::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, McpError::Config(_)));
}

#[test]
fn test_seed_file_rejects_unaddressable_id() {
    for bad_id in ["d/e.md", ""] {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(file, r#"{{"ok.md": "fine", "{}": "x"}}"#, bad_id).unwrap();

        let err = DocumentStore::from_json_file(file.path()).unwrap_err();
        match err {
            McpError::Config(message) => assert!(message.contains(&format!("'{}'", bad_id))),
            other => panic!("Expected config error, got {:?}", other),
        }
    }
}

#[test]
fn test_seeded_ids_resolve_through_resource_template() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(file, r#"{{"notes.txt": "alpha", "My Doc.md": "beta"}}"#).unwrap();

    let store = DocumentStore::from_json_file(file.path()).unwrap();
    let registry = ResourceRegistry::new();
    for id in store.list_ids() {
        let contents = registry
            .read(&store, &format!("docs://document/{}", id))
            .unwrap_or_else(|e| panic!("{} did not resolve: {}", id, e));
        assert_eq!(contents.text, store.get(&id).unwrap());
    }
}

#[test]
fn test_seed_file_missing() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = DocumentStore::from_json_file(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, McpError::Config(_)));
}

// =============================================================================
// Tools
// =============================================================================

#[test]
fn test_read_doc() {
    let mut store = test_store();
    let registry = ToolRegistry::new();

    let result = call_tool(&mut store, &registry, "read_doc", json!({"doc_id": "a.md"}));
    assert_eq!(result, json!("hello world"));
}

#[test]
fn test_read_doc_missing() {
    let mut store = test_store();
    let registry = ToolRegistry::new();

    let err = call_tool_err(&mut store, &registry, "read_doc", json!({"doc_id": "missing.md"}));
    assert_eq!(err, McpError::DocumentNotFound("missing.md".to_string()));
    assert!(err.to_string().contains("missing.md"));
}

#[test]
fn test_edit_doc_then_read() {
    let mut store = test_store();
    let registry = ToolRegistry::new();

    let result = call_tool(
        &mut store,
        &registry,
        "edit_doc",
        json!({"doc_id": "a.md", "old_str": "world", "new_str": "there"}),
    );
    assert_eq!(result, json!(null));

    let result = call_tool(&mut store, &registry, "read_doc", json!({"doc_id": "a.md"}));
    assert_eq!(result, json!("hello there"));
}

#[test]
fn test_edit_doc_no_occurrence_is_success() {
    let mut store = test_store();
    let registry = ToolRegistry::new();

    call_tool(
        &mut store,
        &registry,
        "edit_doc",
        json!({"doc_id": "a.md", "old_str": "xyz", "new_str": "q"}),
    );
    assert_eq!(store.get("a.md").unwrap(), "hello world");
}

#[test]
fn test_edit_doc_idempotent() {
    let mut store = DocumentStore::new([("b.md", "cat cat dog cat")]);
    let registry = ToolRegistry::new();
    let args = json!({"doc_id": "b.md", "old_str": "cat", "new_str": "bird"});

    call_tool(&mut store, &registry, "edit_doc", args.clone());
    assert_eq!(store.get("b.md").unwrap(), "bird bird dog bird");

    call_tool(&mut store, &registry, "edit_doc", args);
    assert_eq!(store.get("b.md").unwrap(), "bird bird dog bird");
}

#[test]
fn test_edit_doc_case_sensitive() {
    let mut store = DocumentStore::new([("c.md", "Word word WORD")]);
    let registry = ToolRegistry::new();

    call_tool(
        &mut store,
        &registry,
        "edit_doc",
        json!({"doc_id": "c.md", "old_str": "word", "new_str": "term"}),
    );
    assert_eq!(store.get("c.md").unwrap(), "Word term WORD");
}

#[test]
fn test_edit_doc_missing_leaves_store_unchanged() {
    let mut store = test_store();
    let registry = ToolRegistry::new();
    let before = store.clone();

    let err = call_tool_err(
        &mut store,
        &registry,
        "edit_doc",
        json!({"doc_id": "missing.md", "old_str": "a", "new_str": "b"}),
    );
    assert!(err.is_not_found());
    assert_eq!(store.list_ids(), vec!["a.md".to_string()]);
    assert_eq!(store, before);
}

#[test]
fn test_edit_doc_empty_old_str_rejected() {
    let mut store = test_store();
    let registry = ToolRegistry::new();

    let err = call_tool_err(
        &mut store,
        &registry,
        "edit_doc",
        json!({"doc_id": "a.md", "old_str": "", "new_str": "-"}),
    );
    assert!(err.is_invalid_argument());
    assert_eq!(store.get("a.md").unwrap(), "hello world");
}

#[test]
fn test_tool_argument_validation() {
    let mut store = test_store();
    let registry = ToolRegistry::new();

    let err = call_tool_err(&mut store, &registry, "read_doc", json!({}));
    assert!(err.is_invalid_argument());

    let err = call_tool_err(&mut store, &registry, "read_doc", json!({"doc_id": 5}));
    assert!(err.is_invalid_argument());

    let err = call_tool_err(
        &mut store,
        &registry,
        "edit_doc",
        json!({"doc_id": "a.md", "old_str": "hello"}),
    );
    assert!(err.is_invalid_argument());
    assert_eq!(store.get("a.md").unwrap(), "hello world");
}

#[test]
fn test_unknown_tool() {
    let mut store = test_store();
    let registry = ToolRegistry::new();

    let err = call_tool_err(&mut store, &registry, "delete_doc", json!({"doc_id": "a.md"}));
    assert_eq!(err, McpError::UnknownTool("delete_doc".to_string()));
}

// =============================================================================
// Resources
// =============================================================================

#[test]
fn test_list_docs_resource() {
    let store = DocumentStore::seeded();
    let registry = ResourceRegistry::new();

    let contents = registry.read(&store, "docs://documents").unwrap();
    let ids: Vec<String> = serde_json::from_str(&contents.text).unwrap();
    assert_eq!(ids, store.list_ids());
    for id in &ids {
        assert!(store.get(id).is_ok());
    }
}

#[test]
fn test_get_doc_matches_read_doc() {
    let mut store = DocumentStore::seeded();
    let tools = ToolRegistry::new();
    let resources = ResourceRegistry::new();

    call_tool(
        &mut store,
        &tools,
        "edit_doc",
        json!({"doc_id": "plan.md", "old_str": "plan", "new_str": "roadmap"}),
    );

    for id in store.list_ids() {
        let via_tool = call_tool(&mut store, &tools, "read_doc", json!({"doc_id": &id}));
        let via_resource = resources
            .read(&store, &format!("docs://document/{}", id))
            .unwrap();
        assert_eq!(via_tool, json!(via_resource.text));
        assert_eq!(via_resource.mime_type, "text/plain");
    }
}

#[test]
fn test_get_doc_missing() {
    let store = test_store();
    let registry = ResourceRegistry::new();

    let err = registry.read(&store, "docs://document/missing.md").unwrap_err();
    assert_eq!(err, McpError::DocumentNotFound("missing.md".to_string()));
}

// =============================================================================
// Prompts
// =============================================================================

#[test]
fn test_prompts_do_not_require_existing_doc() {
    let registry = PromptRegistry::new();

    for name in ["format_doc", "summarize_doc"] {
        let messages = registry
            .render(name, &as_args(json!({"doc_id": "a.md"})))
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].text().unwrap().contains("a.md"));
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

#[test]
fn test_initialize_advertises_capabilities() {
    let mut server = McpServer::new(test_store());

    let response = rpc(&mut server, "initialize", json!({}));
    let caps = &response["result"]["capabilities"];
    assert!(caps.get("tools").is_some());
    assert!(caps.get("resources").is_some());
    assert!(caps.get("prompts").is_some());
    assert_eq!(response["result"]["serverInfo"]["name"], json!("doc-mcp"));
}

#[test]
fn test_tools_list() {
    let mut server = McpServer::new(test_store());

    let response = rpc(&mut server, "tools/list", json!({}));
    let tools = response["result"]["tools"].as_array().expect("Expected array");
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[1]["name"], json!("edit_doc"));
    assert_eq!(
        tools[1]["inputSchema"]["required"],
        json!(["doc_id", "old_str", "new_str"])
    );
}

#[test]
fn test_tools_call_read_and_edit() {
    let mut server = McpServer::new(test_store());

    let response = rpc(
        &mut server,
        "tools/call",
        json!({"name": "edit_doc", "arguments": {"doc_id": "a.md", "old_str": "world", "new_str": "there"}}),
    );
    assert_eq!(response["result"]["isError"], json!(false));

    let response = rpc(
        &mut server,
        "tools/call",
        json!({"name": "read_doc", "arguments": {"doc_id": "a.md"}}),
    );
    assert_eq!(response["result"]["content"][0]["text"], json!("hello there"));
    assert_eq!(server.store().get("a.md").unwrap(), "hello there");
}

#[test]
fn test_tools_call_not_found_is_tool_error() {
    let mut server = McpServer::new(test_store());

    let response = rpc(
        &mut server,
        "tools/call",
        json!({"name": "read_doc", "arguments": {"doc_id": "missing.md"}}),
    );
    assert_eq!(response["result"]["isError"], json!(true));
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("missing.md"));
}

#[test]
fn test_tools_call_invalid_arguments() {
    let mut server = McpServer::new(test_store());

    let response = rpc(
        &mut server,
        "tools/call",
        json!({"name": "edit_doc", "arguments": {"doc_id": "a.md", "old_str": "", "new_str": "x"}}),
    );
    assert_eq!(response["error"]["code"], json!(rpc_codes::INVALID_PARAMS));
    assert_eq!(server.store().get("a.md").unwrap(), "hello world");
}

#[test]
fn test_resources_over_rpc() {
    let mut server = McpServer::new(test_store());

    let response = rpc(&mut server, "resources/list", json!({}));
    assert_eq!(response["result"]["resources"][0]["uri"], json!("docs://documents"));

    let response = rpc(&mut server, "resources/templates/list", json!({}));
    assert_eq!(
        response["result"]["resourceTemplates"][0]["uriTemplate"],
        json!("docs://document/{doc_id}")
    );

    let response = rpc(&mut server, "resources/read", json!({"uri": "docs://document/a.md"}));
    assert_eq!(response["result"]["contents"][0]["text"], json!("hello world"));

    let response = rpc(&mut server, "resources/read", json!({"uri": "docs://document/none.md"}));
    assert_eq!(response["error"]["code"], json!(rpc_codes::RESOURCE_NOT_FOUND));
    assert!(response["error"]["message"].as_str().unwrap().contains("none.md"));
}

#[test]
fn test_prompts_over_rpc() {
    let mut server = McpServer::new(DocumentStore::empty());

    let response = rpc(&mut server, "prompts/list", json!({}));
    let prompts = response["result"]["prompts"].as_array().expect("Expected array");
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0]["arguments"][0]["name"], json!("doc_id"));
    assert_eq!(prompts[0]["arguments"][0]["required"], json!(true));

    let response = rpc(
        &mut server,
        "prompts/get",
        json!({"name": "summarize_doc", "arguments": {"doc_id": "a.md"}}),
    );
    let messages = response["result"]["messages"].as_array().expect("Expected array");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], json!("user"));
    assert!(messages[0]["content"]["text"].as_str().unwrap().contains("a.md"));

    let response = rpc(&mut server, "prompts/get", json!({"name": "summarize_doc"}));
    assert_eq!(response["error"]["code"], json!(rpc_codes::INVALID_PARAMS));
}

#[test]
fn test_unknown_method() {
    let mut server = McpServer::new(test_store());

    let response = rpc(&mut server, "docs/delete", json!({}));
    assert_eq!(response["error"]["code"], json!(rpc_codes::METHOD_NOT_FOUND));
}

#[tokio::test]
async fn test_serve_over_buffers() {
    let mut server = McpServer::new(test_store());
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "\n",
        "not json\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"read_doc","arguments":{"doc_id":"a.md"}}}"#,
        "\n",
    );
    let mut output = Vec::new();

    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let lines: Vec<JsonValue> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], json!(1));
    assert_eq!(lines[1]["error"]["code"], json!(rpc_codes::PARSE_ERROR));
    assert_eq!(lines[2]["id"], json!(2));
    assert_eq!(lines[2]["result"]["content"][0]["text"], json!("hello world"));
}
