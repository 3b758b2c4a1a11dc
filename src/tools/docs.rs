//! Document tools.
//!
//! Tools: read_doc, edit_doc

use serde_json::{Map, Value as JsonValue};

use crate::convert::get_string_arg;
use crate::error::{McpError, Result};
use crate::schema;
use crate::store::DocumentStore;
use crate::tools::ToolDef;

/// Get all document tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "read_doc",
            "Reads the contents of a document and returns it as a string.",
            schema!(object {
                required: { "doc_id": string => "Id of the document to read" }
            }),
            read_doc,
        ),
        ToolDef::new(
            "edit_doc",
            "Edits a document by replacing every occurrence of old_str with new_str. \
             Succeeds without changes when old_str does not occur.",
            schema!(object {
                required: {
                    "doc_id": string => "Id of the document to edit",
                    "old_str": nonempty_string => "String to be replaced",
                    "new_str": string => "String to replace with"
                }
            }),
            edit_doc,
        ),
    ]
}

fn read_doc(store: &mut DocumentStore, args: &Map<String, JsonValue>) -> Result<JsonValue> {
    let doc_id = get_string_arg(args, "doc_id")?;
    let content = store.get(&doc_id)?;
    Ok(JsonValue::String(content.to_string()))
}

fn edit_doc(store: &mut DocumentStore, args: &Map<String, JsonValue>) -> Result<JsonValue> {
    let doc_id = get_string_arg(args, "doc_id")?;
    let old_str = get_string_arg(args, "old_str")?;
    let new_str = get_string_arg(args, "new_str")?;

    // An empty pattern would match between every character.
    if old_str.is_empty() {
        return Err(McpError::InvalidArg {
            name: "old_str".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let current = store.get(&doc_id)?;
    let occurrences = current.matches(old_str.as_str()).count();
    if occurrences == 0 {
        tracing::debug!(doc_id = %doc_id, "edit_doc: no occurrences, content unchanged");
        return Ok(JsonValue::Null);
    }

    let updated = current.replace(old_str.as_str(), &new_str);
    store.set(&doc_id, updated)?;
    tracing::info!(doc_id = %doc_id, occurrences, "edit_doc: document updated");
    Ok(JsonValue::Null)
}
