//! Prompt registry.
//!
//! Prompts render conversation starters that point an agent at a document.
//! They never touch the store: the document id is embedded as text and
//! existence is checked later by whichever tool the agent calls.
//!
//! Prompts: format_doc, summarize_doc

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::convert::{get_string_arg, text_content};
use crate::error::{McpError, Result};

/// Common signature of every prompt generator.
pub type PromptHandler = fn(&Map<String, JsonValue>) -> Result<Vec<PromptMessage>>;

/// A declared prompt argument.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    /// Argument name
    pub name: String,
    /// Argument description
    pub description: String,
    /// Whether the argument must be supplied
    pub required: bool,
}

/// A prompt definition for the MCP prompts/list response.
#[derive(Clone, Serialize)]
pub struct PromptDef {
    /// Prompt name (e.g., "format_doc")
    pub name: String,
    /// Prompt description
    pub description: String,
    /// Declared arguments
    pub arguments: Vec<PromptArgument>,
    #[serde(skip)]
    handler: PromptHandler,
}

impl std::fmt::Debug for PromptDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptDef")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Speaker of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation
    User,
}

/// A single rendered prompt message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptMessage {
    /// Who speaks the message
    pub role: Role,
    /// Message body, an MCP text content block
    pub content: JsonValue,
}

impl PromptMessage {
    /// A user message carrying plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text_content(text),
        }
    }

    /// The text of the message, if it is a text block.
    pub fn text(&self) -> Option<&str> {
        self.content.get("text").and_then(|t| t.as_str())
    }
}

/// Registry of all available prompts.
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    prompts: Vec<PromptDef>,
}

impl PromptRegistry {
    /// Create a new registry with all prompts registered.
    pub fn new() -> Self {
        Self {
            prompts: vec![
                PromptDef {
                    name: "format_doc".to_string(),
                    description: "Rewrite a document in markdown format.".to_string(),
                    arguments: vec![doc_id_argument("Id of the document to rewrite")],
                    handler: format_doc,
                },
                PromptDef {
                    name: "summarize_doc".to_string(),
                    description: "Summarize the contents of a document.".to_string(),
                    arguments: vec![doc_id_argument("Id of the document to summarize")],
                    handler: summarize_doc,
                },
            ],
        }
    }

    /// Get all prompt definitions.
    pub fn prompts(&self) -> &[PromptDef] {
        &self.prompts
    }

    /// Look up a prompt by name.
    pub fn get(&self, name: &str) -> Option<&PromptDef> {
        self.prompts.iter().find(|p| p.name == name)
    }

    /// Render a prompt with the given arguments.
    pub fn render(&self, name: &str, args: &Map<String, JsonValue>) -> Result<Vec<PromptMessage>> {
        let prompt = self
            .get(name)
            .ok_or_else(|| McpError::UnknownPrompt(name.to_string()))?;

        for arg in prompt.arguments.iter().filter(|a| a.required) {
            get_string_arg(args, &arg.name)?;
        }

        tracing::debug!(prompt = name, "rendering prompt");
        (prompt.handler)(args)
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn doc_id_argument(description: &str) -> PromptArgument {
    PromptArgument {
        name: "doc_id".to_string(),
        description: description.to_string(),
        required: true,
    }
}

fn format_doc(args: &Map<String, JsonValue>) -> Result<Vec<PromptMessage>> {
    let doc_id = get_string_arg(args, "doc_id")?;
    let text = format!(
        "Your goal is to reformat a document to be written with markdown syntax.\n\
         \n\
         The id of the document you need to reformat is:\n\
         <document_id>\n\
         {doc_id}\n\
         </document_id>\n\
         \n\
         Add in headers, bullet points, tables, etc as necessary. Feel free to add in extra text, \
         but don't change the meaning of the report.\n\
         Use the 'edit_doc' tool to edit the document. After the document has been edited, \
         respond with the final version of the doc. Don't explain your changes.\n"
    );
    Ok(vec![PromptMessage::user(text)])
}

fn summarize_doc(args: &Map<String, JsonValue>) -> Result<Vec<PromptMessage>> {
    let doc_id = get_string_arg(args, "doc_id")?;
    let text = format!(
        "Your goal is to summarize the contents of a document.\n\
         \n\
         The id of the document you need to summarize is:\n\
         <document_id>\n\
         {doc_id}\n\
         </document_id>\n\
         \n\
         Provide a concise summary of the document's key points.\n"
    );
    Ok(vec![PromptMessage::user(text)])
}

/// Convert rendered messages into a `prompts/get` result.
pub fn get_result(prompt: &PromptDef, messages: Vec<PromptMessage>) -> JsonValue {
    serde_json::json!({
        "description": prompt.description,
        "messages": messages
    })
}
