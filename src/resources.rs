//! Resource registry.
//!
//! Resources are read-only views over the store, addressed by URI. Fixed
//! resources match their address exactly; templates bind `{name}`
//! placeholders from the address and pass them to the handler.
//!
//! Resources: docs://documents, docs://document/{doc_id}

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{McpError, Result};
use crate::store::DocumentStore;

/// Handler for a fixed-address resource.
pub type ResourceHandler = fn(&DocumentStore) -> Result<String>;

/// Handler for a templated resource, given the bound placeholders.
pub type TemplateHandler = fn(&DocumentStore, &BTreeMap<String, String>) -> Result<String>;

/// A fixed-address resource for the `resources/list` response.
#[derive(Clone, Serialize)]
pub struct ResourceDef {
    /// Resource address
    pub uri: String,
    /// Short resource name
    pub name: String,
    /// Resource description
    pub description: String,
    /// MIME type of the returned text
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(skip)]
    handler: ResourceHandler,
}

/// A templated resource for the `resources/templates/list` response.
#[derive(Clone, Serialize)]
pub struct ResourceTemplateDef {
    /// Address pattern with `{name}` placeholders
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,
    /// Short resource name
    pub name: String,
    /// Resource description
    pub description: String,
    /// MIME type of the returned text
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(skip)]
    handler: TemplateHandler,
}

impl std::fmt::Debug for ResourceDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDef")
            .field("uri", &self.uri)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ResourceTemplateDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTemplateDef")
            .field("uri_template", &self.uri_template)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Contents of a resolved resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceContents {
    /// The address that was read
    pub uri: String,
    /// MIME type of `text`
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Resource body
    pub text: String,
}

/// Registry of all available resources and resource templates.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    resources: Vec<ResourceDef>,
    templates: Vec<ResourceTemplateDef>,
}

impl ResourceRegistry {
    /// Create a new registry with all resources registered.
    pub fn new() -> Self {
        Self {
            resources: vec![ResourceDef {
                uri: "docs://documents".to_string(),
                name: "list_docs".to_string(),
                description: "Returns a list of all document ids.".to_string(),
                mime_type: "application/json".to_string(),
                handler: list_docs,
            }],
            templates: vec![ResourceTemplateDef {
                uri_template: "docs://document/{doc_id}".to_string(),
                name: "get_doc".to_string(),
                description: "Returns the contents of a particular document.".to_string(),
                mime_type: "text/plain".to_string(),
                handler: get_doc,
            }],
        }
    }

    /// Get all fixed-address resources.
    pub fn resources(&self) -> &[ResourceDef] {
        &self.resources
    }

    /// Get all resource templates.
    pub fn templates(&self) -> &[ResourceTemplateDef] {
        &self.templates
    }

    /// Resolve an address and read the resource behind it.
    ///
    /// Fixed addresses take precedence over templates.
    pub fn read(&self, store: &DocumentStore, uri: &str) -> Result<ResourceContents> {
        if let Some(resource) = self.resources.iter().find(|r| r.uri == uri) {
            tracing::debug!(uri, name = %resource.name, "reading resource");
            let text = (resource.handler)(store)?;
            return Ok(ResourceContents {
                uri: uri.to_string(),
                mime_type: resource.mime_type.clone(),
                text,
            });
        }

        for template in &self.templates {
            if let Some(params) = match_template(&template.uri_template, uri) {
                tracing::debug!(uri, name = %template.name, "reading resource template");
                let text = (template.handler)(store, &params)?;
                return Ok(ResourceContents {
                    uri: uri.to_string(),
                    mime_type: template.mime_type.clone(),
                    text,
                });
            }
        }

        Err(McpError::UnknownResource(uri.to_string()))
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn list_docs(store: &DocumentStore) -> Result<String> {
    Ok(serde_json::to_string(&store.list_ids())?)
}

fn get_doc(store: &DocumentStore, params: &BTreeMap<String, String>) -> Result<String> {
    let doc_id = params
        .get("doc_id")
        .ok_or_else(|| McpError::MissingArg("doc_id".to_string()))?;
    Ok(store.get(doc_id)?.to_string())
}

/// Match `uri` against a template such as `docs://document/{doc_id}`.
///
/// Each placeholder binds a non-empty run of characters without `/`.
/// Returns the bindings, or `None` if the address does not fit.
pub fn match_template(template: &str, uri: &str) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    let mut rest_t = template;
    let mut rest_u = uri;

    loop {
        match rest_t.find('{') {
            None => {
                return (rest_t == rest_u).then_some(params);
            }
            Some(open) => {
                let literal = &rest_t[..open];
                rest_u = rest_u.strip_prefix(literal)?;

                let close = open + rest_t[open..].find('}')?;
                let name = &rest_t[open + 1..close];
                rest_t = &rest_t[close + 1..];

                // The value ends at the next literal, and never spans a '/'.
                let next_literal = &rest_t[..rest_t.find('{').unwrap_or(rest_t.len())];
                let limit = rest_u.find('/').unwrap_or(rest_u.len());
                let end = if next_literal.is_empty() {
                    limit
                } else {
                    rest_u.find(next_literal).filter(|&i| i <= limit)?
                };
                if end == 0 {
                    return None;
                }

                params.insert(name.to_string(), rest_u[..end].to_string());
                rest_u = &rest_u[end..];
            }
        }
    }
}

/// Convert resolved contents into a `resources/read` result.
pub fn read_result(contents: ResourceContents) -> JsonValue {
    serde_json::json!({ "contents": [contents] })
}
