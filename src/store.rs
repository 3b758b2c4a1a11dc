//! In-memory document store.
//!
//! The store is the single source of truth for document contents. It is
//! created once at startup and handed by reference to each registry call;
//! only `edit_doc` mutates it.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{McpError, Result};

/// Documents loaded when no seed file is given.
const DEFAULT_SEED: &[(&str, &str)] = &[
    (
        "deposition.md",
        "This deposition covers the testimony of Angela Smith, P.E.",
    ),
    (
        "report.pdf",
        "The report details the state of a 20m condenser tower.",
    ),
    (
        "financials.docx",
        "These financials outline the project's budget and expenditures.",
    ),
    (
        "outlook.pdf",
        "This document presents the projected future performance of the system.",
    ),
    (
        "plan.md",
        "The plan outlines the steps for the project's implementation.",
    ),
    (
        "spec.txt",
        "These specifications define the technical requirements for the equipment.",
    ),
];

/// Mapping from document id to content.
///
/// Ids are opaque, case-sensitive strings. Listing order is sorted by id,
/// but callers should not depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStore {
    docs: BTreeMap<String, String>,
}

impl DocumentStore {
    /// Create a store holding the given documents.
    pub fn new<I, K, V>(docs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            docs: docs
                .into_iter()
                .map(|(id, content)| (id.into(), content.into()))
                .collect(),
        }
    }

    /// Create an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a store holding the built-in seed documents.
    pub fn seeded() -> Self {
        Self::new(DEFAULT_SEED.iter().copied())
    }

    /// Load seed documents from a JSON file containing an object of
    /// id → content strings.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            McpError::Config(format!("failed to read seed file '{}': {}", path.display(), e))
        })?;
        let docs: BTreeMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
            McpError::Config(format!(
                "seed file '{}' must be a JSON object of string contents: {}",
                path.display(),
                e
            ))
        })?;

        // Every listed id must also resolve through `docs://document/{doc_id}`.
        if let Some(id) = docs.keys().find(|id| id.is_empty() || id.contains('/')) {
            return Err(McpError::Config(format!(
                "seed file '{}' has document id '{}' that cannot be addressed: \
                 ids must be non-empty and contain no '/'",
                path.display(),
                id
            )));
        }
        Ok(Self { docs })
    }

    /// Get the content of a document.
    pub fn get(&self, id: &str) -> Result<&str> {
        self.docs
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| McpError::DocumentNotFound(id.to_string()))
    }

    /// Overwrite the content of an existing document.
    ///
    /// Unknown ids fail with `DocumentNotFound`; this never inserts.
    pub fn set(&mut self, id: &str, content: String) -> Result<()> {
        match self.docs.get_mut(id) {
            Some(slot) => {
                *slot = content;
                Ok(())
            }
            None => Err(McpError::DocumentNotFound(id.to_string())),
        }
    }

    /// All current document ids.
    pub fn list_ids(&self) -> Vec<String> {
        self.docs.keys().cloned().collect()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
