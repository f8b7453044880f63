//! # Schema Registry
//!
//! Maps opaque identifiers to loaded schema documents. Resolution is an
//! exact string match and never touches the filesystem or network; the
//! caller loads documents (see [`crate::store`]) and registers them here.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::document::SchemaDocument;
use crate::error::{ResolutionError, SchemaError};

/// Identifier → document lookup table.
///
/// One document may be registered under several identifiers, e.g. its
/// published `$id`, the id of its YAML source, and a UUID.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: BTreeMap<String, Arc<SchemaDocument>>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under `identifier`, replacing any previous entry.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        document: impl Into<Arc<SchemaDocument>>,
    ) {
        self.entries.insert(identifier.into(), document.into());
    }

    /// Register `document` under its declared `$id` and return that id.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingId`] if the document has no `$id`.
    pub fn register_declared(
        &mut self,
        document: impl Into<Arc<SchemaDocument>>,
    ) -> Result<String, SchemaError> {
        let document = document.into();
        let id = document
            .id()
            .ok_or_else(|| SchemaError::MissingId {
                schema: document.label(),
            })?
            .to_string();
        self.entries.insert(id.clone(), document);
        Ok(id)
    }

    /// Look up a document by exact identifier.
    pub fn resolve(&self, identifier: &str) -> Result<Arc<SchemaDocument>, ResolutionError> {
        self.entries
            .get(identifier)
            .cloned()
            .ok_or_else(|| ResolutionError {
                reference: identifier.to_string(),
                referrer: None,
            })
    }

    /// Whether `identifier` is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Registered identifiers in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no identifier is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
