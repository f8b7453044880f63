//! File-backed schema loading.
//!
//! Reads schema documents from a directory, checks each against the
//! Draft 2020-12 meta-schema, and registers it under its declared `$id`
//! plus any configured aliases.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codegen::{CONTAINER_KEY, ITEM_ROOT_KEY};
use crate::document::SchemaDocument;
use crate::error::{SchemaError, StoreError};
use crate::registry::SchemaRegistry;
use crate::validate::check_schema_document;

/// One schema file and how to register it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSource {
    /// File name, relative to the schema directory.
    pub file: PathBuf,
    /// Top-level key wrapping the schema (YAML sources only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_key: Option<String>,
    /// Extra identifiers the document is registered under.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl SchemaSource {
    fn new(file: &str) -> Self {
        Self {
            file: PathBuf::from(file),
            root_key: None,
            aliases: Vec::new(),
        }
    }
}

/// The repository's `schemas/` layout.
pub fn default_sources() -> Vec<SchemaSource> {
    vec![
        SchemaSource {
            root_key: Some(ITEM_ROOT_KEY.to_string()),
            ..SchemaSource::new("OutlookCategory.yaml")
        },
        SchemaSource {
            aliases: vec![CONTAINER_KEY.to_string()],
            ..SchemaSource::new("OutlookCategory.json")
        },
        SchemaSource::new("OutlookCategories.json"),
        SchemaSource::new("OutlookCategoryArray.json"),
    ]
}

/// Read a UTF-8 text file, dropping a leading byte order mark.
pub fn read_text(path: &Path) -> Result<String, StoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Parse a schema file: YAML for `.yaml`/`.yml`, JSON otherwise.
pub fn load_document(path: &Path, root_key: Option<&str>) -> Result<SchemaDocument, StoreError> {
    let text = read_text(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let parsed = if is_yaml {
        SchemaDocument::from_yaml_str(&text, root_key)
    } else {
        SchemaDocument::from_json_str(&text)
    };
    parsed
        .map(|doc| doc.with_origin(path.display().to_string()))
        .map_err(|source| StoreError::Document {
            path: path.to_path_buf(),
            source,
        })
}

/// Load and meta-check one source.
pub fn load_checked(dir: &Path, source: &SchemaSource) -> Result<SchemaDocument, StoreError> {
    let path = dir.join(&source.file);
    let document = load_document(&path, source.root_key.as_deref())?;
    check_schema_document(&document).map_err(|e| invalid(&path, e))?;
    Ok(document)
}

/// Load every source from `dir` into a new registry.
pub fn load_registry(dir: &Path, sources: &[SchemaSource]) -> Result<SchemaRegistry, StoreError> {
    let mut registry = SchemaRegistry::new();
    for source in sources {
        let path = dir.join(&source.file);
        let document = Arc::new(load_checked(dir, source)?);
        let id = registry
            .register_declared(Arc::clone(&document))
            .map_err(|e| invalid(&path, e))?;
        for alias in &source.aliases {
            registry.register(alias.clone(), Arc::clone(&document));
        }
        tracing::debug!(
            path = %path.display(),
            id = %id,
            aliases = ?source.aliases,
            "registered schema"
        );
    }
    Ok(registry)
}

fn invalid(path: &Path, source: SchemaError) -> StoreError {
    StoreError::Invalid {
        path: path.to_path_buf(),
        source,
    }
}
