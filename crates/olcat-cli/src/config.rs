//! `olcat.yaml` configuration.
//!
//! Every key is optional; defaults match the repository's `schemas/`
//! layout. Lookup order: `--config <path>`, then `olcat.yaml` at the
//! repository root, then built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use olcat_schema::codegen::{CONTAINER_SCHEMA_ID, ITEM_SCHEMA_ID};
use olcat_schema::store::{default_sources, load_registry};
use olcat_schema::{EntryPoints, SchemaRegistry, SchemaSource};

/// File name looked up at the repository root.
pub const CONFIG_FILE: &str = "olcat.yaml";

/// Which container shape `olcat export` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// Bare array of records (`array/1`).
    List,
    /// Single-key object keyed by the item schema identifier (`keyed/2`).
    Map,
}

/// Export defaults, overridable per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Container shape.
    pub shape: OutputShape,
    /// Drop the detail group from every record.
    pub simplified: bool,
    /// Prefix of the default output file name (`<prefix>-YYYYMMDD.json`).
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            shape: OutputShape::Map,
            simplified: false,
            file_prefix: "categories".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OlcatConfig {
    /// Directory holding schema files, relative to the repository root.
    pub schema_dir: PathBuf,
    /// Identifier of the item schema used for list-shaped payloads.
    pub item_schema: String,
    /// Identifier of the container schema used for keyed payloads.
    pub container_schema: String,
    /// Schema files to load and the identifiers to register them under.
    pub sources: Vec<SchemaSource>,
    /// Export defaults.
    pub export: ExportConfig,
}

impl Default for OlcatConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schemas"),
            item_schema: ITEM_SCHEMA_ID.to_string(),
            container_schema: CONTAINER_SCHEMA_ID.to_string(),
            sources: default_sources(),
            export: ExportConfig::default(),
        }
    }
}

impl OlcatConfig {
    /// Parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Locate and load the configuration for this invocation.
    ///
    /// An explicit path must exist; the repository-root file is optional.
    pub fn discover(explicit: Option<&Path>, repo_root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(&crate::resolve_path(path, repo_root));
        }
        let candidate = repo_root.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using repository config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Absolute schema directory.
    pub fn schema_dir(&self, repo_root: &Path) -> PathBuf {
        crate::resolve_path(&self.schema_dir, repo_root)
    }

    /// Validator entry points.
    pub fn entry_points(&self) -> EntryPoints {
        EntryPoints {
            item: self.item_schema.clone(),
            container: self.container_schema.clone(),
        }
    }

    /// Load every configured schema source into a registry.
    pub fn registry(&self, repo_root: &Path) -> Result<SchemaRegistry> {
        let dir = self.schema_dir(repo_root);
        let registry = load_registry(&dir, &self.sources)
            .with_context(|| format!("failed to load schemas from {}", dir.display()))?;
        tracing::info!(
            schema_dir = %dir.display(),
            identifiers = registry.len(),
            "loaded schema registry"
        );
        Ok(registry)
    }

    /// The configured source whose file name matches `path`, if any.
    pub fn source_for(&self, path: &Path) -> Option<&SchemaSource> {
        let name = path.file_name()?;
        self.sources
            .iter()
            .find(|s| s.file.file_name() == Some(name))
    }
}
