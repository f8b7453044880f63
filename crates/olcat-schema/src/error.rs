//! # Schema Error Types
//!
//! The taxonomy separates "the schema itself is broken" ([`SchemaError`])
//! from "a reference cannot be answered" ([`ResolutionError`]) from "the
//! data does not conform to a valid schema" ([`ValidationError::NonConforming`]).
//! Shape failures come from `olcat-core` unchanged.

use std::fmt;
use std::path::PathBuf;

use olcat_core::ShapeError;
use thiserror::Error;

/// A schema document is not a legal Draft 2020-12 schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The document root is not a JSON object.
    #[error("schema document must be an object, found {found}")]
    NotAnObject {
        /// JSON type name of the root.
        found: &'static str,
    },

    /// `$schema` is missing or names a draft other than 2020-12.
    #[error("schema '{schema}' must declare Draft 2020-12, found {}", found.as_deref().unwrap_or("no $schema"))]
    UnsupportedDraft {
        /// Label of the offending document.
        schema: String,
        /// The declared `$schema`, if any.
        found: Option<String>,
    },

    /// The document fails the Draft 2020-12 meta-schema.
    #[error("schema '{schema}' fails the Draft 2020-12 meta-schema at '{instance_path}': {message}")]
    MetaSchema {
        /// Label of the offending document.
        schema: String,
        /// JSON Pointer to the offending keyword inside the document.
        instance_path: String,
        /// Meta-schema violation detail.
        message: String,
    },

    /// The validator could not be compiled (e.g. an invalid regex).
    #[error("schema '{schema}' could not be compiled: {reason}")]
    Compile {
        /// Label of the offending document.
        schema: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A container schema declares no `items.$ref` under its properties.
    #[error("container schema '{schema}' declares no item schema reference")]
    MissingItemReference {
        /// Label of the offending document.
        schema: String,
    },

    /// A document was registered by its declared identifier but has no `$id`.
    #[error("schema '{schema}' declares no $id")]
    MissingId {
        /// Label of the offending document.
        schema: String,
    },
}

/// A reference identifier is absent from the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no schema registered for '{reference}'{}", referrer.as_ref().map(|r| format!(" (referenced from '{r}')")).unwrap_or_default())]
pub struct ResolutionError {
    /// The identifier that failed to resolve.
    pub reference: String,
    /// The schema containing the reference, if resolution was for a `$ref`.
    pub referrer: Option<String>,
}

/// A single data violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Human-readable location, e.g. `8f87b8d1-...[0].Color` or `[2].Name`.
    pub path: String,
    /// The violated schema keyword, e.g. `maximum` or `required`.
    pub rule: String,
    /// JSON Pointer path within the bundled schema that triggered the error.
    pub schema_path: String,
    /// Validator message.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {} [{}]", self.message, self.rule)
        } else {
            write!(f, "{}: {} [{}]", self.path, self.message, self.rule)
        }
    }
}

/// Outcome of a failed container validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A schema involved in the validation is itself invalid.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A schema or reference could not be resolved from the registry.
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// The container shape is unacceptable.
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// The data does not conform to a valid schema.
    #[error("validation failed: {0}")]
    NonConforming(Violation),
}

/// Failure to parse a schema document from text.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Invalid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The expected top-level wrapper key is absent.
    #[error("missing top-level key '{0}'")]
    MissingRootKey(String),

    /// The parsed value is not a schema object.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Failure to load schema files from disk.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed into a schema document.
    #[error("cannot load '{}': {source}", path.display())]
    Document {
        /// Path of the file.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: DocumentError,
    },

    /// The document failed its meta-schema check.
    #[error("'{}' is not a valid schema: {source}", path.display())]
    Invalid {
        /// Path of the file.
        path: PathBuf,
        /// Underlying schema failure.
        #[source]
        source: SchemaError,
    },
}
