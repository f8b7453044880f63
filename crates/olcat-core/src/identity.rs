//! # Schema Identifiers
//!
//! Schema identifiers are opaque lookup keys. In practice they appear as
//! absolute URLs (`https://.../OutlookCategory.json`), bare UUIDs (the key
//! of a keyed container), and repository-relative paths
//! (`schemas/OutlookCategory.yaml`). They are compared as exact strings
//! and never parsed for resolution; [`SchemaId::kind`] exists only for
//! diagnostics.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ShapeError;

/// How an identifier is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// Has a URI scheme (`https://`, `file://`, `urn:`).
    Url,
    /// A UUID in any of its textual forms.
    Uuid,
    /// Anything else, typically a relative file path.
    Path,
}

impl IdentifierKind {
    /// Classify a raw identifier string.
    pub fn of(identifier: &str) -> Self {
        if Uuid::try_parse(identifier).is_ok() {
            IdentifierKind::Uuid
        } else if has_scheme(identifier) {
            IdentifierKind::Url
        } else {
            IdentifierKind::Path
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            IdentifierKind::Url => "url",
            IdentifierKind::Uuid => "uuid",
            IdentifierKind::Path => "path",
        })
    }
}

/// An opaque, non-empty schema identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaId(String);

impl SchemaId {
    /// Create an identifier, rejecting the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::EmptyIdentifier`] for an empty or
    /// whitespace-only value.
    pub fn new(value: impl Into<String>) -> Result<Self, ShapeError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ShapeError::EmptyIdentifier);
        }
        Ok(Self(s))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the spelling of this identifier.
    pub fn kind(&self) -> IdentifierKind {
        IdentifierKind::of(&self.0)
    }
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-`, `.`,
/// then `:`. A single letter before `:` is a Windows drive, not a scheme.
fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl TryFrom<String> for SchemaId {
    type Error = ShapeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SchemaId> for String {
    fn from(id: SchemaId) -> Self {
        id.0
    }
}

impl AsRef<str> for SchemaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
