//! # Schema Versions
//!
//! The list-shaped and keyed container layouts are two versions of the
//! same export format. A container carries its version tag, and the
//! validator rejects a tag that disagrees with the container's shape
//! before any shape-specific check runs.

use crate::container::ContainerShape;

/// Version tag of an exported container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// Version 1: a bare array of records (`OutlookCategoryArray`).
    Array,
    /// Version 2: an object keyed by the item schema's UUID (`OutlookCategories`).
    Keyed,
}

impl SchemaVersion {
    /// All known versions, oldest first.
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::Array, SchemaVersion::Keyed];

    /// The textual tag, e.g. `keyed/2`.
    pub fn tag(&self) -> &'static str {
        match self {
            SchemaVersion::Array => "array/1",
            SchemaVersion::Keyed => "keyed/2",
        }
    }

    /// Parse a textual tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.tag() == tag)
    }

    /// The container shape this version prescribes.
    pub fn shape(&self) -> ContainerShape {
        match self {
            SchemaVersion::Array => ContainerShape::List,
            SchemaVersion::Keyed => ContainerShape::Map,
        }
    }

    /// The version that prescribes `shape`.
    pub fn for_shape(shape: ContainerShape) -> Self {
        match shape {
            ContainerShape::List => SchemaVersion::Array,
            ContainerShape::Map => SchemaVersion::Keyed,
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
