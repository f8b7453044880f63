//! # olcat-core — Category Record & Container Model
//!
//! The canonical representation of categories exported from the desktop
//! mail client, independent of how they were collected or where they are
//! written.
//!
//! ## Key Design Principles
//!
//! 1. **One field table.** [`field::FIELDS`] declares every field's internal
//!    name, wire alias, presence and constraint. Validation, lookup,
//!    serialization order and schema generation all read it.
//!
//! 2. **Validated construction.** A [`CategoryRecord`] only exists if it
//!    passed every field constraint and the detail group is all-or-nothing.
//!
//! 3. **Two container shapes, one model.** List- and Map-shaped payloads
//!    both normalize to [`CategoryContainer`], which carries a
//!    [`SchemaVersion`] tag naming the layout it was built from.
//!
//! 4. **Opaque identifiers.** [`SchemaId`] is compared as an exact string,
//!    whether it spells a URL, a UUID, or a path.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `olcat-*` crates (this is the leaf of the DAG).
//! - No logging; every failure is returned as a structured error.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod container;
pub mod error;
pub mod field;
pub mod identity;
pub mod record;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use container::{inspect, record_path, CategoryContainer, ContainerShape, PayloadView};
pub use error::{
    json_type_name, AttributeError, ContainerError, FieldError, FieldViolation, ShapeError,
};
pub use field::{FieldSpec, FieldValue, FIELDS};
pub use identity::{IdentifierKind, SchemaId};
pub use record::{resolve_class_name, CategoryRecord, ExportDetail, ExportMode};
pub use version::SchemaVersion;
