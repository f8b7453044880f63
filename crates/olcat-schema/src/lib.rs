//! # olcat-schema — Schema Registry, Validation & Generation
//!
//! Governs exported category payloads with a two-level JSON Schema: an
//! item schema describing one record and a container schema describing
//! the keyed envelope. Container schemas reference item schemas by opaque
//! identifier through a [`SchemaRegistry`].
//!
//! ## Responsibilities
//!
//! - **Documents:** parse JSON or YAML schema files into [`SchemaDocument`]s
//!   and check them against the Draft 2020-12 meta-schema.
//! - **Registry:** exact-match identifier resolution; no I/O.
//! - **Validation:** [`Validator`] checks List- and Map-shaped containers,
//!   bundling external references so compilation stays offline.
//! - **Generation:** [`codegen`] derives the published schemas from the
//!   record model's field table and reports drift against the
//!   hand-authored schema.
//! - **Store:** [`store`] loads the `schemas/` directory into a registry.

pub mod codegen;
pub mod document;
pub mod error;
pub mod registry;
pub mod store;
pub mod validate;

// Re-export primary types.
pub use codegen::{constraint_drift, Drift, PropertyNames};
pub use document::{SchemaDocument, DRAFT_2020_12};
pub use error::{
    DocumentError, ResolutionError, SchemaError, StoreError, ValidationError, Violation,
};
pub use registry::SchemaRegistry;
pub use store::SchemaSource;
pub use validate::{check_schema_document, EntryPoints, Validator};
