//! # Error Hierarchy
//!
//! Structured error types for the record and container model, built with
//! `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every error names what failed and why: the field (by internal name and
//! alias) and the violated constraint for records, the offending shape for
//! containers. Callers decide whether to skip, report or abort.

use thiserror::Error;

/// A single record failed one field constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field '{field}' ({alias}): {violation}")]
pub struct FieldError {
    /// Internal name of the offending field (e.g. `color`).
    pub field: &'static str,
    /// Wire alias of the offending field (e.g. `Color`).
    pub alias: &'static str,
    /// The constraint that was violated.
    pub violation: FieldViolation,
}

impl FieldError {
    pub(crate) fn new(
        field: &'static str,
        alias: &'static str,
        violation: FieldViolation,
    ) -> Self {
        Self {
            field,
            alias,
            violation,
        }
    }
}

/// The constraint a field value violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldViolation {
    /// A required field is absent.
    #[error("required field is missing")]
    Missing,

    /// The value has the wrong JSON type.
    #[error("expected {expected}, found {found}")]
    WrongType {
        /// Expected JSON type name.
        expected: &'static str,
        /// JSON type name of the supplied value.
        found: &'static str,
    },

    /// A non-empty string was empty.
    #[error("must be a non-empty string")]
    Empty,

    /// The string does not match the declared pattern.
    #[error("\"{value}\" does not match pattern {pattern}")]
    PatternMismatch {
        /// The regular expression the value must match.
        pattern: &'static str,
        /// The rejected value.
        value: String,
    },

    /// An integer is outside the declared inclusive range.
    #[error("{value} is outside the range [{min}, {max}]")]
    OutOfRange {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
        /// The rejected value, as written on the wire.
        value: String,
    },

    /// A string is not one of the enumerated literals.
    #[error("\"{value}\" is not one of {allowed:?}")]
    NotAllowed {
        /// The permitted literals.
        allowed: &'static [&'static str],
        /// The rejected value.
        value: String,
    },

    /// Some, but not all, of the detail group fields are present.
    #[error("partial detail group: present {present:?}, missing {missing:?}")]
    PartialGroup {
        /// Aliases of the detail fields that were supplied.
        present: Vec<&'static str>,
        /// Aliases of the detail fields that were not supplied.
        missing: Vec<&'static str>,
    },
}

/// A lookup name matched no internal name, alias, or underscore-normalized alias.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{type_name}' has no attribute '{name}'")]
pub struct AttributeError {
    /// The record type that was queried.
    pub type_name: &'static str,
    /// The name that failed to resolve.
    pub name: String,
}

/// A container payload is not one of the two accepted shapes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The payload is neither an array nor an object.
    #[error("payload must be an array of records or an object with one key, found {found}")]
    NotAContainer {
        /// JSON type name of the payload.
        found: &'static str,
    },

    /// A keyed payload did not have exactly one key.
    #[error("keyed container must have exactly one key, found {count}")]
    KeyCount {
        /// Number of keys present.
        count: usize,
    },

    /// The value under the single key is not an array.
    #[error("value under key '{key}' must be an array, found {found}")]
    NotASequence {
        /// The container key.
        key: String,
        /// JSON type name of the value.
        found: &'static str,
    },

    /// The container key differs from the container schema's reference target.
    #[error("container key '{found}' does not match schema reference '{expected}'")]
    KeyMismatch {
        /// Identifier declared by the container schema.
        expected: String,
        /// Key carried by the payload.
        found: String,
    },

    /// The carried version tag expects a different shape.
    #[error("version tag '{version}' expects {expected} shape, container is {found}")]
    VersionMismatch {
        /// The carried version tag.
        version: String,
        /// Shape the tag expects.
        expected: &'static str,
        /// Shape the container has.
        found: &'static str,
    },

    /// A keyed container was given an empty identifier.
    #[error("container identifier must be non-empty")]
    EmptyIdentifier,

    /// An element of the record sequence is not an object.
    #[error("record at {path} must be an object, found {found}")]
    RecordNotObject {
        /// Location of the element (e.g. `key[2]`).
        path: String,
        /// JSON type name of the element.
        found: &'static str,
    },
}

/// Failure to assemble a container from a parsed payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// The payload shape is unacceptable.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A record inside the payload failed the record model.
    #[error("record at {path}: {source}")]
    Record {
        /// Location of the record (e.g. `[3]` or `key[3]`).
        path: String,
        /// The underlying field failure.
        #[source]
        source: FieldError,
    },
}

/// JSON type name used in diagnostics; integral numbers are `integer`.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_display_names_field_and_alias() {
        let err = FieldError::new(
            "color",
            "Color",
            FieldViolation::OutOfRange {
                min: 0,
                max: 25,
                value: "99".to_string(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("color"));
        assert!(msg.contains("Color"));
        assert!(msg.contains("[0, 25]"));
    }

    #[test]
    fn partial_group_display_lists_both_sides() {
        let v = FieldViolation::PartialGroup {
            present: vec!["Application.Name"],
            missing: vec!["Session.CurrentUser"],
        };
        let msg = v.to_string();
        assert!(msg.contains("Application.Name"));
        assert!(msg.contains("Session.CurrentUser"));
    }

    #[test]
    fn attribute_error_display() {
        let err = AttributeError {
            type_name: "CategoryRecord",
            name: "Colour".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'CategoryRecord' has no attribute 'Colour'"
        );
    }

    #[test]
    fn shape_error_key_count_display() {
        let err = ShapeError::KeyCount { count: 2 };
        assert!(err.to_string().contains("exactly one key"));
        assert!(err.to_string().contains('2'));
    }

    #[test]
    fn container_error_wraps_field_error_with_path() {
        let err = ContainerError::Record {
            path: "abc[1]".to_string(),
            source: FieldError::new("name", "Name", FieldViolation::Empty),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc[1]"));
        assert!(msg.contains("Name"));
    }

    #[test]
    fn json_type_names() {
        use serde_json::json;
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(3)), "integer");
        assert_eq!(json_type_name(&json!(3.5)), "number");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
