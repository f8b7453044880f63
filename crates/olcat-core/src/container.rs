//! # Category Container
//!
//! The exported payload as a whole, in one of two accepted shapes:
//!
//! - **List**: a bare ordered array of records.
//! - **Map**: an object with exactly one key, a schema identifier
//!   (typically a UUID), whose value is the ordered array of records.
//!
//! Both normalize to the same internal form: the ordered records plus an
//! optional identifier and a [`SchemaVersion`] tag. Containers are built
//! once per export run and never mutated afterwards.

use serde_json::{Map, Value};

use crate::error::{json_type_name, ContainerError, ShapeError};
use crate::identity::SchemaId;
use crate::record::CategoryRecord;
use crate::version::SchemaVersion;

/// Which of the two accepted layouts a container has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerShape {
    /// Bare array of records.
    List,
    /// Single-key object wrapping the array of records.
    Map,
}

impl ContainerShape {
    /// Lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerShape::List => "list",
            ContainerShape::Map => "map",
        }
    }
}

impl std::fmt::Display for ContainerShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A borrowed view of a raw payload after shape detection.
#[derive(Debug, Clone, Copy)]
pub struct PayloadView<'a> {
    /// Detected shape.
    pub shape: ContainerShape,
    /// The single key of a Map payload.
    pub key: Option<&'a str>,
    /// The record elements, not yet validated.
    pub items: &'a [Value],
}

/// Detect the shape of a parsed payload without validating its records.
///
/// # Errors
///
/// Returns [`ShapeError`] if the payload is neither an array nor an
/// object with exactly one key whose value is an array.
pub fn inspect(payload: &Value) -> Result<PayloadView<'_>, ShapeError> {
    match payload {
        Value::Array(items) => Ok(PayloadView {
            shape: ContainerShape::List,
            key: None,
            items,
        }),
        Value::Object(map) => {
            let (key, value) = single_entry(map)?;
            match value {
                Value::Array(items) => Ok(PayloadView {
                    shape: ContainerShape::Map,
                    key: Some(key),
                    items,
                }),
                other => Err(ShapeError::NotASequence {
                    key: key.to_string(),
                    found: json_type_name(other),
                }),
            }
        }
        other => Err(ShapeError::NotAContainer {
            found: json_type_name(other),
        }),
    }
}

fn single_entry(map: &Map<String, Value>) -> Result<(&str, &Value), ShapeError> {
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((key, value)), None) => Ok((key.as_str(), value)),
        _ => Err(ShapeError::KeyCount { count: map.len() }),
    }
}

/// Human-readable location of a record: `key[index]` or `[index]`.
pub fn record_path(key: Option<&str>, index: usize) -> String {
    format!("{}[{index}]", key.unwrap_or(""))
}

/// The exported records in one of the two accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryContainer {
    identifier: Option<SchemaId>,
    records: Vec<CategoryRecord>,
    version: SchemaVersion,
}

impl CategoryContainer {
    /// Wrap records in the List shape.
    pub fn from_list(records: Vec<CategoryRecord>) -> Self {
        Self {
            identifier: None,
            records,
            version: SchemaVersion::Array,
        }
    }

    /// Wrap records in the Map shape under `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::EmptyIdentifier`] for an empty identifier.
    pub fn from_map(
        identifier: impl Into<String>,
        records: Vec<CategoryRecord>,
    ) -> Result<Self, ShapeError> {
        Ok(Self {
            identifier: Some(SchemaId::new(identifier)?),
            records,
            version: SchemaVersion::Keyed,
        })
    }

    /// Build a Map-shaped container from a raw keyed mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Shape`] unless the mapping has exactly one
    /// key holding an array, and [`ContainerError::Record`] for the first
    /// element that fails the record model.
    pub fn from_keyed(mapping: &Map<String, Value>) -> Result<Self, ContainerError> {
        let (key, value) = single_entry(mapping)?;
        let Value::Array(items) = value else {
            return Err(ShapeError::NotASequence {
                key: key.to_string(),
                found: json_type_name(value),
            }
            .into());
        };
        let records = validate_items(Some(key), items)?;
        Ok(Self::from_map(key, records)?)
    }

    /// Build a container from a parsed payload of either shape.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Shape`] for an unacceptable payload and
    /// [`ContainerError::Record`] for the first invalid record.
    pub fn from_value(payload: &Value) -> Result<Self, ContainerError> {
        let view = inspect(payload)?;
        let records = validate_items(view.key, view.items)?;
        match view.key {
            Some(key) => Ok(Self::from_map(key, records)?),
            None => Ok(Self::from_list(records)),
        }
    }

    /// Override the carried version tag.
    pub fn with_version(mut self, version: SchemaVersion) -> Self {
        self.version = version;
        self
    }

    /// The shape this container was constructed in.
    pub fn shape(&self) -> ContainerShape {
        if self.identifier.is_some() {
            ContainerShape::Map
        } else {
            ContainerShape::List
        }
    }

    /// The carried version tag.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// The Map-shape key, `None` for List shape.
    pub fn identifier(&self) -> Option<&SchemaId> {
        self.identifier.as_ref()
    }

    /// The records in export order.
    pub fn records(&self) -> &[CategoryRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the container holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The wire form: an array, or a single-key object wrapping one.
    pub fn to_value(&self) -> Value {
        let items: Vec<Value> = self
            .records
            .iter()
            .map(|r| Value::Object(r.to_external()))
            .collect();
        match &self.identifier {
            Some(id) => {
                let mut map = Map::new();
                map.insert(id.to_string(), Value::Array(items));
                Value::Object(map)
            }
            None => Value::Array(items),
        }
    }
}

fn validate_items(key: Option<&str>, items: &[Value]) -> Result<Vec<CategoryRecord>, ContainerError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(raw) = item else {
                return Err(ShapeError::RecordNotObject {
                    path: record_path(key, index),
                    found: json_type_name(item),
                }
                .into());
            };
            CategoryRecord::validate(raw).map_err(|source| ContainerError::Record {
                path: record_path(key, index),
                source,
            })
        })
        .collect()
}
