//! Schema documents: a parsed JSON Schema object plus the metadata the
//! registry and validator read from it.

use olcat_core::json_type_name;
use serde_json::{Map, Value};

use crate::error::{DocumentError, SchemaError};

/// The only draft this workspace accepts.
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// A parsed schema document.
///
/// The body is kept exactly as written; [`crate::check_schema_document`]
/// decides whether it is usable.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    body: Map<String, Value>,
    origin: Option<String>,
}

impl SchemaDocument {
    /// Wrap a parsed value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotAnObject`] unless the value is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(body) => Ok(Self { body, origin: None }),
            other => Err(SchemaError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value)?)
    }

    /// Parse a YAML document, optionally unwrapping a top-level key
    /// (the hand-authored item schema lives under `OutlookCategory`).
    pub fn from_yaml_str(text: &str, root_key: Option<&str>) -> Result<Self, DocumentError> {
        let mut value: Value = serde_yaml::from_str(text)?;
        if let Some(key) = root_key {
            value = match value {
                Value::Object(mut map) => map
                    .remove(key)
                    .ok_or_else(|| DocumentError::MissingRootKey(key.to_string()))?,
                _ => return Err(DocumentError::MissingRootKey(key.to_string())),
            };
        }
        Ok(Self::from_value(value)?)
    }

    /// Record where the document came from, used in diagnostics.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Declared `$id`.
    pub fn id(&self) -> Option<&str> {
        self.body.get("$id").and_then(Value::as_str)
    }

    /// Declared `$schema`.
    pub fn draft(&self) -> Option<&str> {
        self.body.get("$schema").and_then(Value::as_str)
    }

    /// Declared `title`.
    pub fn title(&self) -> Option<&str> {
        self.body.get("title").and_then(Value::as_str)
    }

    /// Top-level `x-*` extension keys, in document order.
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.body
            .iter()
            .filter(|(k, _)| k.starts_with("x-"))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// The schema object.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// The schema as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }

    /// Name used in diagnostics: origin, then `$id`, then `title`.
    pub fn label(&self) -> String {
        self.origin
            .as_deref()
            .or_else(|| self.id())
            .or_else(|| self.title())
            .unwrap_or("<anonymous schema>")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const YAML: &str = r#"
OutlookCategory:
  $schema: https://json-schema.org/draft/2020-12/schema
  $id: https://example.com/OutlookCategory.yaml
  title: OutlookCategory
  x-author: someone
  x-license: MIT
  type: object
"#;

    #[test]
    fn yaml_with_root_key_unwraps() {
        let doc = SchemaDocument::from_yaml_str(YAML, Some("OutlookCategory")).unwrap();
        assert_eq!(doc.id(), Some("https://example.com/OutlookCategory.yaml"));
        assert_eq!(doc.draft(), Some(DRAFT_2020_12));
        assert_eq!(doc.title(), Some("OutlookCategory"));
        let ext: Vec<&str> = doc.extensions().map(|(k, _)| k).collect();
        assert_eq!(ext, vec!["x-author", "x-license"]);
    }

    #[test]
    fn yaml_missing_root_key_is_error() {
        let err = SchemaDocument::from_yaml_str(YAML, Some("Other")).unwrap_err();
        assert!(matches!(err, DocumentError::MissingRootKey(k) if k == "Other"));
    }

    #[test]
    fn non_object_rejected() {
        let err = SchemaDocument::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err, SchemaError::NotAnObject { found: "array" });
        assert!(matches!(
            SchemaDocument::from_json_str("true"),
            Err(DocumentError::Schema(_))
        ));
    }

    #[test]
    fn non_object_type_names_match_record_model() {
        for (value, name) in [(json!(3), "integer"), (json!(3.5), "number"), (json!(null), "null")] {
            let err = SchemaDocument::from_value(value.clone()).unwrap_err();
            assert_eq!(err, SchemaError::NotAnObject { found: name });
            assert_eq!(json_type_name(&value), name);
        }
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            SchemaDocument::from_json_str("{"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn label_prefers_origin_then_id_then_title() {
        let doc = SchemaDocument::from_value(json!({"$id": "urn:x", "title": "T"})).unwrap();
        assert_eq!(doc.label(), "urn:x");
        let doc = doc.with_origin("schemas/x.json");
        assert_eq!(doc.label(), "schemas/x.json");
        let doc = SchemaDocument::from_value(json!({"title": "T"})).unwrap();
        assert_eq!(doc.label(), "T");
        let doc = SchemaDocument::from_value(json!({})).unwrap();
        assert_eq!(doc.label(), "<anonymous schema>");
    }
}
