//! # Container Validation
//!
//! Validates exported category payloads against the registered item and
//! container schemas using the `jsonschema` crate (Draft 2020-12).
//!
//! ## Reference Resolution
//!
//! Container schemas reference item schemas by opaque identifier (a UUID in
//! the published layout). Before compiling, every external `$ref` is looked
//! up in the [`SchemaRegistry`], checked against the meta-schema, and
//! embedded under `$defs`; the reference is rewritten to point there. The
//! compiled validator uses a retriever that refuses every URI, so
//! validation never reaches the network or the filesystem.
//!
//! ## Order of Checks
//!
//! 1. Version tag against shape.
//! 2. List shape: item schema, then each record in order (fail-fast).
//! 3. Map shape: container schema, container key against the schema's item
//!    reference, referenced documents, then the whole payload.

use std::collections::HashMap;

use olcat_core::{inspect, record_path, CategoryContainer, ContainerShape, PayloadView, ShapeError};
use serde_json::{Map, Value};

use crate::document::{SchemaDocument, DRAFT_2020_12};
use crate::error::{ResolutionError, SchemaError, ValidationError, Violation};
use crate::registry::SchemaRegistry;

/// Prefix of `$defs` entries created by bundling.
const BUNDLE_PREFIX: &str = "olcat-bundle-";

/// Keywords whose values are data, not subschemas.
const DATA_KEYWORDS: &[&str] = &["const", "enum", "default", "examples"];

/// Keywords whose values map arbitrary names to subschemas.
const NAMED_SCHEMA_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "$defs",
    "definitions",
    "dependentSchemas",
];

/// Keywords reported as the violated rule.
const RULE_KEYWORDS: &[&str] = &[
    "additionalProperties",
    "allOf",
    "anyOf",
    "const",
    "dependentRequired",
    "enum",
    "exclusiveMaximum",
    "exclusiveMinimum",
    "format",
    "items",
    "maxItems",
    "maxLength",
    "maxProperties",
    "maximum",
    "minItems",
    "minLength",
    "minProperties",
    "minimum",
    "not",
    "oneOf",
    "pattern",
    "prefixItems",
    "propertyNames",
    "required",
    "type",
    "uniqueItems",
];

// ---------------------------------------------------------------------------
// Meta-schema check
// ---------------------------------------------------------------------------

/// Check that a document is a legal Draft 2020-12 schema.
///
/// The document must declare `$schema` as Draft 2020-12 and pass the
/// Draft 2020-12 meta-schema.
pub fn check_schema_document(document: &SchemaDocument) -> Result<(), SchemaError> {
    match document.draft() {
        Some(draft) if draft.trim_end_matches('#') == DRAFT_2020_12 => {}
        other => {
            return Err(SchemaError::UnsupportedDraft {
                schema: document.label(),
                found: other.map(str::to_string),
            })
        }
    }
    let body = document.to_value();
    jsonschema::draft202012::meta::validate(&body).map_err(|e| SchemaError::MetaSchema {
        schema: document.label(),
        instance_path: e.instance_path.to_string(),
        message: e.to_string(),
    })
}

/// The item reference declared by a keyed container schema: the target of
/// the first `properties.*.items.$ref`, without fragment.
pub fn item_reference(container: &SchemaDocument) -> Result<String, SchemaError> {
    container
        .body()
        .get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|props| props.values())
        .filter_map(|prop| prop.get("items")?.get("$ref")?.as_str())
        .map(|r| split_reference(r).0)
        .find(|target| !target.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SchemaError::MissingItemReference {
            schema: container.label(),
        })
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Registry identifiers the validator starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoints {
    /// Item schema used for List-shaped payloads.
    pub item: String,
    /// Container schema used for Map-shaped payloads.
    pub container: String,
}

impl Default for EntryPoints {
    /// The published item and keyed container schemas.
    fn default() -> Self {
        Self {
            item: crate::codegen::ITEM_SCHEMA_ID.to_string(),
            container: crate::codegen::CONTAINER_SCHEMA_ID.to_string(),
        }
    }
}

/// Validates containers against the schemas in a [`SchemaRegistry`].
#[derive(Debug, Clone)]
pub struct Validator {
    entry: EntryPoints,
}

impl Validator {
    /// Create a validator with the given entry points.
    pub fn new(entry: EntryPoints) -> Self {
        Self { entry }
    }

    /// The configured entry points.
    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry
    }

    /// The key a Map-shaped container must carry: the container schema's
    /// item reference.
    pub fn expected_key(&self, registry: &SchemaRegistry) -> Result<String, ValidationError> {
        let container = registry.resolve(&self.entry.container)?;
        check_schema_document(&container)?;
        Ok(item_reference(&container)?)
    }

    /// Validate a constructed container.
    pub fn validate(
        &self,
        container: &CategoryContainer,
        registry: &SchemaRegistry,
    ) -> Result<(), ValidationError> {
        let version = container.version();
        if version.shape() != container.shape() {
            return Err(ShapeError::VersionMismatch {
                version: version.tag().to_string(),
                expected: version.shape().as_str(),
                found: container.shape().as_str(),
            }
            .into());
        }
        let payload = container.to_value();
        self.validate_value(&payload, registry)
    }

    /// Validate a parsed payload whose shape has not been checked yet.
    pub fn validate_value(
        &self,
        payload: &Value,
        registry: &SchemaRegistry,
    ) -> Result<(), ValidationError> {
        let view = inspect(payload)?;
        match view.shape {
            ContainerShape::List => self.validate_list(&view, registry),
            ContainerShape::Map => self.validate_map(payload, &view, registry),
        }
    }

    fn validate_list(
        &self,
        view: &PayloadView<'_>,
        registry: &SchemaRegistry,
    ) -> Result<(), ValidationError> {
        let item = registry.resolve(&self.entry.item)?;
        check_schema_document(&item)?;
        let compiled = compile(&item, registry)?;
        for (index, record) in view.items.iter().enumerate() {
            if let Some(violation) = first_violation(&compiled, record, &record_path(None, index)) {
                return Err(ValidationError::NonConforming(violation));
            }
        }
        Ok(())
    }

    fn validate_map(
        &self,
        payload: &Value,
        view: &PayloadView<'_>,
        registry: &SchemaRegistry,
    ) -> Result<(), ValidationError> {
        let container = registry.resolve(&self.entry.container)?;
        check_schema_document(&container)?;
        let expected = item_reference(&container)?;
        let found = view.key.unwrap_or_default();
        if found != expected {
            return Err(ShapeError::KeyMismatch {
                expected,
                found: found.to_string(),
            }
            .into());
        }
        let compiled = compile(&container, registry)?;
        match first_violation(&compiled, payload, "") {
            Some(violation) => Err(ValidationError::NonConforming(violation)),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Bundling and compilation
// ---------------------------------------------------------------------------

/// Retriever that refuses every URI; all references are bundled beforehand.
struct OfflineRetriever;

impl jsonschema::Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("remote retrieval is disabled: {}", uri.as_str()).into())
    }
}

/// Embed every external reference of `document` under `$defs` and return
/// the self-contained schema.
pub fn bundle(document: &SchemaDocument, registry: &SchemaRegistry) -> Result<Value, ValidationError> {
    let mut bundler = Bundler {
        registry,
        root_id: document.id().map(str::to_string),
        keys: HashMap::new(),
        defs: Map::new(),
    };
    let mut root = document.to_value();
    bundler.rewrite(&mut root, &document.label(), None)?;
    if !bundler.defs.is_empty() {
        if let Value::Object(map) = &mut root {
            let defs = map
                .entry("$defs")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(defs) = defs {
                defs.extend(bundler.defs);
            }
        }
    }
    Ok(root)
}

struct Bundler<'r> {
    registry: &'r SchemaRegistry,
    root_id: Option<String>,
    keys: HashMap<String, String>,
    defs: Map<String, Value>,
}

impl Bundler<'_> {
    /// Rewrite references in `value`. `local` is the `$defs` key of the
    /// embedded document `value` belongs to, `None` for the root.
    fn rewrite(
        &mut self,
        value: &mut Value,
        referrer: &str,
        local: Option<&str>,
    ) -> Result<(), ValidationError> {
        match value {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref").and_then(Value::as_str).map(str::to_string) {
                    let rewritten = self.target(&reference, referrer, local)?;
                    map.insert("$ref".to_string(), Value::String(rewritten));
                }
                for (key, child) in map.iter_mut() {
                    let key = key.as_str();
                    if DATA_KEYWORDS.contains(&key) {
                        continue;
                    }
                    match child {
                        // Names here are not keywords, even `default` or `enum`.
                        Value::Object(named) if NAMED_SCHEMA_KEYWORDS.contains(&key) => {
                            for schema in named.values_mut() {
                                self.rewrite(schema, referrer, local)?;
                            }
                        }
                        _ => self.rewrite(child, referrer, local)?,
                    }
                }
                Ok(())
            }
            Value::Array(items) => {
                for child in items {
                    self.rewrite(child, referrer, local)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn target(
        &mut self,
        reference: &str,
        referrer: &str,
        local: Option<&str>,
    ) -> Result<String, ValidationError> {
        let (target, fragment) = split_reference(reference);
        let key = if target.is_empty() {
            match local {
                Some(key) => key.to_string(),
                None => return Ok(reference.to_string()),
            }
        } else if local.is_none() && self.root_id.as_deref() == Some(target) {
            return Ok(format!("#{fragment}"));
        } else {
            self.embed(target, referrer)?
        };
        Ok(format!("#/$defs/{key}{}", pointer_suffix(fragment)))
    }

    fn embed(&mut self, target: &str, referrer: &str) -> Result<String, ValidationError> {
        if let Some(key) = self.keys.get(target) {
            return Ok(key.clone());
        }
        let document = self
            .registry
            .resolve(target)
            .map_err(|e| ResolutionError {
                reference: e.reference,
                referrer: Some(referrer.to_string()),
            })?;
        check_schema_document(&document)?;

        let key = format!("{BUNDLE_PREFIX}{}", self.keys.len());
        self.keys.insert(target.to_string(), key.clone());

        let mut body = document.body().clone();
        body.remove("$id");
        body.remove("$schema");
        let mut body = Value::Object(body);
        self.rewrite(&mut body, &document.label(), Some(&key))?;
        self.defs.insert(key.clone(), body);
        Ok(key)
    }
}

/// Split `uri#fragment` into its parts; the fragment excludes `#`.
fn split_reference(reference: &str) -> (&str, &str) {
    match reference.split_once('#') {
        Some((target, fragment)) => (target, fragment),
        None => (reference, ""),
    }
}

/// Only JSON Pointer fragments survive bundling; anchors fall back to the
/// embedded document root.
fn pointer_suffix(fragment: &str) -> &str {
    if fragment.starts_with('/') {
        fragment
    } else {
        ""
    }
}

fn compile(
    document: &SchemaDocument,
    registry: &SchemaRegistry,
) -> Result<jsonschema::Validator, ValidationError> {
    let bundled = bundle(document, registry)?;
    let compiled = jsonschema::options()
        .with_draft(jsonschema::Draft::Draft202012)
        .with_retriever(OfflineRetriever)
        .build(&bundled)
        .map_err(|e| SchemaError::Compile {
            schema: document.label(),
            reason: e.to_string(),
        })?;
    Ok(compiled)
}

// ---------------------------------------------------------------------------
// Error reporting
// ---------------------------------------------------------------------------

fn first_violation(
    compiled: &jsonschema::Validator,
    instance: &Value,
    prefix: &str,
) -> Option<Violation> {
    let error = compiled.iter_errors(instance).next()?;
    let mut path = render_path(prefix, &error.instance_path.to_string());
    if let jsonschema::error::ValidationErrorKind::Required { property } = &error.kind {
        if let Some(property) = property.as_str() {
            push_segment(&mut path, property);
        }
    }
    let schema_path = error.schema_path.to_string();
    Some(Violation {
        path,
        rule: rule_keyword(&schema_path),
        schema_path,
        message: error.to_string(),
    })
}

/// Render a JSON Pointer as `key[0].Field`, appended to `prefix`.
fn render_path(prefix: &str, pointer: &str) -> String {
    let mut out = prefix.to_string();
    for raw in pointer.split('/').skip(1) {
        let segment = raw.replace("~1", "/").replace("~0", "~");
        push_segment(&mut out, &segment);
    }
    out
}

fn push_segment(out: &mut String, segment: &str) {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        out.push('[');
        out.push_str(segment);
        out.push(']');
    } else {
        if !out.is_empty() {
            out.push('.');
        }
        out.push_str(segment);
    }
}

/// The last keyword in a schema path, e.g. `maximum` for
/// `/properties/k/items/$ref/properties/Color/maximum`.
fn rule_keyword(schema_path: &str) -> String {
    let segments: Vec<&str> = schema_path.split('/').filter(|s| !s.is_empty()).collect();
    segments
        .iter()
        .rev()
        .find(|s| RULE_KEYWORDS.contains(s))
        .or(segments.last())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use olcat_core::{CategoryRecord, SchemaId, SchemaVersion};
    use serde_json::json;

    const KEY: &str = "8f87b8d1-5e2a-4c39-9b61-0d7e4a3f12c8";
    const ITEM_ID: &str = "urn:test:item";
    const CONTAINER_ID: &str = "urn:test:container";

    fn item_schema() -> Value {
        json!({
            "$schema": DRAFT_2020_12,
            "$id": ITEM_ID,
            "type": "object",
            "properties": {
                "Account": {"type": "string", "minLength": 1},
                "CategoryID": {"type": "string", "pattern": olcat_core::field::GUID_PATTERN},
                "Color": {"type": "integer", "minimum": 0, "maximum": 25},
                "Name": {"type": "string", "minLength": 1},
                "ClassName": {"type": "string", "enum": ["olCategory"]}
            },
            "required": ["Account", "CategoryID", "Color", "Name", "ClassName"]
        })
    }

    fn container_schema(reference: &str) -> Value {
        json!({
            "$schema": DRAFT_2020_12,
            "$id": CONTAINER_ID,
            "type": "object",
            "properties": {
                KEY: {"type": "array", "items": {"$ref": reference}}
            },
            "required": [KEY],
            "additionalProperties": false
        })
    }

    fn registry() -> SchemaRegistry {
        let mut reg = SchemaRegistry::new();
        let item = SchemaDocument::from_value(item_schema()).unwrap();
        reg.register(ITEM_ID, item.clone());
        reg.register(KEY, item);
        reg.register(
            CONTAINER_ID,
            SchemaDocument::from_value(container_schema(KEY)).unwrap(),
        );
        reg
    }

    fn validator() -> Validator {
        Validator::new(EntryPoints {
            item: ITEM_ID.to_string(),
            container: CONTAINER_ID.to_string(),
        })
    }

    fn raw(color: i64) -> Value {
        json!({
            "Account": "user@example.com",
            "CategoryID": "{0A1B2C3D-4E5F-6789-ABCD-EF0123456789}",
            "Color": color,
            "Name": "Red category",
            "ClassName": "olCategory"
        })
    }

    #[test]
    fn meta_check_accepts_valid_schema() {
        let doc = SchemaDocument::from_value(item_schema()).unwrap();
        assert!(check_schema_document(&doc).is_ok());
    }

    #[test]
    fn meta_check_rejects_wrong_draft() {
        let doc = SchemaDocument::from_value(json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object"
        }))
        .unwrap();
        assert!(matches!(
            check_schema_document(&doc),
            Err(SchemaError::UnsupportedDraft { found: Some(_), .. })
        ));
        let doc = SchemaDocument::from_value(json!({"type": "object"})).unwrap();
        assert!(matches!(
            check_schema_document(&doc),
            Err(SchemaError::UnsupportedDraft { found: None, .. })
        ));
    }

    #[test]
    fn meta_check_rejects_malformed_keyword() {
        let doc = SchemaDocument::from_value(json!({
            "$schema": DRAFT_2020_12,
            "type": "object",
            "properties": {"Color": {"type": "integer", "minimum": "zero"}}
        }))
        .unwrap();
        match check_schema_document(&doc) {
            Err(SchemaError::MetaSchema { instance_path, .. }) => {
                assert!(instance_path.contains("Color"), "{instance_path}");
            }
            other => panic!("expected meta-schema error, got {other:?}"),
        }
    }

    #[test]
    fn item_reference_strips_fragment() {
        let doc = SchemaDocument::from_value(container_schema("urn:item#/$defs/x")).unwrap();
        assert_eq!(item_reference(&doc).unwrap(), "urn:item");
        let bare = SchemaDocument::from_value(json!({"$schema": DRAFT_2020_12})).unwrap();
        assert!(matches!(
            item_reference(&bare),
            Err(SchemaError::MissingItemReference { .. })
        ));
    }

    #[test]
    fn list_payload_valid() {
        let payload = json!([raw(3), raw(25)]);
        validator().validate_value(&payload, &registry()).unwrap();
    }

    #[test]
    fn list_payload_reports_first_failing_index() {
        let payload = json!([raw(3), raw(26), raw(99)]);
        match validator().validate_value(&payload, &registry()) {
            Err(ValidationError::NonConforming(v)) => {
                assert_eq!(v.path, "[1].Color");
                assert_eq!(v.rule, "maximum");
            }
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn list_missing_field_names_it() {
        let mut record = raw(3);
        record.as_object_mut().unwrap().remove("Name");
        let payload = json!([record]);
        match validator().validate_value(&payload, &registry()) {
            Err(ValidationError::NonConforming(v)) => {
                assert_eq!(v.path, "[0].Name");
                assert_eq!(v.rule, "required");
            }
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn keyed_payload_valid() {
        let payload = json!({ KEY: [raw(0), raw(25)] });
        validator().validate_value(&payload, &registry()).unwrap();
    }

    #[test]
    fn keyed_payload_reports_key_index_and_field() {
        let payload = json!({ KEY: [raw(99)] });
        match validator().validate_value(&payload, &registry()) {
            Err(ValidationError::NonConforming(v)) => {
                assert_eq!(v.path, format!("{KEY}[0].Color"));
                assert_eq!(v.rule, "maximum");
            }
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn keyed_payload_with_two_keys_is_shape_error() {
        let payload = json!({ KEY: [raw(1)], "other": [] });
        assert_eq!(
            validator().validate_value(&payload, &SchemaRegistry::new()),
            Err(ValidationError::Shape(ShapeError::KeyCount { count: 2 }))
        );
    }

    #[test]
    fn keyed_payload_with_wrong_key_is_shape_error() {
        let payload = json!({ "00000000-0000-0000-0000-000000000000": [raw(1)] });
        assert!(matches!(
            validator().validate_value(&payload, &registry()),
            Err(ValidationError::Shape(ShapeError::KeyMismatch { .. }))
        ));
    }

    #[test]
    fn unregistered_item_reference_is_resolution_error() {
        let mut reg = SchemaRegistry::new();
        reg.register(
            CONTAINER_ID,
            SchemaDocument::from_value(container_schema(KEY)).unwrap(),
        );
        let payload = json!({ KEY: [raw(1)] });
        match validator().validate_value(&payload, &reg) {
            Err(ValidationError::Resolution(e)) => {
                assert_eq!(e.reference, KEY);
                assert_eq!(e.referrer.as_deref(), Some(CONTAINER_ID));
            }
            other => panic!("expected resolution error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_referenced_schema_is_schema_error() {
        let mut reg = registry();
        let mut broken = item_schema();
        broken["properties"]["Color"]["maximum"] = json!("twenty-five");
        reg.register(KEY, SchemaDocument::from_value(broken).unwrap());
        // The record also breaks the data rules; the schema error wins.
        let payload = json!({ KEY: [raw(99)] });
        assert!(matches!(
            validator().validate_value(&payload, &reg),
            Err(ValidationError::Schema(SchemaError::MetaSchema { .. }))
        ));
    }

    #[test]
    fn invalid_item_schema_is_reported_before_list_data() {
        let mut reg = registry();
        let mut broken = item_schema();
        broken["properties"]["Color"]["maximum"] = json!("twenty-five");
        reg.register(ITEM_ID, SchemaDocument::from_value(broken).unwrap());
        let payload = json!([raw(1), raw(99)]);
        assert!(matches!(
            validator().validate_value(&payload, &reg),
            Err(ValidationError::Schema(SchemaError::MetaSchema { .. }))
        ));
    }

    #[test]
    fn missing_container_schema_is_resolution_error() {
        let payload = json!({ KEY: [raw(1)] });
        match validator().validate_value(&payload, &SchemaRegistry::new()) {
            Err(ValidationError::Resolution(e)) => assert_eq!(e.reference, CONTAINER_ID),
            other => panic!("expected resolution error, got {other:?}"),
        }
    }

    #[test]
    fn validate_container_checks_version_tag_first() {
        let record = CategoryRecord::from_value(&raw(4)).unwrap();
        let container = CategoryContainer::from_list(vec![record]).with_version(SchemaVersion::Keyed);
        assert!(matches!(
            validator().validate(&container, &SchemaRegistry::new()),
            Err(ValidationError::Shape(ShapeError::VersionMismatch { .. }))
        ));
    }

    #[test]
    fn validate_constructed_map_container() {
        let record = CategoryRecord::from_value(&raw(4)).unwrap();
        let container =
            CategoryContainer::from_map(SchemaId::new(KEY).unwrap(), vec![record]).unwrap();
        validator().validate(&container, &registry()).unwrap();
        assert_eq!(validator().expected_key(&registry()).unwrap(), KEY);
    }

    #[test]
    fn bundle_embeds_reference_under_defs() {
        let reg = registry();
        let container = reg.resolve(CONTAINER_ID).unwrap();
        let bundled = bundle(&container, &reg).unwrap();
        assert_eq!(
            bundled["properties"][KEY]["items"]["$ref"],
            json!("#/$defs/olcat-bundle-0")
        );
        let embedded = &bundled["$defs"]["olcat-bundle-0"];
        assert_eq!(embedded["type"], json!("object"));
        assert!(embedded.get("$id").is_none());
        assert!(embedded.get("$schema").is_none());
    }

    #[test]
    fn bundle_rewrites_internal_refs_of_embedded_documents() {
        let mut reg = SchemaRegistry::new();
        reg.register(
            "urn:inner",
            SchemaDocument::from_value(json!({
                "$schema": DRAFT_2020_12,
                "$defs": {"color": {"type": "integer"}},
                "properties": {"Color": {"$ref": "#/$defs/color"}},
                "enum": [{"$ref": "not-a-reference"}]
            }))
            .unwrap(),
        );
        let outer = SchemaDocument::from_value(json!({
            "$schema": DRAFT_2020_12,
            "items": {"$ref": "urn:inner"}
        }))
        .unwrap();
        let bundled = bundle(&outer, &reg).unwrap();
        let inner = &bundled["$defs"]["olcat-bundle-0"];
        assert_eq!(
            inner["properties"]["Color"]["$ref"],
            json!("#/$defs/olcat-bundle-0/$defs/color")
        );
        assert_eq!(inner["enum"][0]["$ref"], json!("not-a-reference"));
    }

    #[test]
    fn bundle_follows_refs_under_property_named_like_data_keyword() {
        let mut reg = SchemaRegistry::new();
        reg.register(
            "urn:sub",
            SchemaDocument::from_value(json!({
                "$schema": DRAFT_2020_12,
                "type": "integer",
                "maximum": 5
            }))
            .unwrap(),
        );
        let outer = SchemaDocument::from_value(json!({
            "$schema": DRAFT_2020_12,
            "$id": "urn:outer",
            "type": "object",
            "properties": {
                "default": {"$ref": "urn:sub"},
                "enum": {"$ref": "urn:sub"}
            },
            "$defs": {"const": {"$ref": "urn:sub"}},
            "default": {"$ref": "left-alone"}
        }))
        .unwrap();
        let bundled = bundle(&outer, &reg).unwrap();
        assert_eq!(
            bundled["properties"]["default"]["$ref"],
            json!("#/$defs/olcat-bundle-0")
        );
        assert_eq!(bundled["properties"]["enum"]["$ref"], json!("#/$defs/olcat-bundle-0"));
        assert_eq!(bundled["$defs"]["const"]["$ref"], json!("#/$defs/olcat-bundle-0"));
        assert_eq!(bundled["default"]["$ref"], json!("left-alone"));

        let compiled = compile(&outer, &reg).unwrap();
        assert!(compiled.is_valid(&json!({"default": 3})));
        let violation = first_violation(&compiled, &json!({"default": 9}), "").unwrap();
        assert_eq!(violation.path, "default");
        assert_eq!(violation.rule, "maximum");
    }

    #[test]
    fn render_path_forms() {
        assert_eq!(render_path("", "/k/0/Color"), "k[0].Color");
        assert_eq!(render_path("[2]", "/Name"), "[2].Name");
        assert_eq!(render_path("[2]", ""), "[2]");
        assert_eq!(render_path("", "/a~1b"), "a/b");
    }

    #[test]
    fn rule_keyword_picks_last_keyword() {
        assert_eq!(
            rule_keyword("/properties/k/items/$ref/properties/Color/maximum"),
            "maximum"
        );
        assert_eq!(rule_keyword("/required"), "required");
        assert_eq!(rule_keyword("/dependentRequired/Application.Name"), "dependentRequired");
        assert_eq!(rule_keyword(""), "");
    }
}
