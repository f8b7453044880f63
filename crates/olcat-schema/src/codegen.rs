//! # Schema Generation & Drift Detection
//!
//! Generates the published schemas from the record model's field table
//! ([`olcat_core::FIELDS`]) so the model and the schema cannot disagree
//! about names or constraints:
//!
//! - **Item schema** with alias property names (wire form) or internal
//!   names (in-memory form).
//! - **Keyed container schema**: one UUID property whose items reference
//!   the item schema by that same UUID.
//! - **Array container schema**: the legacy list layout.
//!
//! The item schema is also hand-authored in YAML. [`constraint_drift`]
//! compares a generated schema with an authored one and lists every
//! constraint on which they disagree; the repository's test suite
//! requires the list to be empty.

use std::collections::BTreeSet;
use std::fmt;

use olcat_core::field::{Constraint, FieldSpec, Presence};
use olcat_core::FIELDS;
use serde_json::{json, Map, Value};

use crate::document::DRAFT_2020_12;

/// Published item schema.
pub const ITEM_SCHEMA_ID: &str =
    "https://raw.githubusercontent.com/TakashiSasaki/outlook-category/master/schemas/OutlookCategory.json";

/// Hand-authored YAML source of the item schema.
pub const ITEM_SOURCE_ID: &str =
    "https://raw.githubusercontent.com/TakashiSasaki/outlook-category/master/schemas/OutlookCategory.yaml";

/// Keyed container schema.
pub const CONTAINER_SCHEMA_ID: &str =
    "https://raw.githubusercontent.com/TakashiSasaki/outlook-category/master/schemas/OutlookCategories.json";

/// Legacy array container schema.
pub const ARRAY_SCHEMA_ID: &str =
    "https://raw.githubusercontent.com/TakashiSasaki/outlook-category/master/schemas/OutlookCategoryArray.json";

/// Identifier under which keyed containers carry their records and
/// reference the item schema.
pub const CONTAINER_KEY: &str = "8f87b8d1-5e2a-4c39-9b61-0d7e4a3f12c8";

/// Top-level wrapper key of the hand-authored YAML item schema.
pub const ITEM_ROOT_KEY: &str = "OutlookCategory";

/// Constraint keywords compared by [`constraint_drift`].
const CONSTRAINT_KEYWORDS: &[&str] = &[
    "type",
    "pattern",
    "minimum",
    "maximum",
    "minLength",
    "maxLength",
    "enum",
    "const",
    "format",
];

/// Which names the generated item schema uses for its properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyNames {
    /// Wire aliases (`Color`, `Application.Name`).
    Alias,
    /// Internal names (`color`, `application_name`).
    Internal,
}

impl PropertyNames {
    fn of(self, spec: &FieldSpec) -> &'static str {
        match self {
            PropertyNames::Alias => spec.alias,
            PropertyNames::Internal => spec.internal,
        }
    }
}

/// The JSON Schema fragment for one field.
pub fn property_schema(spec: &FieldSpec) -> Value {
    let mut prop = Map::new();
    match spec.constraint {
        Constraint::Text => {
            prop.insert("type".into(), json!("string"));
        }
        Constraint::NonEmpty => {
            prop.insert("type".into(), json!("string"));
            prop.insert("minLength".into(), json!(1));
        }
        Constraint::BracedGuid => {
            prop.insert("type".into(), json!("string"));
            prop.insert("pattern".into(), json!(olcat_core::field::GUID_PATTERN));
        }
        Constraint::IntegerRange { min, max } => {
            prop.insert("type".into(), json!("integer"));
            prop.insert("minimum".into(), json!(min));
            prop.insert("maximum".into(), json!(max));
        }
        Constraint::OneOf(allowed) => {
            prop.insert("type".into(), json!("string"));
            prop.insert("enum".into(), json!(allowed));
        }
    }
    prop.insert("description".into(), json!(spec.description));
    Value::Object(prop)
}

/// Generate the item schema.
///
/// Required fields go into `required`; the detail group is expressed with
/// `dependentRequired` so that any one detail field requires the others.
pub fn item_schema(id: &str, names: PropertyNames) -> Value {
    let properties: Map<String, Value> = FIELDS
        .iter()
        .map(|spec| (names.of(spec).to_string(), property_schema(spec)))
        .collect();
    let required: Vec<&str> = FIELDS
        .iter()
        .filter(|spec| spec.presence == Presence::Required)
        .map(|spec| names.of(spec))
        .collect();
    let detail: Vec<&str> = FIELDS
        .iter()
        .filter(|spec| spec.is_detail())
        .map(|spec| names.of(spec))
        .collect();
    let dependent: Map<String, Value> = detail
        .iter()
        .map(|name| {
            let others: Vec<&str> = detail.iter().copied().filter(|o| o != name).collect();
            (name.to_string(), json!(others))
        })
        .collect();

    json!({
        "$schema": DRAFT_2020_12,
        "$id": id,
        "title": ITEM_ROOT_KEY,
        "description": "A category defined in a mail store, as exported by olcat",
        "type": "object",
        "properties": properties,
        "required": required,
        "dependentRequired": dependent,
    })
}

/// Generate the keyed container schema: exactly one property, `key`, an
/// array whose items reference the item schema registered under `key`.
pub fn keyed_container_schema(id: &str, key: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(
        key.to_string(),
        json!({
            "type": "array",
            "items": { "$ref": key },
        }),
    );
    json!({
        "$schema": DRAFT_2020_12,
        "$id": id,
        "title": "OutlookCategories",
        "description": "Categories keyed by the identifier of their item schema",
        "type": "object",
        "properties": properties,
        "required": [key],
        "additionalProperties": false,
    })
}

/// Generate the legacy array container schema.
pub fn array_container_schema(id: &str, item_ref: &str) -> Value {
    json!({
        "$schema": DRAFT_2020_12,
        "$id": id,
        "title": "OutlookCategoryArray",
        "description": "Categories as a bare array",
        "type": "array",
        "items": { "$ref": item_ref },
    })
}

// ---------------------------------------------------------------------------
// Drift detection
// ---------------------------------------------------------------------------

/// One constraint on which two schemas disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    /// Dotted location of the constraint (e.g. `properties.Color.maximum`).
    pub json_path: String,
    /// Rendered value in the generated schema, or `absent`.
    pub generated: String,
    /// Rendered value in the authored schema, or `absent`.
    pub authored: String,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: generated {}, authored {}",
            self.json_path, self.generated, self.authored
        )
    }
}

/// List every constraint on which `generated` and `authored` disagree.
///
/// Compared: top-level `type`, the property name set, per-property
/// constraint keywords, the `required` set and the `dependentRequired`
/// sets. Descriptions, titles and `x-*` metadata are ignored; set-valued
/// keywords are compared without regard to order.
pub fn constraint_drift(generated: &Value, authored: &Value) -> Vec<Drift> {
    let mut drift = Vec::new();
    compare(&mut drift, "type".to_string(), generated.get("type"), authored.get("type"));

    let empty = Map::new();
    let gen_props = generated.get("properties").and_then(Value::as_object).unwrap_or(&empty);
    let auth_props = authored.get("properties").and_then(Value::as_object).unwrap_or(&empty);
    for name in union_keys(gen_props, auth_props) {
        let path = format!("properties.{name}");
        match (gen_props.get(&name), auth_props.get(&name)) {
            (Some(g), Some(a)) => {
                for keyword in CONSTRAINT_KEYWORDS {
                    compare(&mut drift, format!("{path}.{keyword}"), g.get(*keyword), a.get(*keyword));
                }
            }
            (g, a) => drift.push(Drift {
                json_path: path,
                generated: presence(g),
                authored: presence(a),
            }),
        }
    }

    compare_sets(&mut drift, "required".to_string(), generated.get("required"), authored.get("required"));

    let gen_dep = generated.get("dependentRequired").and_then(Value::as_object).unwrap_or(&empty);
    let auth_dep = authored.get("dependentRequired").and_then(Value::as_object).unwrap_or(&empty);
    for name in union_keys(gen_dep, auth_dep) {
        compare_sets(
            &mut drift,
            format!("dependentRequired.{name}"),
            gen_dep.get(&name),
            auth_dep.get(&name),
        );
    }
    drift
}

fn union_keys(a: &Map<String, Value>, b: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = a.keys().cloned().collect();
    keys.extend(b.keys().filter(|k| !a.contains_key(*k)).cloned());
    keys
}

fn compare(drift: &mut Vec<Drift>, json_path: String, g: Option<&Value>, a: Option<&Value>) {
    if !same_value(g, a) {
        drift.push(Drift {
            json_path,
            generated: render(g),
            authored: render(a),
        });
    }
}

fn compare_sets(drift: &mut Vec<Drift>, json_path: String, g: Option<&Value>, a: Option<&Value>) {
    let (gs, as_) = (string_set(g), string_set(a));
    if gs != as_ {
        drift.push(Drift {
            json_path,
            generated: render_set(g.map(|_| &gs)),
            authored: render_set(a.map(|_| &as_)),
        });
    }
}

/// Numbers compare by value so `25` and `25.0` agree.
fn same_value(g: Option<&Value>, a: Option<&Value>) -> bool {
    match (g, a) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_f64() == y.as_f64(),
        (g, a) => g == a,
    }
}

fn string_set(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn render(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_else(|| "absent".to_string())
}

fn render_set(set: Option<&BTreeSet<String>>) -> String {
    match set {
        Some(set) => format!("{set:?}"),
        None => "absent".to_string(),
    }
}

fn presence(value: Option<&Value>) -> String {
    if value.is_some() { "present" } else { "absent" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SchemaDocument;
    use crate::validate::check_schema_document;

    fn doc(value: Value) -> SchemaDocument {
        SchemaDocument::from_value(value).unwrap()
    }

    #[test]
    fn generated_schemas_pass_meta_check() {
        for schema in [
            item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias),
            item_schema("urn:internal", PropertyNames::Internal),
            keyed_container_schema(CONTAINER_SCHEMA_ID, CONTAINER_KEY),
            array_container_schema(ARRAY_SCHEMA_ID, ITEM_SCHEMA_ID),
        ] {
            check_schema_document(&doc(schema)).unwrap();
        }
    }

    #[test]
    fn item_schema_alias_properties_in_declaration_order() {
        let schema = item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias);
        let names: Vec<&String> = schema["properties"].as_object().unwrap().keys().collect();
        let expected: Vec<&str> = FIELDS.iter().map(|f| f.alias).collect();
        assert_eq!(names, expected);
        assert_eq!(
            schema["required"],
            json!(["Account", "CategoryID", "Color", "Name", "ClassName"])
        );
        assert_eq!(schema["properties"]["Color"]["minimum"], json!(0));
        assert_eq!(schema["properties"]["Color"]["maximum"], json!(25));
        assert_eq!(schema["properties"]["ClassName"]["enum"], json!(["olCategory"]));
        assert_eq!(schema["properties"]["Name"]["minLength"], json!(1));
    }

    #[test]
    fn item_schema_internal_names() {
        let schema = item_schema("urn:internal", PropertyNames::Internal);
        assert!(schema["properties"].get("category_id").is_some());
        assert!(schema["properties"].get("CategoryID").is_none());
        assert_eq!(
            schema["dependentRequired"]["application_name"],
            json!(["application_version", "session_current_user", "session_default_store"])
        );
    }

    #[test]
    fn dependent_required_enforces_detail_group() {
        let schema = item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias);
        let compiled = jsonschema::draft202012::new(&schema).unwrap();
        let base = json!({
            "Account": "a",
            "CategoryID": "{0A1B2C3D-4E5F-6789-ABCD-EF0123456789}",
            "Color": 1,
            "Name": "n",
            "ClassName": "olCategory"
        });
        assert!(compiled.is_valid(&base));
        let mut partial = base.clone();
        partial["Application.Name"] = json!("Outlook");
        assert!(!compiled.is_valid(&partial));
        let mut full = partial.clone();
        full["Application.Version"] = json!("16.0");
        full["Session.CurrentUser"] = json!("user");
        full["Session.DefaultStore"] = json!("store");
        assert!(compiled.is_valid(&full));
    }

    #[test]
    fn keyed_container_shape() {
        let schema = keyed_container_schema(CONTAINER_SCHEMA_ID, CONTAINER_KEY);
        assert_eq!(
            schema["properties"][CONTAINER_KEY]["items"]["$ref"],
            json!(CONTAINER_KEY)
        );
        assert_eq!(schema["required"], json!([CONTAINER_KEY]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(
            crate::validate::item_reference(&doc(schema)).unwrap(),
            CONTAINER_KEY
        );
    }

    #[test]
    fn no_drift_against_itself() {
        let schema = item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias);
        assert!(constraint_drift(&schema, &schema).is_empty());
    }

    #[test]
    fn drift_ignores_descriptions_and_order() {
        let generated = item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias);
        let mut authored = generated.clone();
        authored["properties"]["Color"]["description"] = json!("something else");
        authored["required"] = json!(["ClassName", "Name", "Color", "CategoryID", "Account"]);
        authored["properties"]["Color"]["maximum"] = json!(25.0);
        authored["x-author"] = json!("someone");
        assert!(constraint_drift(&generated, &authored).is_empty());
    }

    #[test]
    fn drift_reports_changed_constraint() {
        let generated = item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias);
        let mut authored = generated.clone();
        authored["properties"]["Color"]["maximum"] = json!(24);
        let drift = constraint_drift(&generated, &authored);
        assert_eq!(
            drift,
            vec![Drift {
                json_path: "properties.Color.maximum".to_string(),
                generated: "25".to_string(),
                authored: "24".to_string(),
            }]
        );
        assert_eq!(
            drift[0].to_string(),
            "properties.Color.maximum: generated 25, authored 24"
        );
    }

    #[test]
    fn drift_reports_missing_property_and_required() {
        let generated = item_schema(ITEM_SCHEMA_ID, PropertyNames::Alias);
        let mut authored = generated.clone();
        authored["properties"].as_object_mut().unwrap().remove("Name");
        authored["required"] = json!(["Account", "CategoryID", "Color", "ClassName"]);
        authored["dependentRequired"]
            .as_object_mut()
            .unwrap()
            .remove("Session.DefaultStore");
        let paths: Vec<String> = constraint_drift(&generated, &authored)
            .into_iter()
            .map(|d| d.json_path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "properties.Name",
                "required",
                "dependentRequired.Session.DefaultStore"
            ]
        );
    }
}
