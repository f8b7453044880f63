//! # Category Record
//!
//! The canonical in-memory form of one exported category. Records are only
//! constructed through [`CategoryRecord::validate`], so every instance
//! satisfies the field constraints declared in [`crate::field::FIELDS`]
//! and the all-or-nothing rule of the detail group.
//!
//! ## Wire form
//!
//! Serialization always uses aliases, in declaration order. The detail
//! group is emitted entirely or not at all.
//!
//! ## Accepted input
//!
//! Raw mappings come from the collector. Keys may be aliases, internal
//! names, or underscore-normalized aliases; unknown keys are ignored.
//! The detailed export mode nests the application and session values
//! (`"Application": {"Name": ..}`); those objects are flattened to the
//! dotted aliases before lookup.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{AttributeError, FieldError, FieldViolation};
use crate::field::{
    detail_fields, resolve_field, FieldSpec, FieldValue, ACCOUNT, APPLICATION_NAME,
    APPLICATION_VERSION, CATEGORY_ID, CLASS_NAME, COLOR, COLOR_MAX, COLOR_MIN, FIELDS, NAME,
    SESSION_CURRENT_USER, SESSION_DEFAULT_STORE,
};

/// Name reported by [`AttributeError`].
const TYPE_NAME: &str = "CategoryRecord";

/// Whether a record carries the application/session detail group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// The four detail fields are absent.
    Simplified,
    /// The four detail fields are present.
    Detailed,
}

/// The application and session fields of a detailed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDetail {
    /// `Application.Name`
    pub application_name: String,
    /// `Application.Version`
    pub application_version: String,
    /// `Session.CurrentUser`
    pub session_current_user: String,
    /// `Session.DefaultStore`
    pub session_default_store: String,
}

/// One exported category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    account: String,
    category_id: String,
    color: u8,
    name: String,
    class_name: String,
    detail: Option<ExportDetail>,
}

impl CategoryRecord {
    /// Validate a raw field mapping and build a record from it.
    ///
    /// Required fields are checked in declaration order, so the first
    /// offending field is the one reported. A `null` value is present and
    /// fails its field's type check, as it does in the item schema.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] naming the field and the violated
    /// constraint: a missing required field, a type, pattern, range or
    /// literal mismatch, or a partially present detail group.
    pub fn validate(raw: &Map<String, Value>) -> Result<Self, FieldError> {
        let flat = flatten_nested(raw);
        let raw = flat.as_ref().unwrap_or(raw);

        let account = text(&checked(raw, &ACCOUNT)?);
        let category_id = text(&checked(raw, &CATEGORY_ID)?);
        let color = color_index(&checked(raw, &COLOR)?)?;
        let name = text(&checked(raw, &NAME)?);
        let class_name = text(&checked(raw, &CLASS_NAME)?);
        let detail = validate_detail(raw)?;

        Ok(Self {
            account,
            category_id,
            color,
            name,
            class_name,
            detail,
        })
    }

    /// Validate a parsed JSON value that should be a record object.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] as [`CategoryRecord::validate`]; a non-object
    /// value is reported as a type error on the first field.
    pub fn from_value(value: &Value) -> Result<Self, FieldError> {
        match value {
            Value::Object(map) => Self::validate(map),
            other => Err(violation(
                &ACCOUNT,
                FieldViolation::WrongType {
                    expected: "object",
                    found: crate::error::json_type_name(other),
                },
            )),
        }
    }

    /// Serialize using aliases only, in declaration order.
    pub fn to_external(&self) -> Map<String, Value> {
        self.to_map(|spec| spec.alias)
    }

    /// Serialize using internal names, in declaration order.
    pub fn to_internal(&self) -> Map<String, Value> {
        self.to_map(|spec| spec.internal)
    }

    fn to_map(&self, key: impl Fn(&FieldSpec) -> &'static str) -> Map<String, Value> {
        let mut out = Map::new();
        for spec in FIELDS {
            if let Some(value) = self.get(spec) {
                out.insert(key(spec).to_string(), value.to_json());
            }
        }
        out
    }

    /// Resolve a field by internal name, alias, or underscore-normalized alias.
    ///
    /// Returns `Ok(None)` for a detail field of a simplified record.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError`] if `name` matches no field in any form.
    pub fn lookup(&self, name: &str) -> Result<Option<FieldValue<'_>>, AttributeError> {
        let spec = resolve_field(name).ok_or_else(|| AttributeError {
            type_name: TYPE_NAME,
            name: name.to_string(),
        })?;
        Ok(self.get(spec))
    }

    /// The value of a declared field, `None` for an absent detail field.
    pub fn get(&self, spec: &FieldSpec) -> Option<FieldValue<'_>> {
        let detail = self.detail.as_ref();
        let value = match spec.internal {
            "account" => FieldValue::Text(&self.account),
            "category_id" => FieldValue::Text(&self.category_id),
            "color" => FieldValue::Integer(i64::from(self.color)),
            "name" => FieldValue::Text(&self.name),
            "class_name" => FieldValue::Text(&self.class_name),
            "application_name" => FieldValue::Text(&detail?.application_name),
            "application_version" => FieldValue::Text(&detail?.application_version),
            "session_current_user" => FieldValue::Text(&detail?.session_current_user),
            "session_default_store" => FieldValue::Text(&detail?.session_default_store),
            _ => return None,
        };
        Some(value)
    }

    /// Drop the detail group, yielding the simplified form of this record.
    pub fn simplified(mut self) -> Self {
        self.detail = None;
        self
    }

    /// Which export mode produced this record.
    pub fn mode(&self) -> ExportMode {
        if self.detail.is_some() {
            ExportMode::Detailed
        } else {
            ExportMode::Simplified
        }
    }

    /// Display name of the store the category was found in.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Brace-delimited category GUID.
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    /// Color index in `0..=25`.
    pub fn color(&self) -> u8 {
        self.color
    }

    /// Category display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Object class literal (`olCategory`).
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Application and session details, if exported in detailed mode.
    pub fn detail(&self) -> Option<&ExportDetail> {
        self.detail.as_ref()
    }
}

impl Serialize for CategoryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_external().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CategoryRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Self::validate(&raw).map_err(serde::de::Error::custom)
    }
}

/// Map an object class code reported by the mail client to its name.
pub fn resolve_class_name(code: i64) -> String {
    match code {
        152 => "olCategory".to_string(),
        153 => "olCategories".to_string(),
        other => format!("Unknown({other})"),
    }
}

fn violation(spec: &FieldSpec, v: FieldViolation) -> FieldError {
    FieldError::new(spec.internal, spec.alias, v)
}

/// The value under the alias, the internal name, or the underscore form
/// of the alias, in that order.
fn pick<'a>(raw: &'a Map<String, Value>, spec: &FieldSpec) -> Option<&'a Value> {
    [
        raw.get(spec.alias),
        raw.get(spec.internal),
        raw.get(&spec.underscore_alias()),
    ]
    .into_iter()
    .flatten()
    .next()
}

/// The field's value, present and satisfying its constraint.
fn checked<'a>(raw: &'a Map<String, Value>, spec: &FieldSpec) -> Result<FieldValue<'a>, FieldError> {
    let value = pick(raw, spec).ok_or_else(|| violation(spec, FieldViolation::Missing))?;
    spec.check(value).map_err(|v| violation(spec, v))
}

fn validate_detail(raw: &Map<String, Value>) -> Result<Option<ExportDetail>, FieldError> {
    let (present, missing): (Vec<&FieldSpec>, Vec<&FieldSpec>) =
        detail_fields().partition(|spec| pick(raw, spec).is_some());
    if present.is_empty() {
        return Ok(None);
    }
    if let Some(first_missing) = missing.first() {
        return Err(violation(
            first_missing,
            FieldViolation::PartialGroup {
                present: present.iter().map(|s| s.alias).collect(),
                missing: missing.iter().map(|s| s.alias).collect(),
            },
        ));
    }

    Ok(Some(ExportDetail {
        application_name: text(&checked(raw, &APPLICATION_NAME)?),
        application_version: text(&checked(raw, &APPLICATION_VERSION)?),
        session_current_user: text(&checked(raw, &SESSION_CURRENT_USER)?),
        session_default_store: text(&checked(raw, &SESSION_DEFAULT_STORE)?),
    }))
}

/// Flatten nested detail objects (`"Application": {"Name": ..}`) into
/// dotted keys. Returns `None` when there is nothing to flatten. An
/// explicit dotted key wins over a nested one.
fn flatten_nested(raw: &Map<String, Value>) -> Option<Map<String, Value>> {
    let nested = raw.iter().any(|(k, v)| v.is_object() && is_group_prefix(k));
    if !nested {
        return None;
    }
    let mut flat = raw.clone();
    for (key, value) in raw {
        let Value::Object(inner) = value else {
            continue;
        };
        if !is_group_prefix(key) {
            continue;
        }
        for (sub, v) in inner {
            let dotted = format!("{key}.{sub}");
            if resolve_field(&dotted).is_some() && !flat.contains_key(&dotted) {
                flat.insert(dotted, v.clone());
            }
        }
    }
    Some(flat)
}

fn is_group_prefix(key: &str) -> bool {
    detail_fields().any(|f| f.alias.split('.').next() == Some(key))
}

fn text(value: &FieldValue<'_>) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn color_index(value: &FieldValue<'_>) -> Result<u8, FieldError> {
    let n = value.as_i64().unwrap_or(-1);
    u8::try_from(n).map_err(|_| {
        violation(
            &COLOR,
            FieldViolation::OutOfRange {
                min: COLOR_MIN,
                max: COLOR_MAX,
                value: n.to_string(),
            },
        )
    })
}
