//! # Field Table
//!
//! The single declaration of every category field: internal name, wire
//! alias, presence, and constraint. Record validation, name lookup,
//! serialization order, and schema generation all read this table, so
//! the model and the generated schema cannot disagree.
//!
//! ## Naming
//!
//! Each field has exactly one internal name (`category_id`) and one alias
//! (`CategoryID`). The detail fields use dotted aliases
//! (`Application.Name`); because dots are awkward in identifiers, the
//! underscore form (`Application_Name`) resolves to the same field.

use serde_json::Value;

use crate::error::{json_type_name, FieldViolation};

/// Regular expression for a brace-delimited GUID, `{8-4-4-4-12 hex}`.
pub const GUID_PATTERN: &str = r"^\{[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\}$";

/// Permitted values of `ClassName` for an exported category.
pub const CLASS_NAMES: &[&str] = &["olCategory"];

/// Lowest category color index the mail client assigns.
pub const COLOR_MIN: i64 = 0;

/// Highest category color index the mail client assigns.
pub const COLOR_MAX: i64 = 25;

/// Whether a field must always be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Present in every well-formed record.
    Required,
    /// Member of the detail group: all four present or all four absent.
    Detail,
}

/// The value constraint declared for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Any string.
    Text,
    /// A string with at least one character.
    NonEmpty,
    /// A string matching [`GUID_PATTERN`].
    BracedGuid,
    /// An integer within an inclusive range.
    IntegerRange {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// One of a fixed set of string literals.
    OneOf(&'static [&'static str]),
}

/// A field value in its storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A string field.
    Text(&'a str),
    /// An integer field.
    Integer(i64),
}

impl FieldValue<'_> {
    /// The wire (JSON) form of the value.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String((*s).to_string()),
            FieldValue::Integer(n) => Value::from(*n),
        }
    }

    /// The string, for text fields.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Integer(_) => None,
        }
    }

    /// The integer, for integer fields.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

/// Declaration of one category field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Internal attribute name.
    pub internal: &'static str,
    /// Wire-facing alias.
    pub alias: &'static str,
    /// Required or detail group.
    pub presence: Presence,
    /// Value constraint.
    pub constraint: Constraint,
    /// One-line description, emitted into generated schemas.
    pub description: &'static str,
}

/// `Account`
pub const ACCOUNT: FieldSpec = FieldSpec {
    internal: "account",
    alias: "Account",
    presence: Presence::Required,
    constraint: Constraint::NonEmpty,
    description: "Display name of the store the category was found in",
};

/// `CategoryID`
pub const CATEGORY_ID: FieldSpec = FieldSpec {
    internal: "category_id",
    alias: "CategoryID",
    presence: Presence::Required,
    constraint: Constraint::BracedGuid,
    description: "Brace-delimited GUID identifying the category",
};

/// `Color`
pub const COLOR: FieldSpec = FieldSpec {
    internal: "color",
    alias: "Color",
    presence: Presence::Required,
    constraint: Constraint::IntegerRange {
        min: COLOR_MIN,
        max: COLOR_MAX,
    },
    description: "Category color index",
};

/// `Name`
pub const NAME: FieldSpec = FieldSpec {
    internal: "name",
    alias: "Name",
    presence: Presence::Required,
    constraint: Constraint::NonEmpty,
    description: "Category display name",
};

/// `ClassName`
pub const CLASS_NAME: FieldSpec = FieldSpec {
    internal: "class_name",
    alias: "ClassName",
    presence: Presence::Required,
    constraint: Constraint::OneOf(CLASS_NAMES),
    description: "Object class of the exported item",
};

/// `Application.Name`
pub const APPLICATION_NAME: FieldSpec = FieldSpec {
    internal: "application_name",
    alias: "Application.Name",
    presence: Presence::Detail,
    constraint: Constraint::Text,
    description: "Name of the mail client application",
};

/// `Application.Version`
pub const APPLICATION_VERSION: FieldSpec = FieldSpec {
    internal: "application_version",
    alias: "Application.Version",
    presence: Presence::Detail,
    constraint: Constraint::Text,
    description: "Version of the mail client application",
};

/// `Session.CurrentUser`
pub const SESSION_CURRENT_USER: FieldSpec = FieldSpec {
    internal: "session_current_user",
    alias: "Session.CurrentUser",
    presence: Presence::Detail,
    constraint: Constraint::Text,
    description: "User logged into the session",
};

/// `Session.DefaultStore`
pub const SESSION_DEFAULT_STORE: FieldSpec = FieldSpec {
    internal: "session_default_store",
    alias: "Session.DefaultStore",
    presence: Presence::Detail,
    constraint: Constraint::Text,
    description: "Display name of the session's default store",
};

/// Every category field, in declaration (and serialization) order.
pub const FIELDS: &[FieldSpec] = &[
    ACCOUNT,
    CATEGORY_ID,
    COLOR,
    NAME,
    CLASS_NAME,
    APPLICATION_NAME,
    APPLICATION_VERSION,
    SESSION_CURRENT_USER,
    SESSION_DEFAULT_STORE,
];

impl FieldSpec {
    /// The alias with dots replaced by underscores.
    pub fn underscore_alias(&self) -> String {
        self.alias.replace('.', "_")
    }

    /// Whether this field belongs to the detail group.
    pub fn is_detail(&self) -> bool {
        self.presence == Presence::Detail
    }

    /// Check a present value against this field's constraint,
    /// returning the value as the field's storage type.
    pub fn check<'a>(&self, value: &'a Value) -> Result<FieldValue<'a>, FieldViolation> {
        match self.constraint {
            Constraint::Text => expect_str(value).map(FieldValue::Text),
            Constraint::NonEmpty => {
                let s = expect_str(value)?;
                if s.is_empty() {
                    Err(FieldViolation::Empty)
                } else {
                    Ok(FieldValue::Text(s))
                }
            }
            Constraint::BracedGuid => {
                let s = expect_str(value)?;
                if is_braced_guid(s) {
                    Ok(FieldValue::Text(s))
                } else {
                    Err(FieldViolation::PatternMismatch {
                        pattern: GUID_PATTERN,
                        value: s.to_string(),
                    })
                }
            }
            Constraint::IntegerRange { min, max } => {
                let n = expect_integer(value)?;
                match n {
                    Some(n) if (min..=max).contains(&n) => Ok(FieldValue::Integer(n)),
                    _ => Err(FieldViolation::OutOfRange {
                        min,
                        max,
                        value: value.to_string(),
                    }),
                }
            }
            Constraint::OneOf(allowed) => {
                let s = expect_str(value)?;
                if allowed.contains(&s) {
                    Ok(FieldValue::Text(s))
                } else {
                    Err(FieldViolation::NotAllowed {
                        allowed,
                        value: s.to_string(),
                    })
                }
            }
        }
    }
}

fn expect_str(value: &Value) -> Result<&str, FieldViolation> {
    value.as_str().ok_or(FieldViolation::WrongType {
        expected: "string",
        found: json_type_name(value),
    })
}

/// Returns `Ok(None)` for an integral number that does not fit in `i64`.
fn expect_integer(value: &Value) -> Result<Option<i64>, FieldViolation> {
    let wrong = || FieldViolation::WrongType {
        expected: "integer",
        found: json_type_name(value),
    };
    let Value::Number(n) = value else {
        return Err(wrong());
    };
    if let Some(i) = n.as_i64() {
        return Ok(Some(i));
    }
    if n.is_u64() {
        return Ok(None);
    }
    // JSON Schema treats 3.0 as an integer; so does the record model.
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.is_finite() => {
            if f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                Ok(Some(f as i64))
            } else {
                Ok(None)
            }
        }
        _ => Err(wrong()),
    }
}

/// Whether `s` is a brace-delimited GUID, `{8-4-4-4-12 hex}`.
pub fn is_braced_guid(s: &str) -> bool {
    let Some(inner) = s.strip_prefix('{').and_then(|r| r.strip_suffix('}')) else {
        return false;
    };
    let groups: Vec<&str> = inner.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8usize, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Resolve a name to its field declaration.
///
/// Three deterministic passes over [`FIELDS`]: internal name, then alias,
/// then the name with underscores replaced by dots compared to the alias.
pub fn resolve_field(name: &str) -> Option<&'static FieldSpec> {
    if let Some(spec) = FIELDS.iter().find(|f| f.internal == name) {
        return Some(spec);
    }
    if let Some(spec) = FIELDS.iter().find(|f| f.alias == name) {
        return Some(spec);
    }
    let dotted = name.replace('_', ".");
    FIELDS.iter().find(|f| f.alias == dotted)
}

/// Fields that must always be present.
pub fn required_fields() -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(|f| f.presence == Presence::Required)
}

/// Fields of the all-or-nothing detail group.
pub fn detail_fields() -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(|f| f.is_detail())
}
