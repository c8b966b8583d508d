//! Payload parsing against entity descriptors.
//!
//! Create payloads become a full, ordered list of insert bindings. Update
//! payloads become a [`SparseUpdate`] in which every field is either absent,
//! cleared (`null`) or set, so "leave unchanged" and "clear" never collide.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::entity::{Access, EntityDescriptor, FieldSpec, FieldType};
use super::record::{DATE_FORMAT, FieldBinding, FieldValue};

/// Pseudo field name reported when the body itself is malformed.
pub const BODY_FIELD: &str = "body";

/// Machine-readable reason attached to a [`FieldIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    /// The request body is not a JSON object.
    NotAnObject,
    /// A required field is absent or `null` on create.
    MissingField,
    /// The field is not declared by the entity.
    UnknownField,
    /// The field is produced by the store and cannot be written.
    ReadOnlyField,
    /// The field is fixed at creation and cannot be updated.
    ImmutableField,
    /// An update tries to clear a required field.
    RequiredFieldCleared,
    /// The value has the wrong JSON type for the field.
    InvalidType,
    /// The value is not a `YYYY-MM-DD` date.
    InvalidDate,
    /// A path key does not parse as the key field's type.
    InvalidKey,
}

impl IssueCode {
    /// Stable snake-case identifier used in error details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAnObject => "not_an_object",
            Self::MissingField => "missing_field",
            Self::UnknownField => "unknown_field",
            Self::ReadOnlyField => "read_only_field",
            Self::ImmutableField => "immutable_field",
            Self::RequiredFieldCleared => "required_field_cleared",
            Self::InvalidType => "invalid_type",
            Self::InvalidDate => "invalid_date",
            Self::InvalidKey => "invalid_key",
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldIssue {
    /// Offending field or parameter name.
    pub field: String,
    /// Reason code.
    pub code: IssueCode,
    /// Human-readable explanation.
    pub message: String,
}

impl FieldIssue {
    fn new(field: &str, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            code,
            message: message.into(),
        }
    }

    fn wrong_type(field: &FieldSpec) -> Self {
        Self::new(
            field.name,
            IssueCode::InvalidType,
            format!("{} must be a {}", field.name, field.ty.name()),
        )
    }

    fn bad_date(field: &FieldSpec, raw: &str) -> Self {
        Self::new(
            field.name,
            IssueCode::InvalidDate,
            format!("{} must be a date in YYYY-MM-DD form, got `{raw}`", field.name),
        )
    }
}

/// Change requested for one field by an update payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Set the field to NULL.
    Clear,
    /// Set the field to a value.
    Set(FieldValue),
}

/// Explicit sparse update: only listed fields change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseUpdate {
    changes: Vec<(&'static FieldSpec, Patch)>,
}

impl SparseUpdate {
    /// Whether no field is touched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Force `field` to `value`, replacing any caller-supplied change.
    pub fn stamp(&mut self, field: &'static FieldSpec, value: FieldValue) {
        self.changes.retain(|(existing, _)| existing.name != field.name);
        self.changes.push((field, Patch::Set(value)));
    }

    /// Statement bindings for the update clause list.
    #[must_use]
    pub fn into_bindings(self) -> Vec<FieldBinding> {
        self.changes
            .into_iter()
            .map(|(field, patch)| match patch {
                Patch::Clear => FieldBinding::new(field, FieldValue::Null),
                Patch::Set(value) => FieldBinding::new(field, value),
            })
            .collect()
    }
}

/// Parse a JSON value for `field`.
///
/// `null` yields [`FieldValue::Null`]; JSON integers are accepted for decimal
/// fields.
///
/// # Errors
///
/// Returns [`FieldIssue`] when the JSON type does not match the field type or
/// a date does not parse.
pub fn parse_json_value(field: &FieldSpec, raw: &Value) -> Result<FieldValue, FieldIssue> {
    if raw.is_null() {
        return Ok(FieldValue::Null);
    }
    match field.ty {
        FieldType::Text => raw
            .as_str()
            .map(|text| FieldValue::Text(text.to_owned()))
            .ok_or_else(|| FieldIssue::wrong_type(field)),
        FieldType::Integer => raw
            .as_i64()
            .map(FieldValue::Integer)
            .ok_or_else(|| FieldIssue::wrong_type(field)),
        FieldType::Decimal => raw
            .as_f64()
            .map(FieldValue::Decimal)
            .ok_or_else(|| FieldIssue::wrong_type(field)),
        FieldType::Date => {
            let text = raw.as_str().ok_or_else(|| FieldIssue::wrong_type(field))?;
            parse_date(field, text)
        }
    }
}

/// Parse a textual value (path segment or query parameter) for `field`.
///
/// # Errors
///
/// Returns [`FieldIssue`] when `raw` does not parse as the field type.
pub fn parse_text_value(field: &FieldSpec, raw: &str) -> Result<FieldValue, FieldIssue> {
    match field.ty {
        FieldType::Text => Ok(FieldValue::Text(raw.to_owned())),
        FieldType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| FieldIssue::wrong_type(field)),
        FieldType::Decimal => raw
            .trim()
            .parse::<f64>()
            .map(FieldValue::Decimal)
            .map_err(|_| FieldIssue::wrong_type(field)),
        FieldType::Date => parse_date(field, raw.trim()),
    }
}

fn parse_date(field: &FieldSpec, text: &str) -> Result<FieldValue, FieldIssue> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(FieldValue::Date)
        .map_err(|_| FieldIssue::bad_date(field, text))
}

/// Parse the lookup key taken from a request path.
///
/// # Errors
///
/// Returns [`FieldIssue`] with [`IssueCode::InvalidKey`] when `raw` does not
/// parse as the key type.
pub fn parse_key(descriptor: &EntityDescriptor, raw: &str) -> Result<FieldValue, FieldIssue> {
    let key = &descriptor.key;
    parse_text_value(key, raw).map_err(|_| {
        FieldIssue::new(
            key.name,
            IssueCode::InvalidKey,
            format!("{} must be a {}, got `{raw}`", key.name, key.ty.name()),
        )
    })
}

/// Parse the owner identifier of an owner listing.
///
/// # Errors
///
/// Returns [`FieldIssue`] when `raw` does not parse as the owner field type.
pub fn parse_owner(owner: &FieldSpec, raw: &str) -> Result<FieldValue, FieldIssue> {
    parse_text_value(owner, raw)
}

/// Resolve the descriptor's equality filters from query parameters.
///
/// Parameters that are not declared filters are ignored, as are declared
/// filters whose value is empty.
///
/// # Errors
///
/// Returns [`FieldIssue`] when a filter value does not parse.
pub fn parse_filters(
    descriptor: &'static EntityDescriptor,
    params: &BTreeMap<String, String>,
) -> Result<Vec<FieldBinding>, FieldIssue> {
    descriptor
        .filters
        .iter()
        .filter_map(|filter| params.get(filter.param).map(|raw| (filter, raw)))
        .filter(|(_, raw)| !raw.is_empty())
        .map(|(filter, raw)| {
            parse_text_value(&filter.field, raw)
                .map(|value| FieldBinding::new(&filter.field, value))
                .map_err(|issue| FieldIssue {
                    field: filter.param.to_owned(),
                    ..issue
                })
        })
        .collect()
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, FieldIssue> {
    payload.as_object().ok_or_else(|| {
        FieldIssue::new(
            BODY_FIELD,
            IssueCode::NotAnObject,
            "request body must be a JSON object",
        )
    })
}

fn declared_field(
    descriptor: &EntityDescriptor,
    name: &str,
) -> Result<&'static FieldSpec, FieldIssue> {
    descriptor.field(name).ok_or_else(|| {
        FieldIssue::new(
            name,
            IssueCode::UnknownField,
            format!("{name} is not a field of {}", descriptor.label),
        )
    })
}

/// Parse a create payload into insert bindings.
///
/// Returns one binding per insertable field in declaration order; absent
/// optional fields bind as NULL.
///
/// # Errors
///
/// Returns [`FieldIssue`] for non-object bodies, unknown or read-only fields,
/// mistyped values and absent or `null` required fields.
pub fn parse_create(
    descriptor: &'static EntityDescriptor,
    payload: &Value,
) -> Result<Vec<FieldBinding>, FieldIssue> {
    let object = as_object(payload)?;
    for name in object.keys() {
        let field = declared_field(descriptor, name)?;
        if field.access == Access::ReadOnly {
            return Err(FieldIssue::new(
                field.name,
                IssueCode::ReadOnlyField,
                format!("{} is assigned by the store", field.name),
            ));
        }
    }

    descriptor
        .insertable_fields()
        .map(|field| {
            let value = object
                .get(field.name)
                .map(|raw| parse_json_value(field, raw))
                .transpose()?
                .unwrap_or(FieldValue::Null);
            if field.required && value.is_null() {
                return Err(FieldIssue::new(
                    field.name,
                    IssueCode::MissingField,
                    format!("missing required field: {}", field.name),
                ));
            }
            Ok(FieldBinding::new(field, value))
        })
        .collect()
}

/// Parse an update payload into a [`SparseUpdate`].
///
/// # Errors
///
/// Returns [`FieldIssue`] for non-object bodies, unknown, read-only or
/// create-only fields, mistyped values and `null` for required fields.
pub fn parse_update(
    descriptor: &'static EntityDescriptor,
    payload: &Value,
) -> Result<SparseUpdate, FieldIssue> {
    let object = as_object(payload)?;
    for name in object.keys() {
        let field = declared_field(descriptor, name)?;
        match field.access {
            Access::ReadWrite => {}
            Access::ReadOnly => {
                return Err(FieldIssue::new(
                    field.name,
                    IssueCode::ReadOnlyField,
                    format!("{} is assigned by the store", field.name),
                ));
            }
            Access::CreateOnly => {
                return Err(FieldIssue::new(
                    field.name,
                    IssueCode::ImmutableField,
                    format!("{} cannot be changed after creation", field.name),
                ));
            }
        }
    }

    let mut update = SparseUpdate::default();
    for field in descriptor.fields.iter().filter(|field| field.is_updatable()) {
        let Some(raw) = object.get(field.name) else {
            continue;
        };
        let patch = match parse_json_value(field, raw)? {
            FieldValue::Null if field.required => {
                return Err(FieldIssue::new(
                    field.name,
                    IssueCode::RequiredFieldCleared,
                    format!("{} is required and cannot be cleared", field.name),
                ));
            }
            FieldValue::Null => Patch::Clear,
            value => Patch::Set(value),
        };
        update.changes.push((field, patch));
    }
    Ok(update)
}
