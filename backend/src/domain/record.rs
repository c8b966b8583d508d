//! Typed field values and records.
//!
//! A [`Record`] is one persisted row of an entity, held as field/value pairs
//! in descriptor order so responses list fields the way the entity declares
//! them.

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::entity::FieldSpec;

/// Wire and storage format for date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Value of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// SQL NULL / JSON `null`.
    Null,
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Double-precision value.
    Decimal(f64),
    /// Calendar date.
    Date(NaiveDate),
}

impl FieldValue {
    /// Whether the value is [`FieldValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the value as JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Text(text) => serde_json::Value::from(text.as_str()),
            Self::Integer(number) => serde_json::Value::from(*number),
            Self::Decimal(number) => serde_json::Value::from(*number),
            Self::Date(date) => serde_json::Value::from(date.format(DATE_FORMAT).to_string()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Text(text) => f.write_str(text),
            Self::Integer(number) => write!(f, "{number}"),
            Self::Decimal(number) => write!(f, "{number}"),
            Self::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(text) => serializer.serialize_str(text),
            Self::Integer(number) => serializer.serialize_i64(*number),
            Self::Decimal(number) => serializer.serialize_f64(*number),
            Self::Date(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
        }
    }
}

/// A field paired with the value bound for it in a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    /// Target field.
    pub field: &'static FieldSpec,
    /// Bound value; [`FieldValue::Null`] binds SQL NULL of the field's type.
    pub value: FieldValue,
}

impl FieldBinding {
    /// Pair `field` with `value`.
    #[must_use]
    pub const fn new(field: &'static FieldSpec, value: FieldValue) -> Self {
        Self { field, value }
    }
}

/// One persisted row, fields in descriptor order.
///
/// # Examples
/// ```
/// use payroll_backend::domain::{FieldValue, Record};
///
/// let record = Record::from_values([
///     ("DepartmentID", FieldValue::Integer(1)),
///     ("DepartmentName", FieldValue::Text("Finance".to_owned())),
/// ]);
/// assert_eq!(record.get("DepartmentID"), Some(&FieldValue::Integer(1)));
/// assert_eq!(
///     serde_json::to_string(&record).expect("record serialises"),
///     r#"{"DepartmentID":1,"DepartmentName":"Finance"}"#,
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: Vec<(&'static str, FieldValue)>,
}

impl Record {
    /// Build a record from ordered field/value pairs.
    pub fn from_values(values: impl IntoIterator<Item = (&'static str, FieldValue)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Value of the named field, if the record carries it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Replace the value of an existing field. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        if let Some(slot) = self
            .values
            .iter_mut()
            .find(|(field, _)| *field == name)
            .map(|(_, slot)| slot)
        {
            *slot = value;
        }
    }

    /// Field/value pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
