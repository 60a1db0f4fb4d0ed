//! Form field value objects

use super::snapshot::FormSnapshot;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Type-safe field values
///
/// Serializes as plain JSON: `Id` is written as a string and therefore reads
/// back as `Text`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Number(Number),
    /// Opaque object identifier, e.g. a GraphQL node id
    Id(String),
    List(Vec<FieldValue>),
    Record(FormSnapshot),
    #[default]
    Null,
}

impl FieldValue {
    /// Create an identifier value
    pub fn id(id: impl Into<String>) -> Self {
        FieldValue::Id(id.into())
    }

    /// Get the text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the text of either a `Text` or an `Id`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Id(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<&str> {
        match self {
            FieldValue::Id(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&FormSnapshot> {
        match self {
            FieldValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert to a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) | FieldValue::Id(s) => Value::String(s.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            FieldValue::Record(record) => record.to_json(),
            FieldValue::Null => Value::Null,
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Id(s) => s.clone(),
            FieldValue::Bool(true) => "yes".to_string(),
            FieldValue::Bool(false) => "no".to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::List(items) => items
                .iter()
                .map(Self::display_value)
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Record(record) => record
                .get("id")
                .map(Self::display_value)
                .unwrap_or_else(|| format!("{} fields", record.len())),
            FieldValue::Null => String::new(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => FieldValue::Record(
                map.into_iter()
                    .map(|(key, value)| (key, FieldValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<FormSnapshot> for FieldValue {
    fn from(record: FormSnapshot) -> Self {
        FieldValue::Record(record)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}
