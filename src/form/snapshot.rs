//! Form snapshot: the complete set of field values at a point in time

use super::event::FormChangeEvent;
use super::value::FieldValue;
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Open record of field values keyed by field name.
///
/// Equality is structural. Schema validation is left to whoever owns the
/// form; any field name is accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    fields: BTreeMap<String, FieldValue>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text value of a field, `None` if missing or not text
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    pub fn record(&self, name: &str) -> Option<&FormSnapshot> {
        self.get(name).and_then(FieldValue::as_record)
    }

    /// Replace exactly the field named by the event. Other fields are untouched.
    pub fn apply(&mut self, event: FormChangeEvent) {
        self.fields.insert(event.name, event.value);
    }

    /// Shallow merge: every top-level field of `other` replaces ours
    pub fn merge(&mut self, other: FormSnapshot) {
        self.fields.extend(other.fields);
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect::<Map<_, _>>(),
        )
    }

    /// Build a snapshot from a JSON object
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        match FieldValue::from(value) {
            FieldValue::Record(record) => Ok(record),
            other => Err(serde_json::Error::custom(format!(
                "form data must be an object, got {}",
                other.to_json()
            ))),
        }
    }

    /// Snapshot any serializable record
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, serde_json::Error> {
        Self::from_json(serde_json::to_value(record)?)
    }

    /// Read the snapshot back as a typed record
    pub fn into_record<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

impl FromIterator<(String, FieldValue)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for FormSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(D::Error::custom)
    }
}
