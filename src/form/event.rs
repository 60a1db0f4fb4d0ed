//! Field change events

use super::value::FieldValue;

/// One field mutation: set `name` to `value`
#[derive(Debug, Clone, PartialEq)]
pub struct FormChangeEvent {
    pub name: String,
    pub value: FieldValue,
}

impl FormChangeEvent {
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
