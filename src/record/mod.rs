//! Records: one entry of the persisted table
//!
//! A record is stored as an insertion-ordered TOML table. Records produced
//! by coercion hold exactly the coerced fields, in declaration order.
//! Records loaded from disk keep every key they had, including keys the
//! current schema no longer declares; such keys stay inert until the record
//! is next replaced.

mod value;

pub use value::FieldValue;

use serde_json::{Map, Value as JsonValue};

use crate::schema::{DatabaseSchema, FieldSchema};

/// A single persisted entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: toml::Table,
}

impl Record {
    /// An empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes one persisted entry.
    ///
    /// Anything that is not a table (a scalar, an array) becomes an empty
    /// record rather than an error.
    pub fn from_persisted(entry: &toml::Value) -> Self {
        match entry {
            toml::Value::Table(table) => Self {
                values: table.clone(),
            },
            _ => Self::default(),
        }
    }

    /// Persisted representation
    pub fn to_persisted(&self) -> toml::Value {
        toml::Value::Table(self.values.clone())
    }

    /// Sets a typed value, keeping the key's position if it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value.to_toml());
    }

    /// Stored value under `name`, whatever its shape
    pub fn raw(&self, name: &str) -> Option<&toml::Value> {
        self.values.get(name)
    }

    /// Typed value for a declared field.
    ///
    /// `None` when absent or stored with a shape the field type rejects.
    pub fn value(&self, field: &FieldSchema) -> Option<FieldValue> {
        self.raw(&field.name)
            .and_then(|raw| FieldValue::from_toml(field.field_type, raw))
    }

    /// String representation of a field, as used for display and search.
    ///
    /// Falls back to the raw scalar rendering when the stored value does not
    /// decode as the declared type.
    pub fn display_value(&self, field: &FieldSchema) -> Option<String> {
        if let Some(typed) = self.value(field) {
            return Some(typed.to_string());
        }
        match self.raw(&field.name)? {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            toml::Value::Datetime(dt) => Some(dt.to_string()),
            toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }

    /// Raw form input that reproduces this record's declared fields.
    ///
    /// Used to pre-fill an edit: fields that do not decode are left out, so
    /// they come back blank.
    pub fn form_values(&self, schema: &DatabaseSchema) -> Map<String, JsonValue> {
        schema
            .fields
            .iter()
            .filter_map(|field| {
                self.value(field)
                    .map(|v| (field.name.clone(), v.to_form_value()))
            })
            .collect()
    }

    /// Stored keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON view of the stored values, keys in stored order.
    ///
    /// Dates and times render as their TOML literal strings.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        )
    }
}

fn toml_to_json(value: &toml::Value) -> JsonValue {
    match value {
        toml::Value::String(s) => JsonValue::String(s.clone()),
        toml::Value::Integer(i) => JsonValue::from(*i),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        toml::Value::Boolean(b) => JsonValue::Bool(*b),
        toml::Value::Datetime(dt) => JsonValue::String(dt.to_string()),
        toml::Value::Array(items) => JsonValue::Array(items.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => JsonValue::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
    }
}
