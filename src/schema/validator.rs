//! Schema validator: untrusted JSON in, canonical `DatabaseSchema` out
//!
//! Validation semantics:
//! - The description must be an object with a non-empty `fields` array
//! - Field names are non-blank and unique
//! - Field types come from the closed set
//! - Choice fields carry non-empty, duplicate-free string options;
//!   every other field carries no `options` key at all
//! - `primaryKey`, when set, names a declared field
//! - The table name never equals the reserved metadata section name
//!
//! On success all string attributes are trimmed and a blank table name
//! becomes `records`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{DatabaseSchema, FieldSchema, FieldType, DEFAULT_TABLE_NAME, METADATA_TABLE};

/// Stateless schema validator
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates an untyped schema description.
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaError` encountered, identifying the offending
    /// field where one applies.
    pub fn validate(raw: &Value) -> SchemaResult<DatabaseSchema> {
        let obj = raw.as_object().ok_or_else(SchemaError::not_an_object)?;

        let name = trimmed_string(obj, "name").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        if name == METADATA_TABLE {
            return Err(SchemaError::reserved_name(&name));
        }

        let raw_fields = obj
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(SchemaError::missing_fields)?;

        let mut fields = Vec::with_capacity(raw_fields.len());
        let mut seen = HashSet::new();

        for (position, raw_field) in raw_fields.iter().enumerate() {
            let field = Self::validate_field(position, raw_field)?;
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::duplicate_field(&field.name));
            }
            fields.push(field);
        }

        if fields.is_empty() {
            return Err(SchemaError::empty_fields());
        }

        let primary_key = trimmed_string(obj, "primaryKey");
        if let Some(key) = &primary_key {
            if !seen.contains(key) {
                return Err(SchemaError::unknown_primary_key(key));
            }
        }

        Ok(DatabaseSchema {
            name,
            fields,
            primary_key,
            description: trimmed_string(obj, "description"),
        })
    }

    fn validate_field(position: usize, raw: &Value) -> SchemaResult<FieldSchema> {
        let obj = raw
            .as_object()
            .ok_or_else(|| SchemaError::missing_field_name(position))?;

        let name =
            trimmed_string(obj, "name").ok_or_else(|| SchemaError::missing_field_name(position))?;

        let raw_type = obj.get("type").and_then(Value::as_str).map(str::trim);
        let field_type = raw_type
            .and_then(FieldType::parse)
            .ok_or_else(|| SchemaError::unknown_field_type(&name, raw_type.unwrap_or("<missing>")))?;

        let options = match field_type {
            FieldType::Choice => Some(Self::validate_options(&name, obj.get("options"))?),
            _ if obj.contains_key("options") => {
                return Err(SchemaError::unexpected_options(&name));
            }
            _ => None,
        };

        Ok(FieldSchema {
            name,
            field_type,
            label: trimmed_string(obj, "label"),
            required: obj.get("required").and_then(Value::as_bool).unwrap_or(false),
            options,
        })
    }

    fn validate_options(field: &str, raw: Option<&Value>) -> SchemaResult<Vec<String>> {
        let items = raw
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::invalid_options(field, "must declare an 'options' array"))?;

        if items.is_empty() {
            return Err(SchemaError::invalid_options(
                field,
                "must declare at least one option",
            ));
        }

        let mut options = Vec::with_capacity(items.len());
        let mut seen = HashSet::new();

        for item in items {
            let option = item
                .as_str()
                .map(str::trim)
                .ok_or_else(|| SchemaError::invalid_options(field, "options must all be strings"))?;
            if option.is_empty() {
                return Err(SchemaError::invalid_options(
                    field,
                    "options must not be blank",
                ));
            }
            if !seen.insert(option) {
                return Err(SchemaError::invalid_options(
                    field,
                    format!("has duplicate option '{}'", option),
                ));
            }
            options.push(option.to_string());
        }

        Ok(options)
    }
}

/// String attribute, trimmed; blank or non-string values count as absent.
fn trimmed_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
