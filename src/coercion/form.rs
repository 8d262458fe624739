//! Form coercion: raw untyped input to a typed `Record`
//!
//! Every declared field is processed in declaration order; a failure on one
//! field never stops the others. Blank optional fields are omitted from the
//! record rather than stored as empty strings.

use serde_json::{Map, Value};

use super::errors::{ValidationError, ValidationKind};
use super::parse::{parse_date, parse_number, parse_time, raw_text, truthy};
use crate::record::{FieldValue, Record};
use crate::schema::{DatabaseSchema, FieldSchema, FieldType};

/// Raw form input: field name to untyped value
pub type FormValues = Map<String, Value>;

/// Result of coercing one form
#[derive(Debug, Clone, PartialEq)]
pub struct FormOutcome {
    /// Every field that coerced successfully
    pub record: Record,
    /// Every field that did not, in declaration order
    pub errors: Vec<ValidationError>,
}

impl FormOutcome {
    /// True when the record may be persisted
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The record, or every validation failure
    pub fn into_result(self) -> Result<Record, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.record)
        } else {
            Err(self.errors)
        }
    }
}

/// Coerces raw form values into a record per the schema.
pub fn build_record_from_form(schema: &DatabaseSchema, raw: &FormValues) -> FormOutcome {
    let mut record = Record::new();
    let mut errors = Vec::new();

    for field in &schema.fields {
        match coerce_field(field, raw.get(&field.name)) {
            Ok(Some(value)) => record.set(field.name.clone(), value),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    FormOutcome { record, errors }
}

/// Coerces one raw value. `Ok(None)` means "blank and optional: omit".
pub fn coerce_field(
    field: &FieldSchema,
    raw: Option<&Value>,
) -> Result<Option<FieldValue>, ValidationError> {
    if field.field_type == FieldType::Boolean {
        return Ok(Some(FieldValue::Boolean(truthy(raw))));
    }

    let text = raw_text(raw);
    let text = text.trim();
    let label = field.display_label();

    if text.is_empty() {
        if field.required {
            return Err(ValidationError::new(
                &field.name,
                ValidationKind::Required,
                format!("{} is required", label),
            ));
        }
        return Ok(None);
    }

    let value = match field.field_type {
        FieldType::Text => FieldValue::Text(text.to_string()),
        FieldType::Choice => {
            if !field.options().iter().any(|o| o == text) {
                return Err(ValidationError::new(
                    &field.name,
                    ValidationKind::InvalidChoice,
                    format!("{} must be one of: {}", label, field.options().join(", ")),
                ));
            }
            FieldValue::Choice(text.to_string())
        }
        FieldType::Number => parse_number(text).map(FieldValue::Number).ok_or_else(|| {
            ValidationError::new(
                &field.name,
                ValidationKind::InvalidNumber,
                format!("{} must be a number", label),
            )
        })?,
        FieldType::Date => parse_date(text).map(FieldValue::Date).ok_or_else(|| {
            ValidationError::new(
                &field.name,
                ValidationKind::InvalidDate,
                format!("{} must be a valid date (YYYY-MM-DD)", label),
            )
        })?,
        FieldType::Time => parse_time(text).map(FieldValue::Time).ok_or_else(|| {
            ValidationError::new(
                &field.name,
                ValidationKind::InvalidTime,
                format!("{} must be a valid time (HH:MM or HH:MM:SS)", label),
            )
        })?,
        FieldType::Boolean => FieldValue::Boolean(truthy(raw)),
    };

    Ok(Some(value))
}
