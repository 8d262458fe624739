//! Schema error types
//!
//! Every schema error is fatal to startup: a session cannot proceed without
//! a valid schema. Messages are surfaced verbatim.

use std::fmt;

use thiserror::Error;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema description is not a JSON object
    NotAnObject,
    /// Table name collides with the reserved metadata section
    ReservedName,
    /// `fields` missing or not an array
    MissingFields,
    /// `fields` is an empty array
    EmptyFields,
    /// A field entry is not an object or has a blank name
    MissingFieldName,
    /// Field type outside the closed set
    UnknownFieldType,
    /// Choice field with missing, empty, non-string or duplicate options
    InvalidOptions,
    /// Non-choice field declares options
    UnexpectedOptions,
    /// Two fields share a name
    DuplicateField,
    /// `primaryKey` names no declared field
    UnknownPrimaryKey,
    /// Schema source could not be read or parsed
    Unreadable,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::NotAnObject => "RB_SCHEMA_NOT_OBJECT",
            SchemaErrorCode::ReservedName => "RB_SCHEMA_RESERVED_NAME",
            SchemaErrorCode::MissingFields => "RB_SCHEMA_MISSING_FIELDS",
            SchemaErrorCode::EmptyFields => "RB_SCHEMA_EMPTY_FIELDS",
            SchemaErrorCode::MissingFieldName => "RB_SCHEMA_MISSING_FIELD_NAME",
            SchemaErrorCode::UnknownFieldType => "RB_SCHEMA_UNKNOWN_FIELD_TYPE",
            SchemaErrorCode::InvalidOptions => "RB_SCHEMA_INVALID_OPTIONS",
            SchemaErrorCode::UnexpectedOptions => "RB_SCHEMA_UNEXPECTED_OPTIONS",
            SchemaErrorCode::DuplicateField => "RB_SCHEMA_DUPLICATE_FIELD",
            SchemaErrorCode::UnknownPrimaryKey => "RB_SCHEMA_UNKNOWN_PRIMARY_KEY",
            SchemaErrorCode::Unreadable => "RB_SCHEMA_UNREADABLE",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with the offending field, when one applies
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    field: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    fn for_field(code: SchemaErrorCode, field: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    pub fn not_an_object() -> Self {
        Self::new(SchemaErrorCode::NotAnObject, "Schema must be a JSON object")
    }

    pub fn reserved_name(name: &str) -> Self {
        Self::new(
            SchemaErrorCode::ReservedName,
            format!("Table name '{}' is reserved for schema metadata", name),
        )
    }

    pub fn missing_fields() -> Self {
        Self::new(
            SchemaErrorCode::MissingFields,
            "Schema must contain a 'fields' array",
        )
    }

    pub fn empty_fields() -> Self {
        Self::new(
            SchemaErrorCode::EmptyFields,
            "Schema must declare at least one field",
        )
    }

    pub fn missing_field_name(position: usize) -> Self {
        Self::new(
            SchemaErrorCode::MissingFieldName,
            format!("Field #{} must have a non-empty 'name'", position + 1),
        )
    }

    pub fn unknown_field_type(field: &str, found: &str) -> Self {
        Self::for_field(
            SchemaErrorCode::UnknownFieldType,
            field,
            format!(
                "Field '{}' has unsupported type '{}' (expected one of number, text, boolean, date, time, choice)",
                field, found
            ),
        )
    }

    pub fn invalid_options(field: &str, reason: impl fmt::Display) -> Self {
        Self::for_field(
            SchemaErrorCode::InvalidOptions,
            field,
            format!("Choice field '{}' {}", field, reason),
        )
    }

    pub fn unexpected_options(field: &str) -> Self {
        Self::for_field(
            SchemaErrorCode::UnexpectedOptions,
            field,
            format!("Field '{}' declares 'options' but is not a choice field", field),
        )
    }

    pub fn duplicate_field(field: &str) -> Self {
        Self::for_field(
            SchemaErrorCode::DuplicateField,
            field,
            format!("Duplicate field name '{}'", field),
        )
    }

    pub fn unknown_primary_key(key: &str) -> Self {
        Self::for_field(
            SchemaErrorCode::UnknownPrimaryKey,
            key,
            format!("primaryKey '{}' does not match any declared field", key),
        )
    }

    pub fn unreadable(source: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::Unreadable,
            format!("Cannot read schema '{}': {}", source, reason),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_prefixed() {
        let codes = [
            SchemaErrorCode::NotAnObject,
            SchemaErrorCode::ReservedName,
            SchemaErrorCode::MissingFields,
            SchemaErrorCode::EmptyFields,
            SchemaErrorCode::MissingFieldName,
            SchemaErrorCode::UnknownFieldType,
            SchemaErrorCode::InvalidOptions,
            SchemaErrorCode::UnexpectedOptions,
            SchemaErrorCode::DuplicateField,
            SchemaErrorCode::UnknownPrimaryKey,
            SchemaErrorCode::Unreadable,
        ];
        for code in codes {
            assert!(code.code().starts_with("RB_SCHEMA_"));
        }
    }

    #[test]
    fn test_display_includes_code_and_field() {
        let err = SchemaError::duplicate_field("title");
        let display = err.to_string();
        assert!(display.starts_with("RB_SCHEMA_DUPLICATE_FIELD"));
        assert!(display.contains("'title'"));
        assert_eq!(err.field(), Some("title"));
    }
}
