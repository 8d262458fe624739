//! Field-level validation failures
//!
//! Validation errors are data, not faults: they are collected for every
//! field, returned to the caller together, and never abort the session.

use std::fmt;

use serde::Serialize;

/// Why a single field failed coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Required field left blank
    Required,
    /// Text does not parse as a finite number
    InvalidNumber,
    /// Not a calendar-correct `YYYY-MM-DD`
    InvalidDate,
    /// Not `HH:MM` / `HH:MM:SS` within range
    InvalidTime,
    /// Not one of the declared options
    InvalidChoice,
}

/// One field's coercion failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &str, kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}
