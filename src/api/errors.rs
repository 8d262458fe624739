//! API error types
//!
//! API errors are pass-through: codes from lower subsystems (document,
//! operation) are preserved unchanged. Validation failures carry the full
//! per-field error list.

use std::fmt;

use crate::coercion::ValidationError;
use crate::storage::{DocumentError, OperationError};

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Request line is not a well-formed request
    InvalidRequest,
    /// `op` names no supported operation
    UnknownOperation,
    /// Form values failed coercion
    ValidationFailed,
    /// Response data could not be encoded
    Internal,
}

impl ApiErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::InvalidRequest => "RB_INVALID_REQUEST",
            ApiErrorCode::UnknownOperation => "RB_UNKNOWN_OPERATION",
            ApiErrorCode::ValidationFailed => "RB_VALIDATION_FAILED",
            ApiErrorCode::Internal => "RB_INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// API error with the originating subsystem's code preserved
#[derive(Debug, Clone)]
pub struct ApiError {
    code: String,
    message: String,
    errors: Vec<ValidationError>,
}

impl ApiError {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidRequest.code(), reason)
    }

    pub fn unknown_operation(op: &str) -> Self {
        Self::new(
            ApiErrorCode::UnknownOperation.code(),
            format!("Unknown operation: {}", op),
        )
    }

    pub fn internal(reason: impl fmt::Display) -> Self {
        Self::new(ApiErrorCode::Internal.code(), reason.to_string())
    }

    /// Every field failure, in declaration order
    pub fn validation_failed(errors: Vec<ValidationError>) -> Self {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            code: ApiErrorCode::ValidationFailed.code().to_string(),
            message,
            errors,
        }
    }

    /// Pass-through from an operation error
    pub fn from_operation_error(err: &OperationError) -> Self {
        Self::new(err.code(), err.to_string())
    }

    /// Pass-through from a document error
    pub fn from_document_error(err: &DocumentError) -> Self {
        Self::new(err.code().code(), err.message())
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field failures; empty unless this is a validation error
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
