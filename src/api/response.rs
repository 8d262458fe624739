//! API response types
//!
//! Every response is a single JSON line: `{"status":"ok","data":..}` or
//! `{"status":"error","code":..,"message":..,"errors":[..]}`.

use serde::Serialize;
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use crate::coercion::ValidationError;

/// Encoded in place of a response that could not be serialized
const FALLBACK_ERROR: &str =
    r#"{"status":"error","code":"RB_INTERNAL_ERROR","message":"Response could not be encoded"}"#;

/// Success response
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub status: &'static str,
    pub data: Value,
}

impl SuccessResponse {
    pub fn new(data: Value) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl ErrorResponse {
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            status: "error",
            code: err.code().to_string(),
            message: err.message().to_string(),
            errors: err.errors().to_vec(),
        }
    }
}

/// Unified response type
#[derive(Debug, Clone)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Success(SuccessResponse::new(data))
    }

    pub fn error(err: &ApiError) -> Self {
        Response::Error(ErrorResponse::from_error(err))
    }

    /// Single-line JSON encoding
    pub fn to_json(&self) -> String {
        let encoded = match self {
            Response::Success(r) => serde_json::to_string(r),
            Response::Error(r) => serde_json::to_string(r),
        };
        encoded.unwrap_or_else(|_| FALLBACK_ERROR.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }
}

impl From<ApiResult<Value>> for Response {
    fn from(result: ApiResult<Value>) -> Self {
        match result {
            Ok(data) => Response::success(data),
            Err(e) => Response::error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let json = Response::success(json!({"index": 0})).to_json();
        assert_eq!(json, r#"{"status":"ok","data":{"index":0}}"#);
    }

    #[test]
    fn test_error_response_omits_empty_errors() {
        let err = ApiError::invalid_request("bad line");
        let json = Response::error(&err).to_json();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("RB_INVALID_REQUEST"));
        assert!(!json.contains("\"errors\""));
    }

    #[test]
    fn test_fallback_is_valid_json() {
        let parsed: Value = serde_json::from_str(FALLBACK_ERROR).unwrap();
        assert_eq!(parsed["status"], "error");
    }
}
