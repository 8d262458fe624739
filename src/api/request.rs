//! API request types
//!
//! Requests are parsed from a JSON object with an `op` discriminator.

use serde::Deserialize;
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use crate::coercion::FormValues;

/// A parsed request
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Create { values: FormValues },
    /// `index: None` is a request with no selection
    Update {
        index: Option<usize>,
        values: FormValues,
    },
    Delete { index: Option<usize> },
    Query { query: String },
    Schema,
}

/// Raw request for parsing
#[derive(Debug, Deserialize)]
struct RawRequest {
    op: String,
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    values: Option<Value>,
    #[serde(default)]
    query: Option<String>,
}

impl Request {
    /// Parse a request from one JSON line
    pub fn parse(json: &str) -> ApiResult<Self> {
        let raw: RawRequest = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_request(format!("Invalid JSON: {}", e)))?;

        match raw.op.as_str() {
            "create" => Ok(Request::Create {
                values: form_values(raw.values)?,
            }),
            "update" => Ok(Request::Update {
                index: raw.index,
                values: form_values(raw.values)?,
            }),
            "delete" => Ok(Request::Delete { index: raw.index }),
            "query" => Ok(Request::Query {
                query: raw.query.unwrap_or_default(),
            }),
            "schema" => Ok(Request::Schema),
            other => Err(ApiError::unknown_operation(other)),
        }
    }

    /// Operation name, for logging
    pub fn op(&self) -> &'static str {
        match self {
            Request::Create { .. } => "create",
            Request::Update { .. } => "update",
            Request::Delete { .. } => "delete",
            Request::Query { .. } => "query",
            Request::Schema => "schema",
        }
    }
}

fn form_values(values: Option<Value>) -> ApiResult<FormValues> {
    match values {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ApiError::invalid_request("values must be an object")),
        None => Err(ApiError::invalid_request("Missing values")),
    }
}
