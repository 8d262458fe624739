//! Request/response protocol for recordbook
//!
//! One JSON object per line in, one JSON object per line out. The handler
//! owns a `RecordStore` and processes requests strictly one at a time.
//!
//! # Supported Operations
//!
//! - create
//! - update
//! - delete
//! - query
//! - schema
//!
//! Validation failures and missing selections are ordinary error responses.
//! A failed save is reported with the document error code and the handler
//! keeps serving.

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult};
pub use handler::ApiHandler;
pub use request::Request;
pub use response::{ErrorResponse, Response, SuccessResponse};
