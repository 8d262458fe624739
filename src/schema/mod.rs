//! Schema subsystem for recordbook
//!
//! A schema arrives as untrusted JSON (an external source file or the
//! string embedded in a document) and leaves as an immutable, canonical
//! `DatabaseSchema` that governs coercion, persistence and filtering.

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaLoader;
pub use types::{DatabaseSchema, FieldSchema, FieldType, DEFAULT_TABLE_NAME, METADATA_TABLE};
pub use validator::SchemaValidator;
