//! Document storage for recordbook
//!
//! One flat TOML file per database. The file holds:
//!
//! - the record table, named after the schema, as an array of tables
//! - the reserved `_meta` section with the embedded schema
//! - any other sections, which are preserved untouched across saves
//!
//! # Design Principles
//!
//! - Whole-document writes: every mutation rewrites the entire file
//! - Self-describing: the schema travels with the data
//! - Version-gated: only one embedded schema version is accepted
//! - Memory never runs ahead of disk: a failed save undoes the mutation

mod document;
mod errors;
mod metadata;
mod store;

pub use document::{load_database, save_database, LoadedDatabase};
pub use errors::{
    DocumentCause, DocumentError, DocumentErrorCode, DocumentResult, OpenError, OperationError,
};
pub use metadata::{
    decode_schema, encode_schema, ensure_database_file, ensure_schema_metadata,
    load_schema_from_database, CURRENT_SCHEMA_VERSION, SCHEMA_JSON_KEY, SCHEMA_VERSION_KEY,
};
pub use store::{MutationOutcome, RecordStore, SchemaSource};
