//! Storage error types
//!
//! - `DocumentError`: the persisted document cannot be read, parsed,
//!   written, or carries missing/incompatible embedded metadata. Fatal to
//!   the current command unless an external schema lets the file be
//!   recreated.
//! - `OperationError`: a mutation addressed no record. Recoverable,
//!   reported as data, no state change.
//! - `OpenError`: anything that prevents a session from starting.

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::schema::SchemaError;

/// Document error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentErrorCode {
    /// Read or write failure
    Io,
    /// File exists but holds nothing
    Empty,
    /// Content is not a valid document
    Parse,
    /// Reserved metadata section absent or not a table
    MissingMetadata,
    /// `schema_version` present but not numeric
    InvalidVersion,
    /// `schema_version` numeric but unsupported
    VersionMismatch,
    /// `schema_json` absent, not a string, or blank
    MissingSchemaJson,
    /// `schema_json` is not valid JSON
    InvalidSchemaJson,
    /// `schema_json` is JSON but not a valid schema
    InvalidEmbeddedSchema,
    /// Document could not be serialized
    Serialize,
}

impl DocumentErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            DocumentErrorCode::Io => "RB_DOCUMENT_IO_ERROR",
            DocumentErrorCode::Empty => "RB_DOCUMENT_EMPTY",
            DocumentErrorCode::Parse => "RB_DOCUMENT_PARSE_FAILED",
            DocumentErrorCode::MissingMetadata => "RB_DOCUMENT_MISSING_METADATA",
            DocumentErrorCode::InvalidVersion => "RB_DOCUMENT_INVALID_VERSION",
            DocumentErrorCode::VersionMismatch => "RB_DOCUMENT_VERSION_MISMATCH",
            DocumentErrorCode::MissingSchemaJson => "RB_DOCUMENT_MISSING_SCHEMA_JSON",
            DocumentErrorCode::InvalidSchemaJson => "RB_DOCUMENT_INVALID_SCHEMA_JSON",
            DocumentErrorCode::InvalidEmbeddedSchema => "RB_DOCUMENT_INVALID_EMBEDDED_SCHEMA",
            DocumentErrorCode::Serialize => "RB_DOCUMENT_SERIALIZE_FAILED",
        }
    }
}

impl fmt::Display for DocumentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Underlying failure behind a `DocumentError`
#[derive(Debug, Error)]
pub enum DocumentCause {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Document error with the file it concerns, when known
#[derive(Debug, Error)]
#[error("{code}: {message}{}", location(.path))]
pub struct DocumentError {
    code: DocumentErrorCode,
    message: String,
    path: Option<String>,
    #[source]
    cause: Option<DocumentCause>,
}

fn location(path: &Option<String>) -> String {
    match path {
        Some(p) => format!(" [{}]", p),
        None => String::new(),
    }
}

impl DocumentError {
    fn new(code: DocumentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            cause: None,
        }
    }

    fn caused_by(mut self, cause: impl Into<DocumentCause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Attach the document path
    pub fn at(mut self, path: &Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }

    pub fn io(action: &str, source: io::Error) -> Self {
        Self::new(
            DocumentErrorCode::Io,
            format!("Failed to {} document: {}", action, source),
        )
        .caused_by(source)
    }

    pub fn empty() -> Self {
        Self::new(
            DocumentErrorCode::Empty,
            "Document is empty; supply a schema to initialize it",
        )
    }

    pub fn parse(source: toml::de::Error) -> Self {
        Self::new(
            DocumentErrorCode::Parse,
            format!("Failed to parse document: {}", source.message()),
        )
        .caused_by(source)
    }

    pub fn missing_metadata(section: &str) -> Self {
        Self::new(
            DocumentErrorCode::MissingMetadata,
            format!("Document has no '{}' metadata table", section),
        )
    }

    pub fn invalid_version(found: &str) -> Self {
        Self::new(
            DocumentErrorCode::InvalidVersion,
            format!("schema_version must be a number, found {}", found),
        )
    }

    pub fn version_mismatch(found: impl fmt::Display, supported: i64) -> Self {
        Self::new(
            DocumentErrorCode::VersionMismatch,
            format!(
                "Unsupported schema_version {} (this build supports version {})",
                found, supported
            ),
        )
    }

    pub fn missing_schema_json() -> Self {
        Self::new(
            DocumentErrorCode::MissingSchemaJson,
            "Document metadata has no schema_json",
        )
    }

    pub fn invalid_schema_json(source: serde_json::Error) -> Self {
        Self::new(
            DocumentErrorCode::InvalidSchemaJson,
            format!("Embedded schema_json is not valid JSON: {}", source),
        )
        .caused_by(source)
    }

    pub fn invalid_embedded_schema(source: SchemaError) -> Self {
        Self::new(
            DocumentErrorCode::InvalidEmbeddedSchema,
            format!("Embedded schema is invalid: {}", source.message()),
        )
        .caused_by(source)
    }

    pub fn serialize(source: impl Into<DocumentCause> + fmt::Display) -> Self {
        Self::new(
            DocumentErrorCode::Serialize,
            format!("Failed to serialize document: {}", source),
        )
        .caused_by(source)
    }

    /// Returns the error code
    pub fn code(&self) -> DocumentErrorCode {
        self.code
    }

    /// Returns the error message, without the path
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the document path if known
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// A mutation that addressed no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("No record selected")]
    NoSelection,
    #[error("Record {index} does not exist ({len} records)")]
    IndexOutOfRange { index: usize, len: usize },
}

impl OperationError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            OperationError::NoSelection => "RB_NO_SELECTION",
            OperationError::IndexOutOfRange { .. } => "RB_INDEX_OUT_OF_RANGE",
        }
    }
}

/// Failure to start a session
#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl OpenError {
    /// Stable string code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            OpenError::Schema(e) => e.code().code(),
            OpenError::Document(e) => e.code().code(),
        }
    }
}
