//! Observable events for recordbook
//!
//! Events are explicit and typed. Every log line names exactly one of them.

use std::fmt;

/// Observable events in recordbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema
    /// External schema source file validated
    SchemaLoaded,
    /// Schema recovered from a document's embedded metadata
    SchemaExtracted,
    /// Schema metadata (re)written into an existing document
    SchemaEmbedded,

    // Document lifecycle
    /// Fresh document created on disk
    DatabaseCreated,
    /// Document parsed and records normalized
    DatabaseLoaded,
    /// Full document rewritten
    DatabaseSaved,
    /// Non-table entries replaced with empty records during load
    RecordsNormalized,

    // Mutations
    /// Form input failed coercion and was not persisted
    RecordRejected,
    /// Mutation attempted without a selected record
    OperationRejected,
    /// Document write failed, in-memory state rolled back
    SaveFailed,

    // Protocol
    /// Request loop ready
    Serving,
    /// Request parsed and dispatched
    RequestReceived,
    /// Malformed request line
    RequestInvalid,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaExtracted => "SCHEMA_EXTRACTED",
            Event::SchemaEmbedded => "SCHEMA_EMBEDDED",

            Event::DatabaseCreated => "DATABASE_CREATED",
            Event::DatabaseLoaded => "DATABASE_LOADED",
            Event::DatabaseSaved => "DATABASE_SAVED",
            Event::RecordsNormalized => "RECORDS_NORMALIZED",

            Event::RecordRejected => "RECORD_REJECTED",
            Event::OperationRejected => "OPERATION_REJECTED",
            Event::SaveFailed => "SAVE_FAILED",

            Event::Serving => "RECORDBOOK_SERVING",
            Event::RequestReceived => "REQUEST_RECEIVED",
            Event::RequestInvalid => "REQUEST_INVALID",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
