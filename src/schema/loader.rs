//! Schema loader for external schema source files
//!
//! A schema source is a single JSON object, read in full before validation.
//! Read and parse failures are fatal to startup, like validation failures.

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::DatabaseSchema;
use super::validator::SchemaValidator;
use crate::observability::{Event, Logger};

/// Reads schema descriptions from disk or memory.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads and validates the schema source file at `path`.
    pub fn load_file(path: &Path) -> SchemaResult<DatabaseSchema> {
        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::unreadable(path.display(), e))?;

        let schema = Self::parse(&content, path.display())?;

        Logger::info(
            Event::SchemaLoaded,
            &[
                ("fields", &schema.fields.len().to_string()),
                ("path", &path.display().to_string()),
                ("table", &schema.name),
            ],
        );

        Ok(schema)
    }

    /// Parses and validates a schema description held in memory.
    pub fn load_str(content: &str) -> SchemaResult<DatabaseSchema> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, source: impl std::fmt::Display) -> SchemaResult<DatabaseSchema> {
        let raw: Value = serde_json::from_str(content)
            .map_err(|e| SchemaError::unreadable(source, format!("Invalid JSON: {}", e)))?;
        SchemaValidator::validate(&raw)
    }
}
