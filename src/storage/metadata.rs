//! Embedded schema metadata
//!
//! Every document carries its own schema in a reserved section:
//!
//! ```toml
//! [_meta]
//! schema_version = 1
//! schema_json = """
//! { "name": "records", "fields": [ ... ] }
//! """
//! ```
//!
//! The schema travels as an opaque string. Encoding and decoding that
//! string is independent of the document format, which only ever sees
//! "a string field".

use std::fs;
use std::path::Path;

use super::errors::{DocumentError, DocumentResult};
use crate::observability::{Event, Logger};
use crate::schema::{DatabaseSchema, SchemaValidator, METADATA_TABLE};

/// The only embedded schema version this build reads or writes.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Metadata key holding the version number
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Metadata key holding the serialized schema
pub const SCHEMA_JSON_KEY: &str = "schema_json";

/// Encodes a schema as the opaque embedded string (pretty JSON).
pub fn encode_schema(schema: &DatabaseSchema) -> DocumentResult<String> {
    serde_json::to_string_pretty(schema).map_err(DocumentError::serialize)
}

/// Decodes the opaque embedded string and validates the schema it holds.
pub fn decode_schema(encoded: &str) -> DocumentResult<DatabaseSchema> {
    let raw: serde_json::Value =
        serde_json::from_str(encoded).map_err(DocumentError::invalid_schema_json)?;
    SchemaValidator::validate(&raw).map_err(DocumentError::invalid_embedded_schema)
}

/// Writes `schema_version` and `schema_json` into the metadata section.
///
/// Other keys already present in the section are preserved; the two schema
/// keys are overwritten unconditionally. A metadata entry that is not a
/// table is replaced.
pub fn ensure_schema_metadata(
    document: &mut toml::Table,
    schema: &DatabaseSchema,
) -> DocumentResult<()> {
    let encoded = encode_schema(schema)?;

    let section = document
        .entry(METADATA_TABLE)
        .or_insert(toml::Value::Table(toml::Table::new()));
    if !section.is_table() {
        *section = toml::Value::Table(toml::Table::new());
    }

    if let toml::Value::Table(meta) = section {
        meta.insert(
            SCHEMA_VERSION_KEY.to_string(),
            toml::Value::Integer(CURRENT_SCHEMA_VERSION),
        );
        meta.insert(SCHEMA_JSON_KEY.to_string(), toml::Value::String(encoded));
    }

    Ok(())
}

/// Idempotent initializer for a document file.
///
/// A missing or empty file becomes a fresh document: an empty record table
/// plus embedded schema. An existing document gets its schema metadata
/// overwritten and is rewritten in full. Existing records are not migrated.
pub fn ensure_database_file(path: &Path, schema: &DatabaseSchema) -> DocumentResult<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(DocumentError::io("read", e).at(path)),
    };

    let (mut document, created) = match existing {
        Some(content) if !content.trim().is_empty() => {
            let document: toml::Table = toml::from_str(&content)
                .map_err(|e| DocumentError::parse(e).at(path))?;
            (document, false)
        }
        _ => {
            let mut document = toml::Table::new();
            document.insert(schema.name.clone(), toml::Value::Array(Vec::new()));
            (document, true)
        }
    };

    ensure_schema_metadata(&mut document, schema).map_err(|e| e.at(path))?;
    super::document::write_document(path, &document)?;

    let event = if created {
        Event::DatabaseCreated
    } else {
        Event::SchemaEmbedded
    };
    Logger::info(
        event,
        &[
            ("path", &path.display().to_string()),
            ("table", &schema.name),
        ],
    );

    Ok(())
}

/// Recovers the schema embedded in an existing document.
///
/// The version gate runs before `schema_json` is looked at.
pub fn load_schema_from_database(path: &Path) -> DocumentResult<DatabaseSchema> {
    let content = fs::read_to_string(path).map_err(|e| DocumentError::io("read", e).at(path))?;
    if content.trim().is_empty() {
        return Err(DocumentError::empty().at(path));
    }

    let document: toml::Table =
        toml::from_str(&content).map_err(|e| DocumentError::parse(e).at(path))?;

    let meta = document
        .get(METADATA_TABLE)
        .and_then(toml::Value::as_table)
        .ok_or_else(|| DocumentError::missing_metadata(METADATA_TABLE).at(path))?;

    check_version(meta).map_err(|e| e.at(path))?;

    let encoded = meta
        .get(SCHEMA_JSON_KEY)
        .and_then(toml::Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DocumentError::missing_schema_json().at(path))?;

    let schema = decode_schema(encoded).map_err(|e| e.at(path))?;

    Logger::info(
        Event::SchemaExtracted,
        &[
            ("path", &path.display().to_string()),
            ("table", &schema.name),
        ],
    );

    Ok(schema)
}

/// Absent is accepted; present must be numeric and equal the current version.
fn check_version(meta: &toml::Table) -> DocumentResult<()> {
    match meta.get(SCHEMA_VERSION_KEY) {
        None => Ok(()),
        Some(toml::Value::Integer(v)) if *v == CURRENT_SCHEMA_VERSION => Ok(()),
        Some(toml::Value::Integer(v)) => Err(DocumentError::version_mismatch(
            v,
            CURRENT_SCHEMA_VERSION,
        )),
        Some(toml::Value::Float(v)) if *v == CURRENT_SCHEMA_VERSION as f64 => Ok(()),
        Some(toml::Value::Float(v)) => Err(DocumentError::version_mismatch(
            v,
            CURRENT_SCHEMA_VERSION,
        )),
        Some(other) => Err(DocumentError::invalid_version(other.type_str())),
    }
}
