//! Whole-document persistence
//!
//! There are no incremental writes: every save serializes the full document
//! (records plus freshly embedded schema) and overwrites the file.

use std::fs;
use std::path::Path;

use super::errors::{DocumentError, DocumentResult};
use super::metadata::ensure_schema_metadata;
use crate::observability::{Event, Logger};
use crate::record::Record;
use crate::schema::DatabaseSchema;

/// A parsed document and its normalized records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedDatabase {
    /// Every section of the document, kept for later writes
    pub document: toml::Table,
    /// Entries of the schema's table, normalized
    pub records: Vec<Record>,
}

/// Loads a document and normalizes the records in the schema's table.
///
/// Empty content yields an empty document. A missing or non-array table
/// yields no records. Entries that are not tables become empty records.
pub fn load_database(path: &Path, schema: &DatabaseSchema) -> DocumentResult<LoadedDatabase> {
    let content = fs::read_to_string(path).map_err(|e| DocumentError::io("read", e).at(path))?;

    let document: toml::Table = if content.trim().is_empty() {
        toml::Table::new()
    } else {
        toml::from_str(&content).map_err(|e| DocumentError::parse(e).at(path))?
    };

    let entries = document
        .get(&schema.name)
        .and_then(toml::Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let normalized = entries.iter().filter(|e| !e.is_table()).count();
    let records: Vec<Record> = entries.iter().map(Record::from_persisted).collect();

    if normalized > 0 {
        Logger::warn(
            Event::RecordsNormalized,
            &[
                ("path", &path.display().to_string()),
                ("replaced", &normalized.to_string()),
            ],
        );
    }
    Logger::info(
        Event::DatabaseLoaded,
        &[
            ("path", &path.display().to_string()),
            ("records", &records.len().to_string()),
            ("table", &schema.name),
        ],
    );

    Ok(LoadedDatabase { document, records })
}

/// Writes `records` under the schema's table, re-embeds the schema, and
/// overwrites the file with the whole document.
pub fn save_database(
    path: &Path,
    document: &mut toml::Table,
    schema: &DatabaseSchema,
    records: &[Record],
) -> DocumentResult<()> {
    document.insert(
        schema.name.clone(),
        toml::Value::Array(records.iter().map(Record::to_persisted).collect()),
    );
    ensure_schema_metadata(document, schema).map_err(|e| e.at(path))?;
    write_document(path, document)?;

    Logger::info(
        Event::DatabaseSaved,
        &[
            ("path", &path.display().to_string()),
            ("records", &records.len().to_string()),
        ],
    );

    Ok(())
}

/// Serializes and overwrites. Creates missing parent directories.
pub(crate) fn write_document(path: &Path, document: &toml::Table) -> DocumentResult<()> {
    let content = toml::to_string(document).map_err(|e| DocumentError::serialize(e).at(path))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| DocumentError::io("create directory for", e).at(path))?;
        }
    }

    fs::write(path, content).map_err(|e| DocumentError::io("write", e).at(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use crate::schema::{FieldSchema, FieldType};
    use crate::storage::DocumentErrorCode;
    use tempfile::TempDir;

    fn schema() -> DatabaseSchema {
        DatabaseSchema::new(
            "tasks",
            vec![
                FieldSchema::new("id", FieldType::Number),
                FieldSchema::new("title", FieldType::Text),
            ],
        )
    }

    #[test]
    fn test_empty_file_loads_as_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.toml");
        fs::write(&path, "\n\n").unwrap();

        let loaded = load_database(&path, &schema()).unwrap();
        assert!(loaded.document.is_empty());
        assert!(loaded.records.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_database(&dir.path().join("absent.toml"), &schema()).unwrap_err();
        assert_eq!(err.code(), DocumentErrorCode::Io);
    }

    #[test]
    fn test_non_array_table_yields_no_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.toml");
        fs::write(&path, "tasks = 3\n").unwrap();

        let loaded = load_database(&path, &schema()).unwrap();
        assert!(loaded.records.is_empty());
    }

    #[test]
    fn test_non_table_entries_are_normalized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.toml");
        fs::write(&path, "tasks = [1, \"two\", { title = \"three\" }]\n").unwrap();

        let loaded = load_database(&path, &schema()).unwrap();
        assert_eq!(loaded.records.len(), 3);
        assert!(loaded.records[0].is_empty());
        assert!(loaded.records[1].is_empty());
        assert_eq!(
            loaded.records[2].value(&schema().fields[1]),
            Some(FieldValue::Text("three".into()))
        );
    }

    #[test]
    fn test_save_preserves_other_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("db.toml");
        let schema = schema();

        let mut document: toml::Table = toml::from_str("[settings]\ntheme = \"dark\"\n").unwrap();
        let mut record = Record::new();
        record.set("id", FieldValue::Number(1.0));
        save_database(&path, &mut document, &schema, &[record.clone()]).unwrap();

        let loaded = load_database(&path, &schema).unwrap();
        assert_eq!(loaded.records, vec![record]);
        assert_eq!(
            loaded.document["settings"]["theme"].as_str(),
            Some("dark")
        );
        assert!(loaded.document["_meta"].is_table());
    }
}
