//! Storage Round-Trip Tests
//!
//! - save then load yields the identical record sequence
//! - omitted fields stay absent, stale keys survive
//! - the document is rewritten whole, other sections preserved
//! - a failed save leaves memory matching disk

use recordbook::coercion::{build_record_from_form, FormValues};
use recordbook::record::{FieldValue, Record};
use recordbook::schema::{DatabaseSchema, FieldSchema, FieldType};
use recordbook::storage::{
    ensure_database_file, load_database, save_database, DocumentErrorCode, MutationOutcome,
    RecordStore, SchemaSource,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn schema() -> DatabaseSchema {
    DatabaseSchema::new(
        "tasks",
        vec![
            FieldSchema::new("id", FieldType::Number).required(),
            FieldSchema::new("title", FieldType::Text).with_label("Title"),
            FieldSchema::new("done", FieldType::Boolean),
            FieldSchema::new("due", FieldType::Date),
            FieldSchema::new("at", FieldType::Time),
            FieldSchema::choice("status", ["open", "closed"]),
        ],
    )
}

fn form(value: serde_json::Value) -> FormValues {
    value.as_object().cloned().unwrap()
}

fn record(value: serde_json::Value) -> Record {
    build_record_from_form(&schema(), &form(value))
        .into_result()
        .unwrap()
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_save_then_load_is_identical() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tasks.toml");
    let schema = schema();

    let records = vec![
        record(json!({
            "id": "1", "title": "Buy milk", "done": "yes",
            "due": "2024-02-29", "at": "08:30", "status": "open"
        })),
        record(json!({"id": "2.5", "title": "  Walk dog  "})),
        record(json!({"id": "-3", "due": "", "status": ""})),
    ];

    let mut document = toml::Table::new();
    save_database(&path, &mut document, &schema, &records).unwrap();

    let loaded = load_database(&path, &schema).unwrap();
    assert_eq!(loaded.records, records);

    let first = &loaded.records[0];
    let keys: Vec<&str> = first.keys().collect();
    assert_eq!(keys, ["id", "title", "done", "due", "at", "status"]);
    assert_eq!(first.display_value(&schema.fields[4]).as_deref(), Some("08:30:00"));

    let third = &loaded.records[2];
    assert_eq!(third.value(&schema.fields[0]), Some(FieldValue::Number(-3.0)));
    assert_eq!(third.raw("due"), None);
    assert_eq!(third.raw("status"), None);
    assert_eq!(third.value(&schema.fields[2]), Some(FieldValue::Boolean(false)));
}

#[test]
fn test_stale_keys_survive_reembedding() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tasks.toml");
    fs::write(
        &path,
        "[[tasks]]\nid = 1\nlegacy = \"kept\"\ntitle = 42\n\n[settings]\ntheme = \"dark\"\n",
    )
    .unwrap();

    ensure_database_file(&path, &schema()).unwrap();
    let loaded = load_database(&path, &schema()).unwrap();

    let stale = &loaded.records[0];
    assert_eq!(stale.raw("legacy").and_then(toml::Value::as_str), Some("kept"));
    assert_eq!(stale.value(&schema().fields[1]), None);
    assert_eq!(stale.display_value(&schema().fields[1]).as_deref(), Some("42"));
    assert_eq!(
        loaded.document["settings"]["theme"].as_str(),
        Some("dark")
    );
}

// =============================================================================
// Record Store
// =============================================================================

#[test]
fn test_store_session_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tasks.toml");
    let schema_path = tmp.path().join("tasks.json");
    fs::write(&schema_path, serde_json::to_string(&schema()).unwrap()).unwrap();

    {
        let mut store = RecordStore::open(&path, &SchemaSource::File(schema_path)).unwrap();
        store.create(&form(json!({"id": 1, "title": "a"}))).unwrap();
        store.create(&form(json!({"id": 2, "title": "b"}))).unwrap();
        store.create(&form(json!({"id": 3, "title": "c"}))).unwrap();
        let outcome = store.delete(Some(1)).unwrap();
        assert!(matches!(outcome, MutationOutcome::Deleted { index: 1, .. }));
    }

    let store = RecordStore::open(&path, &SchemaSource::Embedded).unwrap();
    let titles: Vec<String> = store
        .records()
        .iter()
        .filter_map(|r| r.display_value(&store.schema().fields[1]))
        .collect();
    assert_eq!(titles, ["a", "c"]);
}

#[test]
fn test_update_replaces_whole_record() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tasks.toml");
    ensure_database_file(&path, &schema()).unwrap();

    let mut store = RecordStore::load(&path, schema()).unwrap();
    store
        .create(&form(json!({"id": 1, "title": "a", "status": "open"})))
        .unwrap();
    store.update(Some(0), &form(json!({"id": 1}))).unwrap();

    let reloaded = RecordStore::load(&path, schema()).unwrap();
    assert_eq!(reloaded.records()[0].raw("title"), None);
    assert_eq!(reloaded.records()[0].raw("status"), None);
}

#[test]
fn test_failed_save_keeps_memory_in_step_with_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tasks.toml");
    ensure_database_file(&path, &schema()).unwrap();
    let mut store = RecordStore::load(&path, schema()).unwrap();
    store.create(&form(json!({"id": 1, "title": "a"}))).unwrap();

    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    let err = store
        .update(Some(0), &form(json!({"id": 9, "title": "z"})))
        .unwrap_err();
    assert_eq!(err.code(), DocumentErrorCode::Io);
    assert_eq!(
        store.records()[0].value(&schema().fields[0]),
        Some(FieldValue::Number(1.0))
    );
}
