//! Schema type definitions
//!
//! Supported field types:
//! - number: finite 64-bit float
//! - text: UTF-8 string
//! - boolean: true / false
//! - date: calendar date, `YYYY-MM-DD`
//! - time: wall-clock time, `HH:MM` or `HH:MM:SS`
//! - choice: one of a fixed, ordered list of strings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the document section that carries the embedded schema.
pub const METADATA_TABLE: &str = "_meta";

/// Table name used when a schema does not name one.
pub const DEFAULT_TABLE_NAME: &str = "records";

/// Closed set of field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Text,
    Boolean,
    Date,
    Time,
    Choice,
}

impl FieldType {
    /// Parses a type name as written in a schema description.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "number" => Some(FieldType::Number),
            "text" => Some(FieldType::Text),
            "boolean" => Some(FieldType::Boolean),
            "date" => Some(FieldType::Date),
            "time" => Some(FieldType::Time),
            "choice" => Some(FieldType::Choice),
            _ => None,
        }
    }

    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Choice => "choice",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One declared field of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Present iff `field_type` is `Choice`; non-empty and duplicate-free.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldSchema {
    /// Create an optional field without label or options
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: None,
            required: false,
            options: None,
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Create a choice field with the given options
    pub fn choice<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: Some(options.into_iter().map(Into::into).collect()),
            ..Self::new(name, FieldType::Choice)
        }
    }

    /// Label if one was declared, otherwise the field name
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Declared options; empty for non-choice fields
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}

/// Complete, validated description of one record table
///
/// Constructed once per session and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSchema {
    pub name: String,
    pub fields: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DatabaseSchema {
    /// Create a schema for the given table and fields
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            fields,
            primary_key: None,
            description: None,
        }
    }

    /// Looks up a field by exact name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a field by name, ignoring ASCII and Unicode case
    pub fn find_field_ignore_case(&self, name: &str) -> Option<&FieldSchema> {
        let wanted = name.to_lowercase();
        self.fields.iter().find(|f| f.name.to_lowercase() == wanted)
    }

    /// Declared field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> DatabaseSchema {
        DatabaseSchema::new(
            "tasks",
            vec![
                FieldSchema::new("id", FieldType::Number).required(),
                FieldSchema::new("title", FieldType::Text).with_label("Title"),
                FieldSchema::choice("status", ["todo", "done"]),
            ],
        )
    }

    #[test]
    fn test_field_type_names_roundtrip() {
        for t in [
            FieldType::Number,
            FieldType::Text,
            FieldType::Boolean,
            FieldType::Date,
            FieldType::Time,
            FieldType::Choice,
        ] {
            assert_eq!(FieldType::parse(t.type_name()), Some(t));
        }
        assert_eq!(FieldType::parse("Number"), None);
        assert_eq!(FieldType::parse("int"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let mut schema = sample_schema();
        schema.primary_key = Some("id".into());

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["primaryKey"], "id");
        assert_eq!(value["fields"][0], json!({"name": "id", "type": "number", "required": true}));
        assert_eq!(value["fields"][1], json!({"name": "title", "type": "text", "label": "Title"}));
        assert_eq!(value["fields"][2]["options"], json!(["todo", "done"]));
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_field_lookup() {
        let schema = sample_schema();
        assert!(schema.field("title").is_some());
        assert!(schema.field("TITLE").is_none());
        assert_eq!(schema.find_field_ignore_case("TITLE").map(|f| f.name.as_str()), Some("title"));
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["id", "title", "status"]);
    }

    #[test]
    fn test_display_label_falls_back_to_name() {
        let schema = sample_schema();
        assert_eq!(schema.fields[0].display_label(), "id");
        assert_eq!(schema.fields[1].display_label(), "Title");
        assert!(schema.fields[0].options().is_empty());
        assert_eq!(schema.fields[2].options().len(), 2);
    }
}
