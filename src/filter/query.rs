//! Query parsing and evaluation

use crate::record::Record;
use crate::schema::{DatabaseSchema, FieldSchema};

/// A parsed filter query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterQuery<'a> {
    /// Blank query, or a field query with a blank value
    All,
    /// `field:needle` against one declared field
    Field {
        field: &'a FieldSchema,
        needle: String,
    },
    /// `field:needle` naming no declared field. Matches nothing.
    UnknownField { name: String },
    /// Substring search over every declared field
    Global { needle: String },
}

impl<'a> FilterQuery<'a> {
    /// Parses a raw query against the schema.
    ///
    /// A colon only starts a field query when at least one character
    /// precedes it; `":x"` is a global search for `:x`.
    pub fn parse(schema: &'a DatabaseSchema, query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return FilterQuery::All;
        }

        if let Some(pos) = query.find(':').filter(|&pos| pos > 0) {
            let name = query[..pos].trim();
            let needle = query[pos + 1..].trim().to_lowercase();

            return match schema.find_field_ignore_case(name) {
                None => FilterQuery::UnknownField {
                    name: name.to_string(),
                },
                Some(_) if needle.is_empty() => FilterQuery::All,
                Some(field) => FilterQuery::Field { field, needle },
            };
        }

        FilterQuery::Global {
            needle: query.to_lowercase(),
        }
    }

    /// Checks one record
    pub fn matches(&self, record: &Record, schema: &DatabaseSchema) -> bool {
        match self {
            FilterQuery::All => true,
            FilterQuery::UnknownField { .. } => false,
            FilterQuery::Field { field, needle } => contains(record, field, needle),
            FilterQuery::Global { needle } => {
                schema.fields.iter().any(|field| contains(record, field, needle))
            }
        }
    }
}

fn contains(record: &Record, field: &FieldSchema, needle: &str) -> bool {
    record
        .display_value(field)
        .map_or(false, |text| text.to_lowercase().contains(needle))
}

/// Indices of matching records, original order preserved.
pub fn filter_records(records: &[Record], schema: &DatabaseSchema, query: &str) -> Vec<usize> {
    let parsed = FilterQuery::parse(schema, query);
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| parsed.matches(record, schema))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use crate::schema::FieldType;

    fn schema() -> DatabaseSchema {
        DatabaseSchema::new(
            "tasks",
            vec![
                FieldSchema::new("id", FieldType::Number),
                FieldSchema::new("title", FieldType::Text),
            ],
        )
    }

    fn records() -> Vec<Record> {
        [(1.0, "Buy milk"), (2.0, "Walk dog")]
            .iter()
            .map(|(id, title)| {
                let mut record = Record::new();
                record.set("id", FieldValue::Number(*id));
                record.set("title", FieldValue::Text(title.to_string()));
                record
            })
            .collect()
    }

    #[test]
    fn test_reference_queries() {
        let schema = schema();
        let records = records();

        assert_eq!(filter_records(&records, &schema, ""), vec![0, 1]);
        assert_eq!(filter_records(&records, &schema, "   "), vec![0, 1]);
        assert_eq!(filter_records(&records, &schema, "dog"), vec![1]);
        assert_eq!(filter_records(&records, &schema, "title:milk"), vec![0]);
        assert_eq!(filter_records(&records, &schema, "nope:milk"), Vec::<usize>::new());
        assert_eq!(filter_records(&records, &schema, "title:"), vec![0, 1]);
    }

    #[test]
    fn test_case_insensitive_field_and_needle() {
        let schema = schema();
        let records = records();
        assert_eq!(filter_records(&records, &schema, "TITLE:MILK"), vec![0]);
        assert_eq!(filter_records(&records, &schema, " Title : Walk "), vec![1]);
        assert_eq!(filter_records(&records, &schema, "WALK"), vec![1]);
    }

    #[test]
    fn test_numbers_match_their_display_form() {
        let schema = schema();
        let records = records();
        assert_eq!(filter_records(&records, &schema, "id:2"), vec![1]);
        assert_eq!(filter_records(&records, &schema, "2.0"), Vec::<usize>::new());
    }

    #[test]
    fn test_leading_colon_is_global() {
        let schema = schema();
        assert!(matches!(
            FilterQuery::parse(&schema, ":milk"),
            FilterQuery::Global { ref needle } if needle == ":milk"
        ));
    }

    #[test]
    fn test_unknown_field_never_falls_back() {
        let schema = schema();
        assert_eq!(
            FilterQuery::parse(&schema, "owner:"),
            FilterQuery::UnknownField {
                name: "owner".into()
            }
        );
    }

    #[test]
    fn test_absent_values_never_match() {
        let schema = schema();
        let mut records = records();
        records.push(Record::new());

        assert_eq!(filter_records(&records, &schema, "title:a"), vec![0, 1]);
        assert_eq!(filter_records(&records, &schema, "l"), vec![0, 1]);
        assert_eq!(filter_records(&records, &schema, ""), vec![0, 1, 2]);
    }
}
