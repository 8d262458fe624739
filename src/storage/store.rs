//! Record store: one session's view of one document
//!
//! Every mutation follows the same path: coerce or check the request,
//! mutate the in-memory sequence, save the whole document. If the save
//! fails the in-memory change is undone before the error is returned, so
//! memory never runs ahead of disk.

use std::path::{Path, PathBuf};

use super::document::{load_database, save_database};
use super::errors::{DocumentResult, OpenError, OperationError};
use super::metadata::{ensure_database_file, load_schema_from_database};
use crate::coercion::{build_record_from_form, FormValues, ValidationError};
use crate::filter::filter_records;
use crate::observability::{Event, Logger};
use crate::record::Record;
use crate::schema::{DatabaseSchema, SchemaLoader};

/// Where a session's schema comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// External JSON schema file; re-embedded into the document on open
    File(PathBuf),
    /// Schema embedded in the document itself
    Embedded,
}

/// Result of a mutation request that did not fail on I/O
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Created { index: usize },
    Updated { index: usize },
    Deleted { index: usize, record: Record },
    /// Form input failed coercion; nothing was persisted
    Invalid(Vec<ValidationError>),
    /// Request addressed no record; nothing changed
    Rejected(OperationError),
}

impl MutationOutcome {
    /// True when the document was rewritten
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            MutationOutcome::Created { .. }
                | MutationOutcome::Updated { .. }
                | MutationOutcome::Deleted { .. }
        )
    }
}

/// Owns the schema, document and records of one open file
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    schema: DatabaseSchema,
    document: toml::Table,
    records: Vec<Record>,
}

impl RecordStore {
    /// Resolves the schema, then loads the document.
    ///
    /// With an external schema file the document is created if absent and
    /// its embedded schema overwritten; with `Embedded` the document must
    /// already carry a compatible schema.
    pub fn open(path: &Path, source: &SchemaSource) -> Result<Self, OpenError> {
        let schema = match source {
            SchemaSource::File(schema_path) => {
                let schema = SchemaLoader::load_file(schema_path)?;
                ensure_database_file(path, &schema)?;
                schema
            }
            SchemaSource::Embedded => load_schema_from_database(path)?,
        };
        Ok(Self::load(path, schema)?)
    }

    /// Loads the document at `path` under an already-resolved schema.
    pub fn load(path: &Path, schema: DatabaseSchema) -> DocumentResult<Self> {
        let loaded = load_database(path, &schema)?;
        Ok(Self {
            path: path.to_path_buf(),
            schema,
            document: loaded.document,
            records: loaded.records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &DatabaseSchema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Indices of records matching a filter query, in stored order.
    pub fn query(&self, query: &str) -> Vec<usize> {
        filter_records(&self.records, &self.schema, query)
    }

    /// Coerces the form and appends the record.
    pub fn create(&mut self, raw: &FormValues) -> DocumentResult<MutationOutcome> {
        let record = match self.coerce(raw) {
            Ok(record) => record,
            Err(errors) => return Ok(MutationOutcome::Invalid(errors)),
        };

        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }

        Ok(MutationOutcome::Created {
            index: self.records.len() - 1,
        })
    }

    /// Coerces the form and replaces the selected record wholesale.
    pub fn update(
        &mut self,
        selection: Option<usize>,
        raw: &FormValues,
    ) -> DocumentResult<MutationOutcome> {
        let index = match self.check_selection(selection) {
            Ok(index) => index,
            Err(e) => return Ok(MutationOutcome::Rejected(e)),
        };
        let record = match self.coerce(raw) {
            Ok(record) => record,
            Err(errors) => return Ok(MutationOutcome::Invalid(errors)),
        };

        let previous = std::mem::replace(&mut self.records[index], record);
        if let Err(e) = self.save() {
            self.records[index] = previous;
            return Err(e);
        }

        Ok(MutationOutcome::Updated { index })
    }

    /// Removes the selected record.
    pub fn delete(&mut self, selection: Option<usize>) -> DocumentResult<MutationOutcome> {
        let index = match self.check_selection(selection) {
            Ok(index) => index,
            Err(e) => return Ok(MutationOutcome::Rejected(e)),
        };

        let record = self.records.remove(index);
        if let Err(e) = self.save() {
            self.records.insert(index, record);
            return Err(e);
        }

        Ok(MutationOutcome::Deleted { index, record })
    }

    fn coerce(&self, raw: &FormValues) -> Result<Record, Vec<ValidationError>> {
        build_record_from_form(&self.schema, raw)
            .into_result()
            .map_err(|errors| {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                Logger::warn(
                    Event::RecordRejected,
                    &[
                        ("fields", &fields.join(",")),
                        ("table", &self.schema.name),
                    ],
                );
                errors
            })
    }

    fn check_selection(&self, selection: Option<usize>) -> Result<usize, OperationError> {
        let result = match selection {
            None => Err(OperationError::NoSelection),
            Some(index) if index >= self.records.len() => Err(OperationError::IndexOutOfRange {
                index,
                len: self.records.len(),
            }),
            Some(index) => Ok(index),
        };
        if let Err(e) = &result {
            Logger::warn(Event::OperationRejected, &[("reason", &e.to_string())]);
        }
        result
    }

    fn save(&mut self) -> DocumentResult<()> {
        save_database(&self.path, &mut self.document, &self.schema, &self.records).map_err(|e| {
            Logger::error(Event::SaveFailed, &[("error", &e.to_string())]);
            e
        })
    }
}
