//! API handler for recordbook
//!
//! Turns requests into store operations and store outcomes into responses.

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use super::errors::{ApiError, ApiResult};
use super::request::Request;
use super::response::Response;
use crate::filter::FilterQuery;
use crate::observability::{Event, Logger};
use crate::record::Record;
use crate::storage::{MutationOutcome, RecordStore};

/// Serves requests against one open store
#[derive(Debug)]
pub struct ApiHandler {
    store: RecordStore,
}

impl ApiHandler {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Handle one raw request line
    pub fn handle_line(&mut self, line: &str) -> Response {
        match Request::parse(line) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                Logger::warn(
                    Event::RequestInvalid,
                    &[("code", e.code()), ("message", e.message())],
                );
                Response::error(&e)
            }
        }
    }

    /// Handle one parsed request
    pub fn handle(&mut self, request: &Request) -> Response {
        Logger::trace(Event::RequestReceived, &[("op", request.op())]);

        let result = match request {
            Request::Create { values } => self
                .store
                .create(values)
                .map_err(|e| ApiError::from_document_error(&e))
                .and_then(|outcome| self.outcome(outcome)),
            Request::Update { index, values } => self
                .store
                .update(*index, values)
                .map_err(|e| ApiError::from_document_error(&e))
                .and_then(|outcome| self.outcome(outcome)),
            Request::Delete { index } => self
                .store
                .delete(*index)
                .map_err(|e| ApiError::from_document_error(&e))
                .and_then(|outcome| self.outcome(outcome)),
            Request::Query { query } => Ok(self.query(query)),
            Request::Schema => {
                serde_json::to_value(self.store.schema()).map_err(ApiError::internal)
            }
        };
        Response::from(result)
    }

    /// Reads request lines until EOF, writing one response line per request.
    ///
    /// Blank lines are skipped. Only I/O failures on the streams end the loop
    /// early.
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> io::Result<()> {
        Logger::info(
            Event::Serving,
            &[
                ("path", &self.store.path().display().to_string()),
                ("table", &self.store.schema().name),
            ],
        );

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line);
            writeln!(writer, "{}", response.to_json())?;
            writer.flush()?;
        }

        Ok(())
    }

    fn outcome(&self, outcome: MutationOutcome) -> ApiResult<Value> {
        match outcome {
            MutationOutcome::Created { index } | MutationOutcome::Updated { index } => {
                Ok(self.entry(index))
            }
            MutationOutcome::Deleted { index, record } => Ok(entry_json(index, &record)),
            MutationOutcome::Invalid(errors) => Err(ApiError::validation_failed(errors)),
            MutationOutcome::Rejected(e) => Err(ApiError::from_operation_error(&e)),
        }
    }

    fn entry(&self, index: usize) -> Value {
        match self.store.get(index) {
            Some(record) => entry_json(index, record),
            None => json!({ "index": index }),
        }
    }

    fn query(&self, query: &str) -> Value {
        let schema = self.store.schema();
        let parsed = FilterQuery::parse(schema, query);
        let matches: Vec<Value> = self
            .store
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| parsed.matches(record, schema))
            .map(|(index, record)| entry_json(index, record))
            .collect();

        let mut data = json!({
            "total": self.store.records().len(),
            "matches": matches,
        });
        if let FilterQuery::UnknownField { name } = parsed {
            data["unknown_field"] = Value::String(name);
        }
        data
    }
}

fn entry_json(index: usize, record: &Record) -> Value {
    json!({ "index": index, "record": record.to_json() })
}
