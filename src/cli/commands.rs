//! CLI command implementations
//!
//! Each one-shot command opens the store, turns its arguments into a single
//! API request, prints the response, and exits. An error response still
//! prints, then fails the process.

use std::io;

use serde_json::{json, Value};

use crate::api::{ApiHandler, Request, Response};
use crate::coercion::FormValues;
use crate::observability::{Logger, Severity};
use crate::schema::SchemaLoader;
use crate::storage::{ensure_database_file, OpenError, RecordStore, SchemaSource};

use super::args::{Cli, Command, Target};
use super::config::ResolvedTarget;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Parse arguments and run the chosen command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if cli.quiet {
        Logger::set_min_severity(Severity::Error);
    }
    run_command(cli.command)
}

/// Dispatch a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { target } => init(&target),
        Command::Schema { target } => one_shot(&target, Request::Schema),
        Command::List { target, query } => one_shot(&target, Request::Query { query }),
        Command::Add { target, set } => one_shot(
            &target,
            Request::Create {
                values: assignments(set),
            },
        ),
        Command::Update { target, index, set } => update(&target, index, set),
        Command::Delete { target, index } => one_shot(&target, Request::Delete { index }),
        Command::Serve { target } => serve(&target),
    }
}

/// Create the document, or re-embed the schema into an existing one
pub fn init(target: &Target) -> CliResult<()> {
    let resolved = target.resolve()?;
    let schema_path = resolved
        .schema
        .as_deref()
        .ok_or_else(|| CliError::usage("init needs a schema; pass --schema or set it in --config"))?;

    let schema = SchemaLoader::load_file(schema_path)?;
    ensure_database_file(&resolved.database, &schema).map_err(OpenError::from)?;

    write_response(&Response::success(json!({
        "database": resolved.database.display().to_string(),
        "table": schema.name,
        "fields": schema.fields.len(),
    })))
}

/// Replace a record, keeping the current value of every field not set
fn update(target: &Target, index: Option<usize>, set: Vec<(String, String)>) -> CliResult<()> {
    let mut handler = open(&target.resolve()?)?;

    let mut values = index
        .and_then(|i| handler.store().get(i))
        .map(|record| record.form_values(handler.store().schema()))
        .unwrap_or_default();
    values.extend(assignments(set));

    respond(&handler.handle(&Request::Update { index, values }))
}

fn serve(target: &Target) -> CliResult<()> {
    let mut handler = open(&target.resolve()?)?;
    handler.serve(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn one_shot(target: &Target, request: Request) -> CliResult<()> {
    let mut handler = open(&target.resolve()?)?;
    respond(&handler.handle(&request))
}

fn open(resolved: &ResolvedTarget) -> CliResult<ApiHandler> {
    let source = match &resolved.schema {
        Some(path) => SchemaSource::File(path.clone()),
        None => SchemaSource::Embedded,
    };
    let store = RecordStore::open(&resolved.database, &source)?;
    Ok(ApiHandler::new(store))
}

fn respond(response: &Response) -> CliResult<()> {
    write_response(response)?;
    match response {
        Response::Success(_) => Ok(()),
        Response::Error(e) => Err(CliError::rejected(&e.code)),
    }
}

fn assignments(set: Vec<(String, String)>) -> FormValues {
    set.into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use std::fs;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> Target {
        let schema_path = dir.path().join("schema.json");
        fs::write(
            &schema_path,
            r#"{"name": "tasks", "fields": [
                {"name": "id", "type": "number", "required": true},
                {"name": "title", "type": "text"},
                {"name": "done", "type": "boolean"}
            ]}"#,
        )
        .unwrap();
        Target {
            db: Some(dir.path().join("tasks.toml")),
            schema: Some(schema_path),
            config: None,
        }
    }

    fn embedded(target: &Target) -> Target {
        Target {
            schema: None,
            ..target.clone()
        }
    }

    fn store(target: &Target) -> RecordStore {
        RecordStore::open(
            target.db.as_deref().unwrap(),
            &SchemaSource::Embedded,
        )
        .unwrap()
    }

    fn set(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_init_requires_schema() {
        let dir = TempDir::new().unwrap();
        let target = Target {
            db: Some(dir.path().join("tasks.toml")),
            ..Target::default()
        };
        let err = init(&target).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::Usage);
    }

    #[test]
    fn test_update_keeps_unspecified_fields() {
        let dir = TempDir::new().unwrap();
        let target = setup(&dir);
        init(&target).unwrap();

        run_command(Command::Add {
            target: embedded(&target),
            set: set(&[("id", "7"), ("title", "Buy milk"), ("done", "no")]),
        })
        .unwrap();
        run_command(Command::Update {
            target: embedded(&target),
            index: Some(0),
            set: set(&[("done", "yes")]),
        })
        .unwrap();

        let store = store(&target);
        let record = store.records()[0].to_json();
        assert_eq!(record["id"], 7);
        assert_eq!(record["title"], "Buy milk");
        assert_eq!(record["done"], true);
    }

    #[test]
    fn test_rejections_fail_the_command() {
        let dir = TempDir::new().unwrap();
        let target = setup(&dir);
        init(&target).unwrap();

        let err = run_command(Command::Add {
            target: embedded(&target),
            set: set(&[("title", "no id")]),
        })
        .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::Rejected);

        let err = run_command(Command::Delete {
            target: embedded(&target),
            index: None,
        })
        .unwrap_err();
        assert!(err.message().contains("RB_NO_SELECTION"));
        assert!(store(&target).records().is_empty());
    }

    #[test]
    fn test_missing_document_without_schema_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let target = Target {
            db: Some(dir.path().join("absent.toml")),
            ..Target::default()
        };
        let err = run_command(Command::Schema { target }).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::OpenFailed);
    }
}
