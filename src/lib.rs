//! recordbook - a self-describing, schema-validated record store
//!
//! Records live in a single TOML file that also embeds the schema used to
//! write them, so the file can be reopened without the original schema.

pub mod api;
pub mod cli;
pub mod coercion;
pub mod filter;
pub mod observability;
pub mod record;
pub mod schema;
pub mod storage;
