//! CLI module for recordbook
//!
//! Provides command-line access to:
//! - init: create a document or re-embed its schema
//! - schema: print the resolved schema
//! - list: print records matching a filter query
//! - add / update / delete: one mutation, then exit
//! - serve: JSON-lines request loop over stdin/stdout

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, Target};
pub use commands::{run, run_command};
pub use config::{Config, ResolvedTarget};
pub use errors::{CliError, CliErrorCode, CliResult};
