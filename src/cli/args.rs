//! CLI argument definitions using clap
//!
//! Commands:
//! - recordbook init --db <path> --schema <path>
//! - recordbook schema --db <path> [--schema <path>]
//! - recordbook list --db <path> [--query <q>]
//! - recordbook add --db <path> --set name=value ...
//! - recordbook update --db <path> --index N --set name=value ...
//! - recordbook delete --db <path> --index N
//! - recordbook serve --db <path>
//!
//! Every command also accepts `--config <path>` in place of `--db`/`--schema`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// recordbook - a schema-validated record store in a single TOML file
#[derive(Parser, Debug)]
#[command(name = "recordbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only log errors
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Which document, under which schema
#[derive(Args, Debug, Clone, Default)]
pub struct Target {
    /// Path to the TOML document
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Path to a JSON schema file; without it the embedded schema is used
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the document, or re-embed the schema into an existing one
    Init {
        #[command(flatten)]
        target: Target,
    },

    /// Print the schema in effect
    Schema {
        #[command(flatten)]
        target: Target,
    },

    /// Print records matching a filter query
    List {
        #[command(flatten)]
        target: Target,

        /// `field:substring` or a substring searched in every field
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Append a record
    Add {
        #[command(flatten)]
        target: Target,

        /// Field value, repeatable
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Replace a record; unspecified fields keep their current values
    Update {
        #[command(flatten)]
        target: Target,

        /// Position of the record, as printed by `list`
        #[arg(long)]
        index: Option<usize>,

        /// Field value, repeatable
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Remove a record
    Delete {
        #[command(flatten)]
        target: Target,

        /// Position of the record, as printed by `list`
        #[arg(long)]
        index: Option<usize>,
    },

    /// Answer JSON requests from stdin, one per line
    Serve {
        #[command(flatten)]
        target: Target,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Splits `name=value` at the first `=`. The value may be empty.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
