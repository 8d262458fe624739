//! Configuration file
//!
//! ```json
//! { "database": "tasks.toml", "schema": "tasks.schema.json" }
//! ```
//!
//! Relative paths are resolved against the directory holding the
//! configuration file. Explicit `--db`/`--schema` flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::args::Target;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Document path (required)
    pub database: PathBuf,

    /// Schema source path (optional; embedded schema otherwise)
    #[serde(default)]
    pub schema: Option<PathBuf>,
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if let Some(base) = path.parent() {
            config.database = base.join(&config.database);
            config.schema = config.schema.map(|s| base.join(s));
        }

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.database.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(CliError::config_error("database must not be blank"));
        }
        if let Some(schema) = &self.schema {
            if schema.as_os_str().to_string_lossy().trim().is_empty() {
                return Err(CliError::config_error("schema must not be blank when given"));
            }
        }
        Ok(())
    }
}

/// Paths a command works on, after flags and config are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub database: PathBuf,
    pub schema: Option<PathBuf>,
}

impl Target {
    /// Merges flags over the optional configuration file.
    pub fn resolve(&self) -> CliResult<ResolvedTarget> {
        let config = self.config.as_deref().map(Config::load).transpose()?;

        let database = self
            .db
            .clone()
            .or_else(|| config.as_ref().map(|c| c.database.clone()))
            .ok_or_else(|| CliError::usage("No database given; pass --db or --config"))?;
        let schema = self
            .schema
            .clone()
            .or_else(|| config.and_then(|c| c.schema));

        Ok(ResolvedTarget { database, schema })
    }
}
