//! JSON output for CLI commands
//!
//! Command output goes to stdout, one JSON object per line. Logs go to
//! stderr, so stdout can be piped straight into another tool.

use std::io::{self, Write};

use crate::api::Response;

use super::errors::CliResult;

/// Write one response line to stdout
pub fn write_response(response: &Response) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", response.to_json())?;
    stdout.flush()?;
    Ok(())
}
