//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::schema::SchemaError;
use crate::storage::{DocumentError, OpenError};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Missing or contradictory arguments
    Usage,
    /// I/O error (stdin/stdout)
    IoError,
    /// Schema or document could not be opened
    OpenFailed,
    /// Document could not be saved
    SaveFailed,
    /// The request was answered with an error response
    Rejected,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "RB_CLI_CONFIG_ERROR",
            Self::Usage => "RB_CLI_USAGE",
            Self::IoError => "RB_CLI_IO_ERROR",
            Self::OpenFailed => "RB_CLI_OPEN_FAILED",
            Self::SaveFailed => "RB_CLI_SAVE_FAILED",
            Self::Rejected => "RB_CLI_REJECTED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::Usage, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// The response already went to stdout; this only sets the exit status
    pub fn rejected(code: &str) -> Self {
        Self::new(CliErrorCode::Rejected, format!("request failed with {}", code))
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<OpenError> for CliError {
    fn from(e: OpenError) -> Self {
        Self::new(CliErrorCode::OpenFailed, e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        OpenError::from(e).into()
    }
}

impl From<DocumentError> for CliError {
    fn from(e: DocumentError) -> Self {
        Self::new(CliErrorCode::SaveFailed, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_keeps_underlying_code() {
        let err: CliError = DocumentError::empty().into();
        assert_eq!(err.code(), &CliErrorCode::SaveFailed);

        let err: CliError = OpenError::from(DocumentError::empty()).into();
        assert_eq!(err.code_str(), "RB_CLI_OPEN_FAILED");
        assert!(err.message().starts_with("RB_DOCUMENT_EMPTY"));
    }
}
