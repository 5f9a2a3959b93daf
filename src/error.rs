//! Error types shared by the store, the backup manager and the CLI.

use crate::agent::domain::AgentField;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure an agentbook operation can report.
///
/// None of these are fatal to the process; the caller reports the message
/// and keeps its prior state.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An expected file is absent. Callers loading the primary file treat
    /// this as "start with an empty list".
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Malformed JSON or a top-level shape other than an array of objects.
    #[error("Failed to parse {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    /// A single form field failed validation; nothing was written.
    #[error("Invalid {field}: {message}")]
    ValidationError { field: AgentField, message: String },

    /// Filesystem failure while reading, writing or deleting.
    #[error("I/O error on {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize agents: {0}")]
    SerializeError(String),

    #[error("Position {} is out of range (list has {len} agents)", index + 1)]
    IndexOutOfRange { index: usize, len: usize },

    /// A command-line position below 1.
    #[error("Invalid position {0}: positions start at 1")]
    InvalidPosition(usize),

    #[error("No agents to back up")]
    NothingToBackUp,

    #[error("Invalid snapshot id: {0}")]
    InvalidSnapshotId(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ApiError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ApiError::IoError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn validation(field: AgentField, message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field,
            message: message.into(),
        }
    }

    /// True for the "expected file absent" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(e: config::ConfigError) -> Self {
        ApiError::ConfigError(e.to_string())
    }
}
