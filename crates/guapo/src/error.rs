//! Error types for the Guapo library.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::DataType;

/// A single cell that could not be computed by a numeric operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellError {
    /// Row index (0-based, data rows only).
    pub row: usize,
    /// The cell value as rendered before the operation.
    pub value: String,
    /// Why the computation failed (e.g. "division by zero").
    pub reason: String,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} ('{}'): {}", self.row, self.value, self.reason)
    }
}

/// Main error type for Guapo operations.
#[derive(Debug, Error)]
pub enum GuapoError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Empty file or no lines to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Not enough raw lines to build a table.
    #[error("Insufficient data: {required} line(s) required, found {found}")]
    InsufficientData { required: usize, found: usize },

    /// None of the candidate delimiters split the sample consistently.
    #[error("No delimiter found among candidates {candidates:?}")]
    NoDelimiterFound { candidates: Vec<String> },

    /// A data line split into the wrong number of fields.
    #[error("Line {line} has {found} field(s), expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Operator applied to a column whose declared type it does not accept.
    #[error(
        "{operation} cannot run on column '{column}' (index {index}): expected {expected}, column is {actual}"
    )]
    WrongColumnType {
        operation: String,
        column: String,
        index: usize,
        expected: String,
        actual: DataType,
    },

    /// Unrecognized operator mode or invalid parameter.
    #[error("Invalid option for {operation}: {option}")]
    InvalidOption { operation: String, option: String },

    /// One or more cells could not be computed.
    #[error("{operation} failed on {} cell(s) of column '{column}'{}", .failures.len(), first_failure(.failures))]
    Computation {
        operation: String,
        column: String,
        failures: Vec<CellError>,
    },

    /// Dataset, column or row index out of range.
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Anything that does not fit another category.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

fn first_failure(failures: &[CellError]) -> String {
    failures
        .first()
        .map(|f| format!(" (first: {})", f))
        .unwrap_or_default()
}

/// Coarse error categories a user interface can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientData,
    NoDelimiterFound,
    WrongColumnType,
    InvalidOption,
    ComputationError,
    IndexOutOfRange,
    Io,
    Config,
    Unknown,
}

impl GuapoError {
    /// Map this error onto its user-facing category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GuapoError::EmptyData(_)
            | GuapoError::InsufficientData { .. }
            | GuapoError::RaggedRow { .. } => ErrorKind::InsufficientData,
            GuapoError::NoDelimiterFound { .. } => ErrorKind::NoDelimiterFound,
            GuapoError::WrongColumnType { .. } => ErrorKind::WrongColumnType,
            GuapoError::InvalidOption { .. } => ErrorKind::InvalidOption,
            GuapoError::Computation { .. } => ErrorKind::ComputationError,
            GuapoError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            GuapoError::Io { .. } => ErrorKind::Io,
            GuapoError::Config(_) | GuapoError::Json(_) => ErrorKind::Config,
            GuapoError::Regex(_) | GuapoError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Shorthand for an [`GuapoError::InvalidOption`].
    pub fn invalid_option(operation: impl Into<String>, option: impl Into<String>) -> Self {
        GuapoError::InvalidOption {
            operation: operation.into(),
            option: option.into(),
        }
    }
}

/// Result type alias for Guapo operations.
pub type Result<T> = std::result::Result<T, GuapoError>;
