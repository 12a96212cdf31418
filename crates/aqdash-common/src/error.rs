//! Error types and utilities for aqdash

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for aqdash operations
pub type Result<T> = std::result::Result<T, AqError>;

/// Main error type for aqdash operations
#[derive(Error, Debug)]
pub enum AqError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input dataset does not exist
    #[error("Input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Low-level CSV reader errors (malformed quoting, ragged rows, bad UTF-8)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the CSV header
    #[error("Schema error: missing required column '{column}'")]
    Schema { column: String },

    /// A field could not be converted to the column's type
    #[error("Parse error at row {row}, column '{column}': cannot parse {value:?}")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// The CSV had a header but no data rows
    #[error("Dataset is empty: {}", path.display())]
    EmptyDataset { path: PathBuf },

    /// Not enough observations for an analysis step
    #[error("Insufficient data: {message} (required {required}, got {actual})")]
    InsufficientData {
        message: String,
        required: usize,
        actual: usize,
    },

    /// A series contains missing observations the analysis cannot handle
    #[error("Missing values: {message}")]
    MissingValues {
        message: String,
        date: Option<chrono::NaiveDate>,
    },

    /// Other analysis failures
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AqError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a file-not-found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a schema error for a missing column
    pub fn schema(column: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
        }
    }

    /// Create a parse error for one field
    pub fn parse(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            row,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create an insufficient data error
    pub fn insufficient_data(msg: impl Into<String>, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            message: msg.into(),
            required,
            actual,
        }
    }

    /// Create a missing values error, optionally pinned to a day
    pub fn missing_values(msg: impl Into<String>, date: Option<chrono::NaiveDate>) -> Self {
        Self::MissingValues {
            message: msg.into(),
            date,
        }
    }

    /// Create a new analysis error
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis {
            message: msg.into(),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to AqError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for AqError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
