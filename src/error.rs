//! Error types for the forecast-diagnostics library.

use thiserror::Error;

/// Result type alias for diagnostic operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while evaluating or diagnosing forecasts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty (or empty after dropping missing pairs).
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Frequency inference failed.
    #[error("could not infer frequency: {0}")]
    FrequencyInference(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// No column with the given name.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Operation is declared but has no implementation.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Figure rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// Malformed input while reading tabular data.
    #[error("parse error: {0}")]
    Parse(String),

    /// Underlying reader or writer failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Io(err.to_string())
    }
}
