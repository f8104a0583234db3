//! Error types and result utilities for figure building and export.

use polars::error::PolarsError;
use thiserror::Error;

/// Convenience type alias for results that may contain PlotError
pub type PlotResult<T> = Result<T, PlotError>;

/// Error types that can occur while building, styling or saving figures.
#[derive(Error, Debug)]
pub enum PlotError {
    /// Error raised by the dataframe layer.
    ///
    /// Missing columns and failed casts are reported here unchanged.
    #[error("Data error: {0}")]
    Data(#[from] PolarsError),

    /// Error that occurs when array or column dimensions don't match expected values.
    ///
    /// This happens when a broadcast source doesn't fit the target axis.
    #[error("Dimension mismatch error: {0}")]
    DimensionMismatch(String),

    /// Filesystem error while creating the output directory or writing a figure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error encoding a figure as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlotError {
    /// Creates a dimension mismatch error from any displayable reason.
    pub fn dimension_mismatch(reason: impl Into<String>) -> Self {
        PlotError::DimensionMismatch(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let error = PlotError::dimension_mismatch("expected 3 values, got 4");
        assert!(error.to_string().contains("expected 3 values"));
        assert!(matches!(error, PlotError::DimensionMismatch(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: PlotError = io.into();
        assert!(matches!(error, PlotError::Io(_)));
    }
}
