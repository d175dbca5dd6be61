//! Error types for the preprocessing pipeline.
//!
//! Every variant is a data error: it is fatal for the current operation and
//! is surfaced to the caller as-is. Model failures live in
//! [`crate::model::ModelError`] and are never mixed with these.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while turning a raw manifest into feature matrices.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A column the pipeline needs is not in the input frame.
    #[error("Required column '{column}' not found in dataset")]
    MissingColumn {
        /// Name of the absent column
        column: String,
    },

    /// A column that must be fully populated contains a null.
    #[error("Column '{column}' has a missing value at row {row}")]
    NullValue {
        /// Name of the column
        column: String,
        /// Zero-based row position in the filtered input
        row: usize,
    },

    /// The outcome column holds something other than 0 or 1.
    #[error("Outcome at row {row} must be 0 or 1, got {value}")]
    InvalidOutcome {
        /// Zero-based row position in the filtered input
        row: usize,
        /// Offending value
        value: f64,
    },

    /// A stratified split was requested on data without an outcome column,
    /// or with rows whose outcome is unknown.
    #[error("Stratified split requires a complete '{column}' outcome column")]
    MissingTarget {
        /// Name of the outcome column
        column: String,
    },

    /// Not enough rows (or observed values) to compute fitted statistics.
    #[error("Insufficient data: {reason}")]
    InsufficientData {
        /// What was missing
        reason: String,
    },

    /// A user-supplied value is outside its allowed range.
    #[error("Invalid {field}: {value}")]
    OutOfRange {
        /// Field name
        field: String,
        /// Offending value, as entered
        value: String,
    },

    /// Inference was requested before any training call fixed the schema.
    #[error("Preprocessing state has not been fitted; run a training pass first")]
    NotFitted,

    /// Underlying frame operation failed.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    pub(crate) fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }
}

/// Result alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
