//! Fitted pipeline state export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::pipeline::FittedPreprocessor;

/// Metadata about the preprocessing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    pub survivor_version: String,
    pub input_file: String,
    /// Rows in the training partition the state was fitted on
    pub training_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_rows: Option<usize>,
}

impl ExportMetadata {
    pub fn new(input_file: &Path, training_rows: usize, test_rows: Option<usize>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            survivor_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            training_rows,
            test_rows,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedStateExport {
    pub metadata: ExportMetadata,
    pub pipeline: FittedPreprocessor,
}

/// Write the fitted preprocessor (configuration, imputation statistics,
/// scaler parameters and column schema) as pretty JSON.
pub fn export_fitted_state(
    output_path: &Path,
    fitted: &FittedPreprocessor,
    metadata: ExportMetadata,
) -> Result<()> {
    let export = FittedStateExport {
        metadata,
        pipeline: fitted.clone(),
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize fitted state to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write fitted state to {}", output_path.display()))?;

    Ok(())
}

/// Read back a file written by [`export_fitted_state`]
pub fn load_fitted_state(path: &Path) -> Result<FittedStateExport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fitted state: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse fitted state: {}", path.display()))
}
