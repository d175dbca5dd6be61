//! Manifest loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

use super::columns::{DEFAULT_FARE_THRESHOLD, REQUIRED_COLUMNS};
use super::records::exclude_fare_outliers;

/// Options for [`load_manifest`]
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Rows used for CSV schema inference; 0 means a full scan
    pub infer_schema_length: usize,
    /// Drop rows with a fare at or above `fare_threshold` at load time
    pub drop_outliers: bool,
    pub fare_threshold: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10000,
            drop_outliers: true,
            fare_threshold: DEFAULT_FARE_THRESHOLD,
        }
    }
}

/// Shape and size of a loaded dataset
#[derive(Debug, Clone, Copy)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    pub memory_mb: f64,
}

/// Load a dataset lazily from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Load the passenger manifest, verify its columns and optionally drop fare outliers.
pub fn load_manifest(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let df = load_dataset(path, options.infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    verify_manifest_columns(&df)?;

    if options.drop_outliers {
        let before = df.height();
        let df = exclude_fare_outliers(&df, options.fare_threshold)?;
        tracing::debug!(
            dropped = before - df.height(),
            threshold = options.fare_threshold,
            "Dropped fare outliers at load"
        );
        return Ok(df);
    }

    Ok(df)
}

/// Fail with the list of available columns if any required column is absent
pub fn verify_manifest_columns(df: &DataFrame) -> Result<()> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !column_names.iter().any(|n| n == c))
        .collect();

    if !missing.is_empty() {
        anyhow::bail!(
            "Dataset is missing required column(s) {:?}. Available columns: {:?}",
            missing,
            column_names
        );
    }
    Ok(())
}

/// Read only the column names of a dataset
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let schema = load_dataset(path, 100)?
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|n| n.to_string()).collect())
}

/// Row/column counts and estimated in-memory size
pub fn dataset_stats(df: &DataFrame) -> DatasetStats {
    let (rows, columns) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    DatasetStats {
        rows,
        columns,
        memory_mb,
    }
}
