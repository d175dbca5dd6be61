//! Missing value analysis

use anyhow::Result;
use polars::prelude::*;

/// Missing-value count and ratio of one column
#[derive(Debug, Clone, PartialEq)]
pub struct MissingStat {
    pub column: String,
    pub missing: usize,
    pub ratio: f64,
}

/// Analyze missing values in every column of the dataset.
///
/// Returns one entry per column, sorted by missing ratio descending
/// (ties keep column order).
pub fn analyze_missing_values(df: &DataFrame) -> Result<Vec<MissingStat>> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    let mut stats: Vec<MissingStat> = df
        .get_columns()
        .iter()
        .map(|column| {
            let missing = column.null_count();
            MissingStat {
                column: column.name().to_string(),
                missing,
                ratio: missing as f64 / rows,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(std::cmp::Ordering::Equal));

    Ok(stats)
}

/// Columns with at least one missing value
pub fn columns_with_missing(stats: &[MissingStat]) -> Vec<&MissingStat> {
    stats.iter().filter(|s| s.missing > 0).collect()
}
