//! Survival breakdowns for the exploration stage

use anyhow::{Context, Result};
use polars::prelude::*;

use super::columns::SURVIVED;
use super::impute::median;
use super::records::f64_values;

/// Label used for rows whose grouping value is missing
pub const MISSING_LEVEL: &str = "(missing)";

/// Passenger count and survival rate for one group
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalRate {
    /// Group levels, one per grouping column
    pub levels: Vec<String>,
    pub count: usize,
    pub survivors: usize,
}

impl SurvivalRate {
    pub fn rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.survivors as f64 / self.count as f64
        }
    }
}

/// Summary of a numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Survival rate per level of `column`
pub fn survival_by(df: &DataFrame, column: &str) -> Result<Vec<SurvivalRate>> {
    survival_by_columns(df, &[column])
}

/// Survival rate per combination of levels of `a` and `b`
pub fn survival_by_pair(df: &DataFrame, a: &str, b: &str) -> Result<Vec<SurvivalRate>> {
    survival_by_columns(df, &[a, b])
}

fn survival_by_columns(df: &DataFrame, columns: &[&str]) -> Result<Vec<SurvivalRate>> {
    let level_names: Vec<String> = (0..columns.len()).map(|i| format!("level_{}", i)).collect();
    let keys: Vec<Expr> = columns
        .iter()
        .zip(&level_names)
        .map(|(c, alias)| {
            col(*c)
                .cast(DataType::String)
                .fill_null(lit(MISSING_LEVEL))
                .alias(alias.as_str())
        })
        .collect();

    let grouped = df
        .clone()
        .lazy()
        .filter(col(SURVIVED).is_not_null())
        .group_by(keys)
        .agg([
            len().alias("count"),
            col(SURVIVED).cast(DataType::Int64).sum().alias("survivors"),
        ])
        .sort(level_names.clone(), SortMultipleOptions::default())
        .collect()
        .with_context(|| format!("Failed to group survival by {:?}", columns))?;

    let mut level_values: Vec<Vec<Option<String>>> = Vec::with_capacity(columns.len());
    for name in &level_names {
        let values = grouped
            .column(name)?
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect();
        level_values.push(values);
    }
    let counts: Vec<Option<i64>> = grouped
        .column("count")?
        .cast(&DataType::Int64)?
        .i64()?
        .into_iter()
        .collect();
    let survivors: Vec<Option<i64>> = grouped
        .column("survivors")?
        .cast(&DataType::Int64)?
        .i64()?
        .into_iter()
        .collect();

    Ok((0..grouped.height())
        .map(|i| SurvivalRate {
            levels: level_values
                .iter()
                .map(|v| v[i].clone().unwrap_or_else(|| MISSING_LEVEL.to_string()))
                .collect(),
            count: counts[i].unwrap_or(0) as usize,
            survivors: survivors[i].unwrap_or(0) as usize,
        })
        .collect())
}

/// Count, mean, min, median and max of a numeric column, ignoring missing values
pub fn numeric_summary(df: &DataFrame, column: &str) -> Result<NumericSummary> {
    let values = f64_values(df, column)?;
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    let count = observed.len();

    let (mean, min, max) = if count == 0 {
        (f64::NAN, f64::NAN, f64::NAN)
    } else {
        (
            observed.iter().sum::<f64>() / count as f64,
            observed.iter().copied().fold(f64::INFINITY, f64::min),
            observed.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    };

    Ok(NumericSummary {
        column: column.to_string(),
        count,
        missing: values.len() - count,
        mean,
        min,
        median: median(observed.iter().copied()).unwrap_or(f64::NAN),
        max,
    })
}

/// Overall share of survivors among rows with a known outcome.
///
/// A manifest without the outcome column counts zero passengers.
pub fn overall_survival(df: &DataFrame) -> Result<SurvivalRate> {
    if df.column(SURVIVED).is_err() {
        return Ok(SurvivalRate {
            levels: Vec::new(),
            count: 0,
            survivors: 0,
        });
    }
    let outcome = f64_values(df, SURVIVED)?;
    let known: Vec<f64> = outcome.into_iter().flatten().collect();
    Ok(SurvivalRate {
        levels: Vec::new(),
        count: known.len(),
        survivors: known.iter().filter(|&&v| v == 1.0).count(),
    })
}
