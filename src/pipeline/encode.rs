//! One-hot encoding with fixed reference levels
//!
//! Levels are expanded in sorted order. The reference indicator of each
//! field (`Sex_female`, `Embarked_C`) is removed after expansion rather than
//! dropping "the first observed level", so a partition that happens to hold
//! a single level still drops the same column as the training partition.

use std::collections::BTreeSet;

use super::columns::REFERENCE_INDICATORS;

/// Name of the indicator column for `level` of `column`
pub fn indicator_name(column: &str, level: &str) -> String {
    format!("{}_{}", column, level)
}

/// Expand `values` into one 0/1 column per observed level, in sorted level order.
pub fn one_hot(column: &str, values: &[&str]) -> Vec<(String, Vec<f64>)> {
    let levels: BTreeSet<&str> = values.iter().copied().collect();

    levels
        .into_iter()
        .map(|level| {
            let indicator = values
                .iter()
                .map(|v| if *v == level { 1.0 } else { 0.0 })
                .collect();
            (indicator_name(column, level), indicator)
        })
        .collect()
}

/// Like [`one_hot`], minus the reference indicators
pub fn one_hot_without_reference(column: &str, values: &[&str]) -> Vec<(String, Vec<f64>)> {
    one_hot(column, values)
        .into_iter()
        .filter(|(name, _)| !is_reference_indicator(name))
        .collect()
}

pub fn is_reference_indicator(name: &str) -> bool {
    REFERENCE_INDICATORS.contains(&name)
}
