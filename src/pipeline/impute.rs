//! Missing-value imputation: median age and most frequent embarkation port

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{PipelineError, Result};
use super::records::Passenger;

/// Imputation statistics computed from a training partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputation {
    pub age_median: f64,
    pub embarked_mode: String,
}

impl Imputation {
    /// Compute the median age and modal port of `passengers`.
    ///
    /// Fails when the partition has no observed age or no observed port,
    /// since either statistic would be undefined.
    pub fn fit(passengers: &[Passenger]) -> Result<Self> {
        let age_median = median(passengers.iter().filter_map(|p| p.age)).ok_or_else(|| {
            PipelineError::insufficient("no observed ages in the training partition")
        })?;
        let embarked_mode = mode(passengers.iter().filter_map(|p| p.embarked.as_deref()))
            .ok_or_else(|| {
                PipelineError::insufficient("no observed embarkation ports in the training partition")
            })?;

        Ok(Self {
            age_median,
            embarked_mode,
        })
    }

    /// Age and port for `passenger`, falling back to the fitted statistics
    pub fn fill<'a>(&'a self, passenger: &'a Passenger) -> (f64, &'a str) {
        let age = passenger.age.unwrap_or(self.age_median);
        let port = passenger
            .embarked
            .as_deref()
            .unwrap_or(self.embarked_mode.as_str());
        (age, port)
    }
}

/// Median of the finite values, averaging the two middle values for even counts
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value; ties resolve to the lexicographically smallest.
pub fn mode<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    // BTreeMap iterates in key order, so the first maximum wins ties
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}
