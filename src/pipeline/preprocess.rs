//! The preprocessing pipeline
//!
//! A raw manifest goes through, in order:
//! 1. fare outlier exclusion
//! 2. identifier column pruning
//! 3. `Family` / `IsAlone` feature engineering
//! 4. outcome extraction
//! 5. optional stratified train/test partitioning
//! 6. median age / modal port imputation from the training partition
//! 7. standard scaling fitted on the training partition
//! 8. one-hot encoding with fixed reference levels
//! 9. reindexing to the training column schema
//!
//! [`Preprocessor`] runs the first, fitting pass and hands back a
//! [`FittedPreprocessor`]. Every later pass goes through the fitted value,
//! which never refits and always emits the training schema.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::columns::*;
use super::encode::one_hot_without_reference;
use super::error::{PipelineError, Result};
use super::impute::Imputation;
use super::matrix::FeatureMatrix;
use super::records::{Passenger, Records};
use super::scaler::StandardScaler;
use super::split::stratified_split;

/// Whether a pass partitions its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Stratified train/test partition; requires the outcome column
    Split,
    /// The whole input is a single partition
    Whole,
}

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Rows with a fare at or above this value are excluded
    pub fare_threshold: f64,
    /// Fraction of rows held out in split mode
    pub test_size: f64,
    /// Seed for the stratified split
    pub seed: u64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            fare_threshold: DEFAULT_FARE_THRESHOLD,
            test_size: 0.2,
            seed: 0,
        }
    }
}

impl PreprocessConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Output of one pipeline pass.
///
/// `train` is the training partition in split mode and the whole input
/// otherwise. Targets, when present, are aligned row-for-row with their
/// matrices.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub train: FeatureMatrix,
    pub test: Option<FeatureMatrix>,
    pub train_target: Option<Vec<u8>>,
    pub test_target: Option<Vec<u8>>,
}

/// Statistics fitted on the first training partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedState {
    pub imputation: Imputation,
    pub scaler: StandardScaler,
}

/// Unfitted pipeline: the only way to obtain a [`FittedPreprocessor`]
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

/// Pipeline with frozen imputation statistics, scaler and column schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    config: PreprocessConfig,
    state: FittedState,
    columns: Vec<String>,
}

struct Partition {
    passengers: Vec<Passenger>,
    target: Option<Vec<u8>>,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Run the fitting pass.
    ///
    /// Imputation statistics and the scaler are fitted on the training
    /// partition (or the whole input in [`SplitMode::Whole`]); the training
    /// matrix's columns become the schema for every later pass.
    pub fn preprocess(
        &self,
        raw: &DataFrame,
        mode: SplitMode,
    ) -> Result<(FittedPreprocessor, Prepared)> {
        let records = Records::extract(raw, self.config.fare_threshold)?;
        let (train, test) = partition(records, mode, &self.config)?;

        let imputation = Imputation::fit(&train.passengers)?;
        let numeric = numeric_columns(&train.passengers, &imputation);
        let scaler = StandardScaler::fit(numeric.iter().map(|(n, v)| (*n, v.as_slice())))?;

        debug!(
            age_median = imputation.age_median,
            embarked_mode = %imputation.embarked_mode,
            "Fitted imputation statistics"
        );

        let state = FittedState { imputation, scaler };
        let train_matrix = build_matrix(&train.passengers, &state)?;
        let columns = train_matrix.column_names();

        let fitted = FittedPreprocessor {
            config: self.config.clone(),
            state,
            columns,
        };

        let (test_matrix, test_target) = match test {
            Some(t) => (Some(fitted.encode(&t.passengers)?), t.target),
            None => (None, None),
        };

        let prepared = Prepared {
            train: train_matrix,
            test: test_matrix,
            train_target: train.target,
            test_target,
        };

        Ok((fitted, prepared))
    }
}

impl FittedPreprocessor {
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    pub fn state(&self) -> &FittedState {
        &self.state
    }

    /// Column schema fixed by the fitting pass
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Run a pass with the frozen state; nothing is refitted.
    pub fn preprocess(&self, raw: &DataFrame, mode: SplitMode) -> Result<Prepared> {
        let records = Records::extract(raw, self.config.fare_threshold)?;
        let (train, test) = partition(records, mode, &self.config)?;

        let train_matrix = self.encode(&train.passengers)?;
        let (test_matrix, test_target) = match test {
            Some(t) => (Some(self.encode(&t.passengers)?), t.target),
            None => (None, None),
        };

        Ok(Prepared {
            train: train_matrix,
            test: test_matrix,
            train_target: train.target,
            test_target,
        })
    }

    /// Whole-input pass, as used for batch and single-passenger inference
    pub fn transform(&self, raw: &DataFrame) -> Result<FeatureMatrix> {
        Ok(self.preprocess(raw, SplitMode::Whole)?.train)
    }

    fn encode(&self, passengers: &[Passenger]) -> Result<FeatureMatrix> {
        build_matrix(passengers, &self.state)?.reindex(&self.columns)
    }
}

fn partition(
    records: Records,
    mode: SplitMode,
    config: &PreprocessConfig,
) -> Result<(Partition, Option<Partition>)> {
    if records.is_empty() {
        return Err(PipelineError::insufficient(format!(
            "no rows left after excluding fares >= {}",
            config.fare_threshold
        )));
    }

    match mode {
        SplitMode::Whole => {
            let target = records.complete_outcome();
            Ok((
                Partition {
                    passengers: records.passengers,
                    target,
                },
                None,
            ))
        }
        SplitMode::Split => {
            let target = match &records.outcome {
                Some(outcome) => outcome.iter().copied().collect::<Option<Vec<u8>>>(),
                None => None,
            }
            .ok_or_else(|| PipelineError::MissingTarget {
                column: SURVIVED.to_string(),
            })?;

            let split = stratified_split(&target, config.test_size, config.seed)?;
            info!(
                train_rows = split.train.len(),
                test_rows = split.test.len(),
                seed = config.seed,
                "Stratified split"
            );

            let pick = |indices: &[usize]| Partition {
                passengers: indices
                    .iter()
                    .map(|&i| records.passengers[i].clone())
                    .collect(),
                target: Some(indices.iter().map(|&i| target[i]).collect()),
            };

            Ok((pick(&split.train), Some(pick(&split.test))))
        }
    }
}

/// Raw (imputed, unscaled) numeric columns in scaler order
fn numeric_columns(
    passengers: &[Passenger],
    imputation: &Imputation,
) -> Vec<(&'static str, Vec<f64>)> {
    SCALED_COLUMNS
        .iter()
        .map(|&name| {
            let values = passengers
                .iter()
                .map(|p| match name {
                    AGE => imputation.fill(p).0,
                    FARE => p.fare,
                    SIBSP => p.sibsp,
                    PARCH => p.parch,
                    PCLASS => p.pclass,
                    _ => p.family(),
                })
                .collect();
            (name, values)
        })
        .collect()
}

/// Encode passengers with the given state, in natural column order:
/// the manifest's numeric columns, the engineered columns, then indicators.
fn build_matrix(passengers: &[Passenger], state: &FittedState) -> Result<FeatureMatrix> {
    let mut numeric = numeric_columns(passengers, &state.imputation);
    for (name, values) in numeric.iter_mut() {
        let scaled = state
            .scaler
            .transform(name, values)
            .ok_or(PipelineError::NotFitted)?;
        *values = scaled;
    }

    let scaled = |name: &str| -> Vec<f64> {
        numeric
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };

    let mut columns: Vec<(String, Vec<f64>)> = [PCLASS, AGE, SIBSP, PARCH, FARE, FAMILY]
        .iter()
        .map(|&name| (name.to_string(), scaled(name)))
        .collect();
    columns.push((
        IS_ALONE.to_string(),
        passengers.iter().map(Passenger::is_alone).collect(),
    ));

    let sexes: Vec<&str> = passengers.iter().map(|p| p.sex.as_str()).collect();
    let ports: Vec<&str> = passengers
        .iter()
        .map(|p| state.imputation.fill(p).1)
        .collect();
    columns.extend(one_hot_without_reference(SEX, &sexes));
    columns.extend(one_hot_without_reference(EMBARKED, &ports));

    let ids = passengers.iter().map(|p| p.id).collect();
    FeatureMatrix::from_columns(ids, columns)
}
