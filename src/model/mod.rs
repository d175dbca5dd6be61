//! Model module - classifiers, metrics and evaluation over preprocessed features
//!
//! Models consume dense feature arrays as produced by
//! [`crate::pipeline::FeatureMatrix::to_array`] and 0/1 targets.

pub mod baseline;
pub mod evaluate;
pub mod knn;
pub mod logistic;
pub mod metrics;
pub mod naive_bayes;

use ndarray::{Array1, ArrayView1, ArrayView2};
use thiserror::Error;

pub use baseline::MajorityClass;
pub use evaluate::*;
pub use knn::{KNearestNeighbors, NeighborWeights};
pub use logistic::LogisticRegression;
pub use metrics::*;
pub use naive_bayes::GaussianNaiveBayes;

/// Failures of an individual model. The evaluation sweep records these per
/// model and moves on; they never abort the sweep.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    #[error("{model} has not been fitted")]
    NotFitted { model: String },

    #[error("cannot fit {model} on an empty training set")]
    EmptyTrainingSet { model: String },

    #[error("{model} needs both classes in the training set")]
    SingleClass { model: String },

    #[error("expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("{rows} feature rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("{model} produced invalid scores (NaN)")]
    InvalidScores { model: String },

    #[error("preprocessing failed: {0}")]
    Data(String),
}

/// Binary classifier over a dense feature array (one row per passenger)
pub trait Classifier: Send {
    fn name(&self) -> &str;

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<u8>) -> Result<(), ModelError>;

    /// Probability of the positive class (survived) for each row
    fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError>;

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<u8>, ModelError> {
        Ok(self.predict_proba(x)?.mapv(|p| u8::from(p >= 0.5)))
    }
}

/// A named model constructor supplied by the caller
#[derive(Clone)]
pub struct ModelSpec {
    pub name: String,
    pub build: fn() -> Box<dyn Classifier>,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, build: fn() -> Box<dyn Classifier>) -> Self {
        Self {
            name: name.into(),
            build,
        }
    }

    pub fn instantiate(&self) -> Box<dyn Classifier> {
        (self.build)()
    }
}

impl std::fmt::Debug for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSpec").field("name", &self.name).finish()
    }
}

/// The models evaluated by default, each with default hyperparameters
pub fn default_registry() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new("Majority Class", || Box::new(MajorityClass::default())),
        ModelSpec::new("Logistic Regression", || {
            Box::new(LogisticRegression::default())
        }),
        ModelSpec::new("K-Neighbors", || Box::new(KNearestNeighbors::default())),
        ModelSpec::new("K-Neighbors (distance)", || {
            Box::new(KNearestNeighbors::new(5, NeighborWeights::Distance))
        }),
        ModelSpec::new("Gaussian Naive Bayes", || {
            Box::new(GaussianNaiveBayes::default())
        }),
    ]
}

/// Look up a model in `registry` by case-insensitive name
pub fn find_model<'a>(registry: &'a [ModelSpec], name: &str) -> Option<&'a ModelSpec> {
    registry.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

pub(crate) fn check_training_set(
    model: &str,
    x: &ArrayView2<f64>,
    y: &ArrayView1<u8>,
) -> Result<(), ModelError> {
    if x.nrows() == 0 {
        return Err(ModelError::EmptyTrainingSet {
            model: model.to_string(),
        });
    }
    if x.nrows() != y.len() {
        return Err(ModelError::LengthMismatch {
            rows: x.nrows(),
            targets: y.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_width(expected: usize, x: &ArrayView2<f64>) -> Result<(), ModelError> {
    if x.ncols() == expected {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch {
            expected,
            got: x.ncols(),
        })
    }
}
