//! Cross-validation, the model sweep and hold-out evaluation

use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::metrics::{classification_report, roc_auc, ClassMetrics, ConfusionMatrix};
use super::{Classifier, ModelError, ModelSpec};
use crate::pipeline::stratified_kfold;

pub const DEFAULT_FOLDS: usize = 5;

/// Mean cross-validated scores of one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvScores {
    pub model: String,
    pub balanced_accuracy: f64,
    pub roc_auc: f64,
    pub f1: f64,
    pub folds: usize,
}

/// A model that could not be evaluated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFailure {
    pub model: String,
    pub reason: String,
}

/// Result of evaluating every model in a registry
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepOutcome {
    /// Successful models, best balanced accuracy first
    pub ranked: Vec<CvScores>,
    pub failures: Vec<ModelFailure>,
}

impl SweepOutcome {
    pub fn best(&self) -> Option<&CvScores> {
        self.ranked.first()
    }
}

/// Scores of a model trained on the training partition and scored on the
/// held-out partition
#[derive(Debug, Clone, Serialize)]
pub struct HoldoutEvaluation {
    pub model: String,
    pub balanced_accuracy: f64,
    pub roc_auc: Option<f64>,
    pub confusion: ConfusionMatrix,
    pub report: Vec<ClassMetrics>,
}

/// Instantiate and fit a model
pub fn fit_model(
    spec: &ModelSpec,
    x: ArrayView2<f64>,
    y: ArrayView1<u8>,
) -> Result<Box<dyn Classifier>, ModelError> {
    let mut model = spec.instantiate();
    model.fit(x, y)?;
    Ok(model)
}

/// Stratified k-fold cross-validation of one model
pub fn cross_validate(
    spec: &ModelSpec,
    x: ArrayView2<f64>,
    y: ArrayView1<u8>,
    folds: usize,
    seed: u64,
) -> Result<CvScores, ModelError> {
    if x.nrows() != y.len() {
        return Err(ModelError::LengthMismatch {
            rows: x.nrows(),
            targets: y.len(),
        });
    }
    let splits =
        stratified_kfold(&y.to_vec(), folds, seed).map_err(|e| ModelError::Data(e.to_string()))?;

    let invalid = || ModelError::InvalidScores {
        model: spec.name.clone(),
    };

    let mut totals = (0.0, 0.0, 0.0);
    for split in &splits {
        let train_x = x.select(Axis(0), &split.train);
        let train_y = y.select(Axis(0), &split.train);
        let model = fit_model(spec, train_x.view(), train_y.view())?;

        let test_x = x.select(Axis(0), &split.test);
        let truth = y.select(Axis(0), &split.test).to_vec();
        let scores = model.predict_proba(test_x.view())?;
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(invalid());
        }
        let predicted = model.predict(test_x.view())?.to_vec();

        let confusion = ConfusionMatrix::from_predictions(&truth, &predicted);
        totals.0 += confusion.balanced_accuracy();
        totals.1 += roc_auc(&truth, &scores.to_vec()).ok_or_else(invalid)?;
        totals.2 += confusion.f1();
    }

    let n = splits.len() as f64;
    let scores = CvScores {
        model: spec.name.clone(),
        balanced_accuracy: totals.0 / n,
        roc_auc: totals.1 / n,
        f1: totals.2 / n,
        folds: splits.len(),
    };
    if !(scores.balanced_accuracy.is_finite() && scores.roc_auc.is_finite() && scores.f1.is_finite())
    {
        return Err(invalid());
    }

    debug!(
        model = %scores.model,
        balanced_accuracy = scores.balanced_accuracy,
        roc_auc = scores.roc_auc,
        "Cross-validated"
    );
    Ok(scores)
}

/// Cross-validate every model in parallel.
///
/// A failing model is recorded in [`SweepOutcome::failures`]; the others are
/// still evaluated and ranked by balanced accuracy, ties keeping registry order.
pub fn sweep(
    registry: &[ModelSpec],
    x: ArrayView2<f64>,
    y: ArrayView1<u8>,
    folds: usize,
    seed: u64,
) -> SweepOutcome {
    let results: Vec<Result<CvScores, ModelFailure>> = registry
        .par_iter()
        .map(|spec| {
            cross_validate(spec, x, y, folds, seed).map_err(|e| ModelFailure {
                model: spec.name.clone(),
                reason: e.to_string(),
            })
        })
        .collect();

    let mut outcome = SweepOutcome::default();
    for result in results {
        match result {
            Ok(scores) => outcome.ranked.push(scores),
            Err(failure) => {
                warn!(model = %failure.model, reason = %failure.reason, "Model failed");
                outcome.failures.push(failure);
            }
        }
    }
    outcome
        .ranked
        .sort_by(|a, b| b.balanced_accuracy.total_cmp(&a.balanced_accuracy));
    outcome
}

/// Fit on the training partition and score the held-out partition
pub fn evaluate_holdout(
    spec: &ModelSpec,
    train_x: ArrayView2<f64>,
    train_y: ArrayView1<u8>,
    test_x: ArrayView2<f64>,
    test_y: ArrayView1<u8>,
) -> Result<HoldoutEvaluation, ModelError> {
    if test_x.nrows() != test_y.len() {
        return Err(ModelError::LengthMismatch {
            rows: test_x.nrows(),
            targets: test_y.len(),
        });
    }
    let model = fit_model(spec, train_x, train_y)?;
    let scores = model.predict_proba(test_x)?.to_vec();
    let predicted = model.predict(test_x)?.to_vec();
    let truth = test_y.to_vec();
    let confusion = ConfusionMatrix::from_predictions(&truth, &predicted);

    Ok(HoldoutEvaluation {
        model: spec.name.clone(),
        balanced_accuracy: confusion.balanced_accuracy(),
        roc_auc: roc_auc(&truth, &scores),
        confusion,
        report: classification_report(&truth, &predicted),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogisticRegression, MajorityClass};
    use ndarray::{s, Array1, Array2};

    struct Broken;

    impl Classifier for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn fit(&mut self, _x: ArrayView2<f64>, _y: ArrayView1<u8>) -> Result<(), ModelError> {
            Ok(())
        }

        fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
            Ok(Array1::from_elem(x.nrows(), f64::NAN))
        }
    }

    fn data() -> (Array2<f64>, Array1<u8>) {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| match j {
            0 => ((i % 20) as f64 - 9.5) / 5.8,
            _ => (i / 20) as f64 - 0.5,
        });
        let y = Array1::from_shape_fn(40, |i| u8::from(i % 20 >= 10));
        (x, y)
    }

    #[test]
    fn test_cross_validate_logistic() {
        let (x, y) = data();
        let spec = ModelSpec::new("lr", || Box::new(LogisticRegression::default()));
        let scores = cross_validate(&spec, x.view(), y.view(), 5, 1).unwrap();
        assert_eq!(scores.folds, 5);
        assert!(scores.balanced_accuracy > 0.8);
        assert!(scores.roc_auc > 0.8);
    }

    #[test]
    fn test_sweep_isolates_failures() {
        let (x, y) = data();
        let registry = vec![
            ModelSpec::new("Broken", || Box::new(Broken)),
            ModelSpec::new("Majority", || Box::new(MajorityClass::default())),
            ModelSpec::new("Logistic", || Box::new(LogisticRegression::default())),
        ];
        let outcome = sweep(&registry, x.view(), y.view(), 5, 7);

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].model, "Broken");
        assert_eq!(outcome.ranked.len(), 2);
        assert_eq!(outcome.best().unwrap().model, "Logistic");
        assert_eq!(outcome.ranked[1].balanced_accuracy, 0.5);
    }

    #[test]
    fn test_holdout_evaluation() {
        let (x, y) = data();
        let spec = ModelSpec::new("lr", || Box::new(LogisticRegression::default()));
        let eval = evaluate_holdout(
            &spec,
            x.slice(s![..30, ..]),
            y.slice(s![..30]),
            x.slice(s![30.., ..]),
            y.slice(s![30..]),
        )
        .unwrap();
        assert_eq!(eval.confusion.total(), 10);
        assert_eq!(eval.report.len(), 2);
    }
}
