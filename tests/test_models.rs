//! End-to-end tests: preprocess the manifest, then evaluate the model registry

use ndarray::{Array1, Array2};
use survivor::model::*;
use survivor::pipeline::{PreprocessConfig, Preprocessor, SplitMode};

#[path = "common/mod.rs"]
mod common;

struct Training {
    x: Array2<f64>,
    y: Array1<u8>,
    test_x: Array2<f64>,
    test_y: Array1<u8>,
}

fn training_set(seed: u64) -> Training {
    let raw = common::create_titanic_dataframe();
    let (_, prepared) = Preprocessor::new(PreprocessConfig::default().with_seed(seed))
        .preprocess(&raw, SplitMode::Split)
        .unwrap();
    let test = prepared.test.unwrap();
    Training {
        x: prepared.train.to_array().unwrap(),
        y: Array1::from(prepared.train_target.unwrap()),
        test_x: test.to_array().unwrap(),
        test_y: Array1::from(prepared.test_target.unwrap()),
    }
}

#[test]
fn test_sweep_beats_majority_baseline() {
    let data = training_set(42);
    let registry = default_registry();
    let outcome = sweep(&registry, data.x.view(), data.y.view(), DEFAULT_FOLDS, 42);

    assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
    assert_eq!(outcome.ranked.len(), registry.len());

    let baseline = outcome
        .ranked
        .iter()
        .find(|s| s.model == "Majority Class")
        .unwrap();
    assert!((baseline.balanced_accuracy - 0.5).abs() < 1e-12);

    let best = outcome.best().unwrap();
    assert!(
        best.balanced_accuracy > 0.7,
        "{} only reached {}",
        best.model,
        best.balanced_accuracy
    );
    assert!(best.roc_auc > 0.7);
    for pair in outcome.ranked.windows(2) {
        assert!(pair[0].balanced_accuracy >= pair[1].balanced_accuracy);
    }
}

#[test]
fn test_sweep_is_reproducible() {
    let data = training_set(3);
    let registry = default_registry();
    let a = sweep(&registry, data.x.view(), data.y.view(), 3, 9);
    let b = sweep(&registry, data.x.view(), data.y.view(), 3, 9);
    assert_eq!(a.ranked, b.ranked);
}

#[test]
fn test_holdout_logistic_regression_beats_baseline() {
    let data = training_set(12);
    let registry = default_registry();
    let holdout = |name: &str| {
        let spec = find_model(&registry, name).unwrap();
        evaluate_holdout(
            spec,
            data.x.view(),
            data.y.view(),
            data.test_x.view(),
            data.test_y.view(),
        )
        .unwrap()
    };

    let evaluation = holdout("logistic regression");
    let baseline = holdout("majority class");

    assert_eq!(evaluation.model, "Logistic Regression");
    assert_eq!(evaluation.confusion.total(), data.test_y.len());
    assert!((baseline.balanced_accuracy - 0.5).abs() < 1e-12);
    assert!(
        evaluation.balanced_accuracy > baseline.balanced_accuracy,
        "{} does not beat the baseline",
        evaluation.balanced_accuracy
    );
    assert!(evaluation.roc_auc.unwrap() > 0.7);

    let support: usize = evaluation.report.iter().map(|c| c.support).sum();
    assert_eq!(support, data.test_y.len());
}

#[test]
fn test_unknown_model_name() {
    let registry = default_registry();
    assert!(find_model(&registry, "Random Forest").is_none());
    assert!(find_model(&registry, "k-neighbors").is_some());
}

#[test]
fn test_metrics_hand_computed() {
    let truth = [1, 1, 1, 0, 0, 0, 0, 0];
    let predicted = [1, 1, 0, 0, 0, 0, 1, 0];

    let m = ConfusionMatrix::from_predictions(&truth, &predicted);
    assert_eq!(m.true_positive, 2);
    assert_eq!(m.false_negative, 1);
    assert_eq!(m.false_positive, 1);
    assert_eq!(m.true_negative, 4);

    common::assert_close(
        &[m.recall(), m.specificity(), m.precision()],
        &[2.0 / 3.0, 0.8, 2.0 / 3.0],
        1e-12,
    );
    assert!((balanced_accuracy(&truth, &predicted) - (2.0 / 3.0 + 0.8) / 2.0).abs() < 1e-12);
    assert!((f1_score(&truth, &predicted) - 2.0 / 3.0).abs() < 1e-12);

    // Perfect ranking, then a fully reversed one
    let scores = [0.9, 0.8, 0.7, 0.4, 0.3, 0.2, 0.1, 0.0];
    assert_eq!(roc_auc(&truth, &scores), Some(1.0));
    let reversed: Vec<f64> = scores.iter().map(|s| 1.0 - s).collect();
    assert_eq!(roc_auc(&truth, &reversed), Some(0.0));
    assert_eq!(roc_auc(&[1, 1], &[0.2, 0.9]), None);
}
