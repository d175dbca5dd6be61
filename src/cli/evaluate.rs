//! `evaluate` subcommand

use std::path::Path;

use anyhow::{Context, Result};
use ndarray::ArrayView1;
use serde::Serialize;

use super::workflow::{load_with_spinner, training_set};
use crate::model::{default_registry, evaluate_holdout, find_model, sweep, HoldoutEvaluation, SweepOutcome};
use crate::pipeline::{LoadOptions, Session};
use crate::report::{EvaluationSummary, HoldoutReport};
use crate::utils::{create_spinner, finish_with_success, finish_with_warning, print_step_header, print_success};

#[derive(Serialize)]
struct EvaluationExport<'a> {
    seed: u64,
    folds: usize,
    cross_validation: &'a SweepOutcome,
    holdout: &'a HoldoutEvaluation,
}

pub fn run_evaluate(
    session: &Session,
    path: &Path,
    options: &LoadOptions,
    folds: usize,
    export: Option<&Path>,
) -> Result<()> {
    print_step_header(1, "Load Manifest");
    let raw = load_with_spinner(path, options)?;

    print_step_header(2, "Preprocess");
    let training = training_set(session, &raw)?;
    print_success(&format!(
        "{} training rows, {} features",
        training.y.len(),
        training.prepared.train.width()
    ));

    print_step_header(3, "Cross-Validation");
    let registry = default_registry();
    let spinner = create_spinner(&format!("Cross-validating {} models...", registry.len()));
    let outcome = sweep(
        &registry,
        training.x.view(),
        training.y.view(),
        folds,
        session.seed(),
    );
    if outcome.failures.is_empty() {
        finish_with_success(&spinner, "Cross-validation complete");
    } else {
        finish_with_warning(
            &spinner,
            &format!("{} model(s) failed", outcome.failures.len()),
        );
    }
    EvaluationSummary::new(&outcome, folds, session.seed()).display();

    print_step_header(4, "Hold-Out Evaluation");
    let best = outcome
        .best()
        .context("Every model failed cross-validation")?;
    let spec = find_model(&registry, &best.model).context("Best model missing from registry")?;

    let test = training
        .prepared
        .test
        .as_ref()
        .context("Split pass produced no test partition")?;
    let test_y = training
        .prepared
        .test_target
        .as_deref()
        .context("Test partition has no outcome")?;
    let test_x = test.to_array()?;
    let holdout = evaluate_holdout(
        spec,
        training.x.view(),
        training.y.view(),
        test_x.view(),
        ArrayView1::from(test_y),
    )
    .with_context(|| format!("Hold-out evaluation of {} failed", spec.name))?;
    HoldoutReport::new(&holdout).display();

    if let Some(export_path) = export {
        let json = serde_json::to_string_pretty(&EvaluationExport {
            seed: session.seed(),
            folds,
            cross_validation: &outcome,
            holdout: &holdout,
        })
        .context("Failed to serialize evaluation to JSON")?;
        std::fs::write(export_path, json).with_context(|| {
            format!("Failed to write evaluation to {}", export_path.display())
        })?;
        println!();
        print_success(&format!("Saved {}", export_path.display()));
    }

    Ok(())
}
