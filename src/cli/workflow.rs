//! Steps shared by the subcommands

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;

use crate::model::{default_registry, find_model, fit_model, sweep, Classifier, ModelSpec};
use crate::pipeline::{dataset_stats, load_manifest, LoadOptions, Prepared, Session, SplitMode};
use crate::utils::{create_spinner, finish_with_success, print_info};

/// Training rows and targets of a split pass
pub struct TrainingSet {
    pub prepared: Prepared,
    pub x: Array2<f64>,
    pub y: Array1<u8>,
}

pub fn load_with_spinner(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let spinner = create_spinner("Loading manifest...");
    let df = load_manifest(path, options)?;
    let stats = dataset_stats(&df);
    finish_with_success(
        &spinner,
        &format!(
            "Loaded {} rows x {} columns ({:.2} MB)",
            stats.rows, stats.columns, stats.memory_mb
        ),
    );
    Ok(df)
}

/// Run the session's split pass and pull out the training rows
pub fn training_set(session: &Session, raw: &DataFrame) -> Result<TrainingSet> {
    let prepared = session
        .preprocess(raw, SplitMode::Split)
        .context("Preprocessing failed")?;
    let x = prepared.train.to_array()?;
    let y = prepared
        .train_target
        .clone()
        .map(Array1::from)
        .context("Training partition has no outcome")?;
    Ok(TrainingSet { prepared, x, y })
}

/// The named model, or the best cross-validated one when no name is given
pub fn choose_model(name: Option<&str>, training: &TrainingSet, seed: u64) -> Result<ModelSpec> {
    let registry = default_registry();

    if let Some(name) = name {
        return find_model(&registry, name).cloned().with_context(|| {
            let names: Vec<&str> = registry.iter().map(|m| m.name.as_str()).collect();
            format!("Unknown model '{}'. Available models: {:?}", name, names)
        });
    }

    let spinner = create_spinner("Cross-validating models to pick the best...");
    let outcome = sweep(
        &registry,
        training.x.view(),
        training.y.view(),
        crate::model::DEFAULT_FOLDS,
        seed,
    );
    let best = outcome
        .best()
        .context("Every model failed cross-validation")?;
    finish_with_success(
        &spinner,
        &format!(
            "Best model: {} (balanced accuracy {:.4})",
            best.model, best.balanced_accuracy
        ),
    );

    find_model(&registry, &best.model)
        .cloned()
        .context("Best model missing from registry")
}

pub fn train(spec: &ModelSpec, training: &TrainingSet) -> Result<Box<dyn Classifier>> {
    let model = fit_model(spec, training.x.view(), training.y.view())
        .with_context(|| format!("Failed to train {}", spec.name))?;
    print_info(&format!(
        "Trained {} on {} passengers",
        style(&spec.name).cyan(),
        training.y.len()
    ));
    Ok(model)
}
