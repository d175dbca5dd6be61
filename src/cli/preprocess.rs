//! `preprocess` subcommand

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::workflow::load_with_spinner;
use crate::pipeline::{FeatureMatrix, LoadOptions, Session, SplitMode};
use crate::report::{export_fitted_state, ExportMetadata};
use crate::utils::{create_spinner, finish_with_success, print_info, print_step_header, print_success};

pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";
pub const STATE_FILE: &str = "fitted_state.json";

fn write_matrix(matrix: &FeatureMatrix, target: Option<&[u8]>, path: &Path) -> Result<()> {
    let mut df = matrix.to_frame_with_target(target)?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

pub fn run_preprocess(
    session: &Session,
    path: &Path,
    options: &LoadOptions,
    output_dir: &Path,
    no_split: bool,
) -> Result<()> {
    print_step_header(1, "Load Manifest");
    let raw = load_with_spinner(path, options)?;

    print_step_header(2, "Preprocess");
    let mode = if no_split {
        SplitMode::Whole
    } else {
        SplitMode::Split
    };
    let spinner = create_spinner("Imputing, scaling and encoding...");
    let prepared = session
        .preprocess(&raw, mode)
        .context("Preprocessing failed")?;
    finish_with_success(
        &spinner,
        &format!("{} feature columns", prepared.train.width()),
    );

    print_info(&format!("Training rows: {}", prepared.train.height()));
    if let Some(test) = &prepared.test {
        print_info(&format!("Test rows: {}", test.height()));
    }
    if prepared.train_target.is_none() {
        print_info("No complete outcome column: matrices are written without Survived");
    }

    print_step_header(3, "Save Results");
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let train_path = output_dir.join(TRAIN_FILE);
    write_matrix(&prepared.train, prepared.train_target.as_deref(), &train_path)?;
    print_success(&format!("Saved {}", train_path.display()));

    if let Some(test) = &prepared.test {
        let test_path = output_dir.join(TEST_FILE);
        write_matrix(test, prepared.test_target.as_deref(), &test_path)?;
        print_success(&format!("Saved {}", test_path.display()));
    }

    let fitted = session
        .fitted()
        .context("Session has no fitted pipeline after preprocessing")?;
    let state_path = output_dir.join(STATE_FILE);
    let metadata = ExportMetadata::new(
        path,
        prepared.train.height(),
        prepared.test.as_ref().map(FeatureMatrix::height),
    );
    export_fitted_state(&state_path, &fitted, metadata)?;
    print_success(&format!("Saved {}", state_path.display()));

    Ok(())
}
