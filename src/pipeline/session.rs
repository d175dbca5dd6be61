//! Session-scoped, fit-once preprocessing state

use std::sync::Arc;

use parking_lot::Mutex;
use polars::prelude::DataFrame;
use tracing::debug;

use super::error::{PipelineError, Result};
use super::matrix::FeatureMatrix;
use super::preprocess::{FittedPreprocessor, PreprocessConfig, Prepared, Preprocessor, SplitMode};

/// One pass through the workflow.
///
/// The first [`Session::preprocess`] call fits the pipeline; every later call
/// in the same session reuses it. The fit runs under the session lock, so two
/// concurrent first calls cannot both fit. Sessions never share state.
#[derive(Debug)]
pub struct Session {
    config: PreprocessConfig,
    fitted: Mutex<Option<Arc<FittedPreprocessor>>>,
}

impl Session {
    pub fn new(config: PreprocessConfig) -> Self {
        Self {
            config,
            fitted: Mutex::new(None),
        }
    }

    /// A session whose pipeline was fitted elsewhere, e.g. restored from an
    /// exported state. Every pass reuses it; nothing is refitted.
    pub fn with_fitted(fitted: FittedPreprocessor) -> Self {
        Self {
            config: fitted.config().clone(),
            fitted: Mutex::new(Some(Arc::new(fitted))),
        }
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// The fitted pipeline, if a training pass has run
    pub fn fitted(&self) -> Option<Arc<FittedPreprocessor>> {
        self.fitted.lock().clone()
    }

    /// Run a pass, fitting on the first call of the session.
    pub fn preprocess(&self, raw: &DataFrame, mode: SplitMode) -> Result<Prepared> {
        let mut guard = self.fitted.lock();
        if let Some(fitted) = guard.as_ref() {
            let fitted = Arc::clone(fitted);
            drop(guard);
            return fitted.preprocess(raw, mode);
        }

        let (fitted, prepared) = Preprocessor::new(self.config.clone()).preprocess(raw, mode)?;
        debug!(columns = ?fitted.columns(), "Session pipeline fitted");
        *guard = Some(Arc::new(fitted));
        Ok(prepared)
    }

    /// Inference-only pass; fails if no training pass has fixed the schema.
    pub fn transform(&self, raw: &DataFrame) -> Result<FeatureMatrix> {
        let fitted = self.fitted().ok_or(PipelineError::NotFitted)?;
        fitted.transform(raw)
    }
}
