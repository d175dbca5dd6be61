//! Majority-class baseline

use ndarray::{Array1, ArrayView1, ArrayView2};

use super::{check_training_set, check_width, Classifier, ModelError};

/// Always predicts the training set's survival rate
#[derive(Debug, Clone, Default)]
pub struct MajorityClass {
    positive_rate: Option<f64>,
    width: usize,
}

impl Classifier for MajorityClass {
    fn name(&self) -> &str {
        "Majority Class"
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<u8>) -> Result<(), ModelError> {
        check_training_set(self.name(), &x, &y)?;
        let positives = y.iter().filter(|&&v| v == 1).count();
        self.positive_rate = Some(positives as f64 / y.len() as f64);
        self.width = x.ncols();
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let rate = self.positive_rate.ok_or_else(|| ModelError::NotFitted {
            model: self.name().to_string(),
        })?;
        check_width(self.width, &x)?;
        Ok(Array1::from_elem(x.nrows(), rate))
    }

    // Ties go to the negative class
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<u8>, ModelError> {
        Ok(self.predict_proba(x)?.mapv(|p| u8::from(p > 0.5)))
    }
}
