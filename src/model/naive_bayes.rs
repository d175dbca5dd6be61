//! Gaussian naive Bayes

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use super::{check_training_set, check_width, Classifier, ModelError};

#[derive(Debug, Clone)]
struct ClassStats {
    log_prior: f64,
    /// Sum over features of the Gaussian log normalising constants
    log_norm: f64,
    means: Array1<f64>,
    variances: Array1<f64>,
}

impl ClassStats {
    fn log_likelihood(&self, row: ArrayView1<f64>) -> f64 {
        let diff = &row - &self.means;
        let quad = (&diff * &diff / &self.variances).sum();
        self.log_prior + self.log_norm - 0.5 * quad
    }
}

#[derive(Debug, Clone)]
pub struct GaussianNaiveBayes {
    /// Fraction of the largest feature variance added to every variance
    pub var_smoothing: f64,
    classes: Option<[ClassStats; 2]>,
}

impl Default for GaussianNaiveBayes {
    fn default() -> Self {
        Self {
            var_smoothing: 1e-9,
            classes: None,
        }
    }
}

impl GaussianNaiveBayes {
    fn class_stats(
        &self,
        x: &ArrayView2<f64>,
        y: &ArrayView1<u8>,
        label: u8,
        epsilon: f64,
    ) -> Result<ClassStats, ModelError> {
        let indices: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, &t)| t == label)
            .map(|(i, _)| i)
            .collect();
        let single_class = || ModelError::SingleClass {
            model: self.name().to_string(),
        };
        if indices.is_empty() {
            return Err(single_class());
        }

        let rows = x.select(Axis(0), &indices);
        let means = rows.mean_axis(Axis(0)).ok_or_else(single_class)?;
        let variances = rows.var_axis(Axis(0), 0.0) + epsilon;
        let log_norm = -0.5 * variances.mapv(|v| (2.0 * PI * v).ln()).sum();

        Ok(ClassStats {
            log_prior: (indices.len() as f64 / x.nrows() as f64).ln(),
            log_norm,
            means,
            variances,
        })
    }
}

impl Classifier for GaussianNaiveBayes {
    fn name(&self) -> &str {
        "Gaussian Naive Bayes"
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<u8>) -> Result<(), ModelError> {
        check_training_set(self.name(), &x, &y)?;

        let largest = x.var_axis(Axis(0), 0.0).fold(0.0, |acc: f64, &v| acc.max(v));
        let epsilon = self.var_smoothing * largest;
        let epsilon = if epsilon > 0.0 { epsilon } else { self.var_smoothing };

        let negative = self.class_stats(&x, &y, 0, epsilon)?;
        let positive = self.class_stats(&x, &y, 1, epsilon)?;
        self.classes = Some([negative, positive]);
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let [negative, positive] = self.classes.as_ref().ok_or_else(|| ModelError::NotFitted {
            model: self.name().to_string(),
        })?;
        check_width(negative.means.len(), &x)?;

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let l0 = negative.log_likelihood(row);
                let l1 = positive.log_likelihood(row);
                // Logistic of the log-odds keeps this stable for large gaps
                1.0 / (1.0 + (l0 - l1).exp())
            })
            .collect())
    }
}
