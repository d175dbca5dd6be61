//! L2-regularised logistic regression trained by batch gradient descent

use ndarray::{Array1, ArrayView1, ArrayView2};

use super::{check_training_set, check_width, Classifier, ModelError};

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// L2 penalty on the weights (the intercept is not penalised)
    pub alpha: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once the gradient norm drops below this
    pub tol: f64,
    weights: Option<Array1<f64>>,
    intercept: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(0.01, 0.1, 1000)
    }
}

impl LogisticRegression {
    pub fn new(alpha: f64, learning_rate: f64, max_iter: usize) -> Self {
        Self {
            alpha,
            learning_rate,
            max_iter,
            tol: 1e-6,
            weights: None,
            intercept: 0.0,
        }
    }

    pub fn weights(&self) -> Option<ArrayView1<f64>> {
        self.weights.as_ref().map(|w| w.view())
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "Logistic Regression"
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<u8>) -> Result<(), ModelError> {
        check_training_set(self.name(), &x, &y)?;
        let n = x.nrows() as f64;
        let targets = y.mapv(f64::from);

        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut intercept = 0.0;

        for _ in 0..self.max_iter {
            let errors = (x.dot(&weights) + intercept).mapv(sigmoid) - &targets;
            let grad = x.t().dot(&errors) / n + self.alpha * &weights;
            let grad_b = errors.sum() / n;

            let norm = (grad.dot(&grad) + grad_b * grad_b).sqrt();
            if norm < self.tol {
                break;
            }

            weights.scaled_add(-self.learning_rate, &grad);
            intercept -= self.learning_rate * grad_b;
        }

        if weights.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
            return Err(ModelError::InvalidScores {
                model: self.name().to_string(),
            });
        }

        self.weights = Some(weights);
        self.intercept = intercept;
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.weights.as_ref().ok_or_else(|| ModelError::NotFitted {
            model: self.name().to_string(),
        })?;
        check_width(weights.len(), &x)?;
        Ok((x.dot(weights) + self.intercept).mapv(sigmoid))
    }
}
