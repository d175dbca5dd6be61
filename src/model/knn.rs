//! K-nearest neighbours over Euclidean distance

use std::cmp::Ordering;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::{check_training_set, check_width, Classifier, ModelError};

/// How neighbour votes are weighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborWeights {
    #[default]
    Uniform,
    /// Inverse distance; an exact match takes the whole vote
    Distance,
}

#[derive(Debug, Clone)]
pub struct KNearestNeighbors {
    pub k: usize,
    pub weights: NeighborWeights,
    name: String,
    training: Option<(Array2<f64>, Array1<u8>)>,
}

impl Default for KNearestNeighbors {
    fn default() -> Self {
        Self::new(5, NeighborWeights::Uniform)
    }
}

impl KNearestNeighbors {
    pub fn new(k: usize, weights: NeighborWeights) -> Self {
        let name = match weights {
            NeighborWeights::Uniform => "K-Neighbors".to_string(),
            NeighborWeights::Distance => "K-Neighbors (distance)".to_string(),
        };
        Self {
            k: k.max(1),
            weights,
            name,
            training: None,
        }
    }

    fn score_row(&self, x_train: &Array2<f64>, y_train: &Array1<u8>, row: ArrayView1<f64>) -> f64 {
        let diff = x_train - &row;
        let distances = diff.mapv(|d| d * d).sum_axis(Axis(1)).mapv(f64::sqrt);

        let mut neighbors: Vec<(f64, u8)> = distances
            .iter()
            .copied()
            .zip(y_train.iter().copied())
            .collect();
        let k = self.k.min(neighbors.len());
        neighbors.select_nth_unstable_by(k - 1, |a, b| {
            a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal)
        });
        let nearest = &neighbors[..k];

        match self.weights {
            NeighborWeights::Uniform => {
                nearest.iter().filter(|(_, l)| *l == 1).count() as f64 / k as f64
            }
            NeighborWeights::Distance => {
                let exact: Vec<u8> = nearest
                    .iter()
                    .filter(|(d, _)| *d == 0.0)
                    .map(|(_, l)| *l)
                    .collect();
                if !exact.is_empty() {
                    return exact.iter().filter(|&&l| l == 1).count() as f64 / exact.len() as f64;
                }
                let total: f64 = nearest.iter().map(|(d, _)| 1.0 / d).sum();
                let positive: f64 = nearest
                    .iter()
                    .filter(|(_, l)| *l == 1)
                    .map(|(d, _)| 1.0 / d)
                    .sum();
                positive / total
            }
        }
    }
}

impl Classifier for KNearestNeighbors {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<u8>) -> Result<(), ModelError> {
        check_training_set(self.name(), &x, &y)?;
        self.training = Some((x.to_owned(), y.to_owned()));
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let (x_train, y_train) = self.training.as_ref().ok_or_else(|| ModelError::NotFitted {
            model: self.name().to_string(),
        })?;
        check_width(x_train.ncols(), &x)?;
        Ok(x.rows()
            .into_iter()
            .map(|row| self.score_row(x_train, y_train, row))
            .collect())
    }
}
