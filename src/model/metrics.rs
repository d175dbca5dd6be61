//! Binary classification metrics

use serde::Serialize;

/// Counts of predictions against truth, positive class = survived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(truth: &[u8], predicted: &[u8]) -> Self {
        let mut m = Self::default();
        for (&t, &p) in truth.iter().zip(predicted) {
            match (t, p) {
                (1, 1) => m.true_positive += 1,
                (1, _) => m.false_negative += 1,
                (_, 1) => m.false_positive += 1,
                _ => m.true_negative += 1,
            }
        }
        m
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_negative + self.true_positive, self.total())
    }

    /// Recall of the positive class (sensitivity)
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// Recall of the negative class (specificity)
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negative, self.true_negative + self.false_positive)
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn balanced_accuracy(&self) -> f64 {
        (self.recall() + self.specificity()) / 2.0
    }

    pub fn f1(&self) -> f64 {
        harmonic(self.precision(), self.recall())
    }
}

/// Precision, recall, F1 and support of one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: &'static str,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics for "Died" (0) and "Survived" (1)
pub fn classification_report(truth: &[u8], predicted: &[u8]) -> Vec<ClassMetrics> {
    let m = ConfusionMatrix::from_predictions(truth, predicted);
    let died_precision = ratio(m.true_negative, m.true_negative + m.false_negative);
    vec![
        ClassMetrics {
            label: "Died",
            precision: died_precision,
            recall: m.specificity(),
            f1: harmonic(died_precision, m.specificity()),
            support: m.true_negative + m.false_positive,
        },
        ClassMetrics {
            label: "Survived",
            precision: m.precision(),
            recall: m.recall(),
            f1: m.f1(),
            support: m.true_positive + m.false_negative,
        },
    ]
}

pub fn balanced_accuracy(truth: &[u8], predicted: &[u8]) -> f64 {
    ConfusionMatrix::from_predictions(truth, predicted).balanced_accuracy()
}

pub fn f1_score(truth: &[u8], predicted: &[u8]) -> f64 {
    ConfusionMatrix::from_predictions(truth, predicted).f1()
}

/// Area under the ROC curve via the Mann-Whitney U statistic.
///
/// Tied scores share their average rank. Returns `None` when either class is
/// absent, where the area is undefined.
pub fn roc_auc(truth: &[u8], scores: &[f64]) -> Option<f64> {
    let mut pairs: Vec<(f64, u8)> = scores.iter().copied().zip(truth.iter().copied()).collect();
    let positives = pairs.iter().filter(|(_, t)| *t == 1).count() as f64;
    let negatives = pairs.len() as f64 - positives;
    if positives == 0.0 || negatives == 0.0 {
        return None;
    }

    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n = pairs.len();
    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && pairs[j].0 == pairs[i].0 {
            j += 1;
        }
        // Ranks are 1-based; the tie group spans ranks i+1..=j
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        let group_pos = pairs[i..j].iter().filter(|(_, t)| *t == 1).count() as f64;
        rank_sum_pos += avg_rank * group_pos;
        i = j;
    }

    let u = rank_sum_pos - positives * (positives + 1.0) / 2.0;
    Some(u / (positives * negatives))
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn harmonic(a: f64, b: f64) -> f64 {
    if a + b == 0.0 {
        0.0
    } else {
        2.0 * a * b / (a + b)
    }
}
