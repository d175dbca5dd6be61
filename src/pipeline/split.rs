//! Seeded stratified partitioning: a single train/test split and k-fold

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::{PipelineError, Result};

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Group row indices by class label, in label order
fn indices_by_class(target: &[u8]) -> BTreeMap<u8, Vec<usize>> {
    let mut classes: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (i, &label) in target.iter().enumerate() {
        classes.entry(label).or_default().push(i);
    }
    classes
}

/// Split rows into train and test so each class keeps its proportion.
///
/// Each class contributes `round(test_size * class_count)` rows to the test
/// side, clamped so both sides receive at least one row of every class.
/// The same `seed` always produces the same partition, and both sides are
/// returned in shuffled order.
pub fn stratified_split(target: &[u8], test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PipelineError::insufficient(format!(
            "test size must be in (0, 1), got {}",
            test_size
        )));
    }

    let classes = indices_by_class(target);
    if let Some((label, rows)) = classes.iter().find(|(_, rows)| rows.len() < 2) {
        return Err(PipelineError::insufficient(format!(
            "class {} has {} row(s); at least 2 are needed to stratify",
            label,
            rows.len()
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(target.len());
    let mut test = Vec::new();

    for (_, mut rows) in classes {
        rows.shuffle(&mut rng);
        let n = rows.len();
        let n_test = ((n as f64) * test_size).round().clamp(1.0, (n - 1) as f64) as usize;
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(SplitIndices { train, test })
}

/// Stratified k-fold: every class is dealt round-robin across the folds
/// after a seeded shuffle, so fold sizes differ by at most one.
pub fn stratified_kfold(target: &[u8], folds: usize, seed: u64) -> Result<Vec<SplitIndices>> {
    if folds < 2 {
        return Err(PipelineError::insufficient(format!(
            "at least 2 folds are required, got {}",
            folds
        )));
    }

    let classes = indices_by_class(target);
    if let Some((label, rows)) = classes.iter().find(|(_, rows)| rows.len() < folds) {
        return Err(PipelineError::insufficient(format!(
            "class {} has {} row(s), fewer than the {} folds requested",
            label,
            rows.len(),
            folds
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut assignment = vec![0usize; target.len()];
    let mut offset = 0;

    for (_, mut rows) in classes {
        rows.shuffle(&mut rng);
        for (i, row) in rows.iter().enumerate() {
            assignment[*row] = (offset + i) % folds;
        }
        offset += rows.len();
    }

    Ok((0..folds)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..target.len()).partition(|&i| assignment[i] == fold);
            SplitIndices { train, test }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(zeros: usize, ones: usize) -> Vec<u8> {
        let mut t = vec![0u8; zeros];
        t.extend(vec![1u8; ones]);
        t
    }

    #[test]
    fn test_split_preserves_class_proportions() {
        let y = target(60, 40);
        let split = stratified_split(&y, 0.2, 7).unwrap();

        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);
        let test_ones = split.test.iter().filter(|&&i| y[i] == 1).count();
        assert_eq!(test_ones, 8);
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let y = target(13, 9);
        let split = stratified_split(&y, 0.2, 1).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..22).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_reproducible_for_seed() {
        let y = target(30, 20);
        assert_eq!(
            stratified_split(&y, 0.2, 42).unwrap(),
            stratified_split(&y, 0.2, 42).unwrap()
        );
        assert_ne!(
            stratified_split(&y, 0.2, 42).unwrap(),
            stratified_split(&y, 0.2, 43).unwrap()
        );
    }

    #[test]
    fn test_split_rejects_singleton_class() {
        let y = target(10, 1);
        assert!(stratified_split(&y, 0.2, 0).is_err());
    }

    #[test]
    fn test_kfold_covers_every_row_once() {
        let y = target(23, 12);
        let folds = stratified_kfold(&y, 5, 3).unwrap();
        assert_eq!(folds.len(), 5);

        let mut seen = vec![0; y.len()];
        for fold in &folds {
            assert_eq!(fold.train.len() + fold.test.len(), y.len());
            for &i in &fold.test {
                seen[i] += 1;
            }
            let ones = fold.test.iter().filter(|&&i| y[i] == 1).count();
            assert!((2..=3).contains(&ones));
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_kfold_rejects_small_class() {
        let y = target(10, 3);
        assert!(stratified_kfold(&y, 5, 0).is_err());
    }
}
