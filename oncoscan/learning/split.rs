use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{dataset::Dataset, error::LearningError};

/// Stratified train/test split.
///
/// The test partition holds `ceil(test_ratio * n)` samples, allocated across
/// classes in proportion to their frequency (largest remainder first). The
/// same `seed` always yields the same partitions.
pub fn stratified_split(
    dataset: &Dataset,
    test_ratio: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), LearningError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(LearningError::InvalidParameter(format!(
            "test ratio must lie in (0, 1), got {test_ratio}"
        )));
    }
    let total = dataset.len();
    if total == 0 {
        return Err(LearningError::EmptyDataset);
    }
    let n_test = (test_ratio * total as f64).ceil() as usize;
    if n_test == 0 || n_test >= total {
        return Err(LearningError::InvalidParameter(format!(
            "test ratio {test_ratio} leaves an empty partition for {total} samples"
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut by_class: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (idx, point) in dataset.samples.iter().enumerate() {
        let class = usize::from(point.label);
        if class > 1 {
            return Err(LearningError::InvalidLabel(point.label));
        }
        by_class[class].push(idx);
    }

    let allocation = allocate(&[by_class[0].len(), by_class[1].len()], n_test, total);
    let mut train_idx = Vec::with_capacity(total - n_test);
    let mut test_idx = Vec::with_capacity(n_test);
    for (indices, take) in by_class.iter_mut().zip(allocation) {
        indices.shuffle(&mut rng);
        test_idx.extend_from_slice(&indices[..take]);
        train_idx.extend_from_slice(&indices[take..]);
    }
    train_idx.shuffle(&mut rng);
    test_idx.shuffle(&mut rng);

    Ok((dataset.subset(&train_idx), dataset.subset(&test_idx)))
}

fn allocate(counts: &[usize; 2], n_test: usize, total: usize) -> [usize; 2] {
    let mut taken = [0; 2];
    let mut remainders = [(0.0, 0); 2];
    for (class, &count) in counts.iter().enumerate() {
        let exact = n_test as f64 * count as f64 / total as f64;
        taken[class] = (exact.floor() as usize).min(count);
        remainders[class] = (exact - exact.floor(), class);
    }
    remainders.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let mut missing = n_test.saturating_sub(taken.iter().sum());
    for (_, class) in remainders {
        if missing == 0 {
            break;
        }
        if taken[class] < counts[class] {
            taken[class] += 1;
            missing -= 1;
        }
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(n_malignant: usize, n_benign: usize) -> Dataset {
        let mut dataset = Dataset::new(vec!["x".into()]);
        for idx in 0..n_malignant {
            dataset.push(vec![idx as f64], 0).unwrap();
        }
        for idx in 0..n_benign {
            dataset.push(vec![1000.0 + idx as f64], 1).unwrap();
        }
        dataset
    }

    #[test]
    fn split_preserves_class_proportions() {
        let dataset = toy(212, 357);
        let (train, test) = stratified_split(&dataset, 0.2, 42).unwrap();
        assert_eq!(train.len(), 455);
        assert_eq!(test.len(), 114);
        assert_eq!(test.class_counts(), [42, 72]);
        assert_eq!(train.class_counts(), [170, 285]);
    }

    #[test]
    fn split_is_reproducible() {
        let dataset = toy(30, 50);
        let (a_train, a_test) = stratified_split(&dataset, 0.25, 7).unwrap();
        let (b_train, b_test) = stratified_split(&dataset, 0.25, 7).unwrap();
        assert_eq!(a_train.samples, b_train.samples);
        assert_eq!(a_test.samples, b_test.samples);
    }

    #[test]
    fn partitions_are_disjoint() {
        let dataset = toy(10, 10);
        let (train, test) = stratified_split(&dataset, 0.2, 1).unwrap();
        for point in &test.samples {
            assert!(!train.samples.contains(point));
        }
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let dataset = toy(5, 5);
        assert!(stratified_split(&dataset, 0.0, 1).is_err());
        assert!(stratified_split(&dataset, 1.0, 1).is_err());
    }
}
