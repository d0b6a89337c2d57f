//! Seeded train/test split.

use crate::data::dataset::LabeledDataset;
use crate::error::MlError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Shuffle rows with `seed` and hold out `ceil(len * test_size)` of them.
///
/// Returns `(train, test)`. Both sides must end up non-empty.
pub fn train_test_split(
    dataset: &LabeledDataset,
    test_size: f64,
    seed: u64,
) -> Result<(LabeledDataset, LabeledDataset), MlError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlError::invalid_input(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }
    let n = dataset.len();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(MlError::invalid_input(format!(
            "cannot split {n} rows with test_size {test_size}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let train = dataset.subset(train_idx)?;
    let test = dataset.subset(test_idx)?;
    tracing::info!(
        "Training set has {} samples. Testing set has {} samples.",
        train.len(),
        test.len()
    );
    Ok((train, test))
}
