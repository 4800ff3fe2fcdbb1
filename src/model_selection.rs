//! Train/test splitting of frames.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{PipelineError, Result};
use crate::frame::Frame;

/// Shuffled row indices for a reproducible split.
fn shuffle_indices(n_samples: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices
}

/// Split a frame into `(train, test)` with `test_size` fraction of rows held
/// out, shuffled with the given seed.
///
/// The test partition takes the ceiling, so `train.n_rows() + test.n_rows()`
/// always equals the input row count.
pub fn train_test_split(frame: &Frame, test_size: f64, seed: u64) -> Result<(Frame, Frame)> {
    if !(0.0..1.0).contains(&test_size) {
        return Err(PipelineError::InvalidParameter(format!(
            "test_size must be in [0, 1), got {}",
            test_size
        )));
    }
    let n = frame.n_rows();
    if n == 0 {
        return Err(PipelineError::EmptyData(
            "cannot split an empty frame".to_string(),
        ));
    }

    let n_test = ((n as f64) * test_size).ceil() as usize;
    let n_train = n - n_test;

    let indices = shuffle_indices(n, seed);
    let train = frame.take(&indices[..n_train]);
    let test = frame.take(&indices[n_train..]);
    Ok((train, test))
}
