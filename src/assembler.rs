//! Turns a generated matrix into a benchmark dataset: minimal axis metadata,
//! the matrix as X, and the `x_sum` checksum in `uns`.

use crate::dataset::{CHECKSUM_KEY, Dataset, UnsValue};
use crate::errors::{Result, SweepError};
use crate::sparse::Matrix;
use crate::synthetic::{self, GenerationRequest, parse_kinds};
use rand::Rng;

/// Annotation generators used on both axes of benchmark fixtures.
pub const AXIS_TYPES: [&str; 2] = ["integer_array", "dense_array"];

/// Skeleton dataset with integer and dense-real annotations on each axis and
/// nothing else: no X, layers, embeddings, pairwise matrices or `uns` entries.
pub fn assemble<R: Rng + ?Sized>(n_obs: usize, n_vars: usize, rng: &mut R) -> Result<Dataset> {
    let req = GenerationRequest {
        obs_types: parse_kinds(&AXIS_TYPES)?,
        var_types: parse_kinds(&AXIS_TYPES)?,
        ..GenerationRequest::empty(n_obs, n_vars)
    };
    synthetic::generate_dataset(&req, rng)
}

/// Install `matrix` as the primary matrix.
///
/// # Errors
/// `ShapeMismatch` unless the matrix is `(n_obs, n_vars)`.
pub fn attach_matrix(mut dataset: Dataset, matrix: Matrix) -> Result<Dataset> {
    if matrix.shape() != dataset.shape() {
        return Err(SweepError::ShapeMismatch {
            expected: dataset.shape(),
            actual: matrix.shape(),
        });
    }
    dataset.x = Some(matrix);
    Ok(dataset)
}

/// Store the sum of X's stored values under [`CHECKSUM_KEY`].
pub fn stamp_checksum(mut dataset: Dataset) -> Result<Dataset> {
    let sum = dataset.x.as_ref().ok_or(SweepError::MissingMatrix)?.stored_sum();
    dataset.uns.insert(CHECKSUM_KEY.to_string(), UnsValue::Float(sum));
    Ok(dataset)
}
