//! Chunked synthetic sparse-matrix generation.
//!
//! Large row counts are produced chunk by chunk: each chunk is generated on its
//! own, appended to a growing row-compressed buffer and dropped, so peak memory
//! stays near `chunk_size * n_vars * density` plus the buffer itself.

use crate::errors::{Result, SweepError};
use crate::sparse::{CsrMatrix, DType, Matrix};
use rand::Rng;

/// Row counts of consecutive chunks covering `total` rows, at most `chunk_size`
/// each. Only the final chunk may be smaller.
#[derive(Clone, Debug)]
pub struct ChunkPlan {
    remaining: usize,
    chunk_size: usize,
}

impl ChunkPlan {
    pub fn new(total: usize, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SweepError::InvalidArgument("chunk_size must be positive".into()));
        }
        Ok(Self {
            remaining: total,
            chunk_size,
        })
    }
}

impl Iterator for ChunkPlan {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let rows = self.remaining.min(self.chunk_size);
        self.remaining -= rows;
        Some(rows)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.div_ceil(self.chunk_size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChunkPlan {}

/// Generate an `n_obs x n_vars` `f32` sparse matrix at `density`.
///
/// Up to `chunk_size` rows come back as a single CSR matrix. Above that the
/// rows are generated in chunks, stacked in generation order and returned in
/// CSC layout.
///
/// # Errors
/// `InvalidArgument` for a zero chunk size or a density outside `[0, 1]`;
/// `Allocation` when a chunk or the stacking buffer cannot be reserved.
pub fn generate_sparse<R: Rng + ?Sized>(
    n_obs: usize,
    n_vars: usize,
    density: f64,
    chunk_size: usize,
    rng: &mut R,
) -> Result<Matrix> {
    let plan = ChunkPlan::new(n_obs, chunk_size)?;
    if n_obs <= chunk_size {
        return Ok(Matrix::Csr(CsrMatrix::random(n_obs, n_vars, density, DType::F32, rng)?));
    }

    let mut stacked = CsrMatrix::empty(n_vars, DType::F32);
    for rows in plan {
        let chunk = CsrMatrix::random(rows, n_vars, density, DType::F32, rng)?;
        stacked.append_rows(chunk)?;
        log::info!("  generated {} / {} rows", stacked.shape.0, n_obs);
    }
    let csc = stacked.to_csc()?;
    Ok(Matrix::Csc(csc))
}
