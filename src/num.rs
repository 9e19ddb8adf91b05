//! Numeric utilities: checked conversions between index widths.
//!
//! Sparse matrices store column/row indices as `u32` and pointer arrays as `u64`
//! so files are portable across pointer widths. Conversions in and out of
//! `usize` go through these helpers to keep call sites searchable.

use crate::errors::{Result, SweepError};

#[inline]
#[must_use]
pub fn usize_to_u64(v: usize) -> u64 {
    v as u64
}

#[inline]
pub fn u64_to_usize(v: u64) -> Result<usize> {
    usize::try_from(v).map_err(|_| SweepError::Corrupt(format!("offset {v} exceeds usize")))
}

#[inline]
pub fn usize_to_u32(v: usize) -> Result<u32> {
    u32::try_from(v).map_err(|_| SweepError::InvalidArgument(format!("index {v} exceeds u32")))
}

#[inline]
#[must_use]
pub fn u32_to_usize(v: u32) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}

/// Expected stored-entry count for a `rows x cols` matrix at `density`, rounded
/// half away from zero and clamped to the cell count.
#[must_use]
pub fn expected_nnz(rows: usize, cols: usize, density: f64) -> usize {
    let cells = (rows as f64) * (cols as f64);
    let k = (density * cells).round();
    if !k.is_finite() || k <= 0.0 {
        0
    } else if k >= cells {
        rows.saturating_mul(cols)
    } else {
        k as usize
    }
}
