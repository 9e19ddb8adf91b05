//! Summary statistics over timing samples.

use crate::errors::{Result, SweepError};
use ordered_float::OrderedFloat;
use std::time::Duration;

/// Fewest repetitions a summary is computed from.
pub const MIN_ITER: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

/// Percentile `p` (0..=100) of ascending `sorted` with linear interpolation
/// between closest ranks.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (sorted.len() - 1) as f64 * p / 100.0;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
}

impl Summary {
    /// Summarize samples given in seconds.
    ///
    /// # Errors
    /// `InsufficientSamples` with fewer than [`MIN_ITER`] samples.
    pub fn from_secs(samples: &[f64]) -> Result<Self> {
        if samples.len() < MIN_ITER {
            return Err(SweepError::InsufficientSamples {
                got: samples.len(),
                min: MIN_ITER,
            });
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by_key(|&s| OrderedFloat(s));
        Ok(Self {
            median: percentile(&sorted, 50.0),
            q1: percentile(&sorted, 25.0),
            q3: percentile(&sorted, 75.0),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            n: sorted.len(),
        })
    }

    pub fn from_durations(samples: &[Duration]) -> Result<Self> {
        let secs: Vec<f64> = samples.iter().map(Duration::as_secs_f64).collect();
        Self::from_secs(&secs)
    }
}
