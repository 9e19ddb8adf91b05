//! Benchmark records and their CSV report.

use super::stats::Summary;
use crate::errors::Result;
use crate::fsutil::write_atomic;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of the timing report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub package: String,
    pub n_cells: usize,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub min_time: f64,
    pub max_time: f64,
    /// Allocation profiling is not performed; always 0.
    pub mem_alloc: u64,
    pub n_itr: usize,
}

impl BenchmarkRecord {
    #[must_use]
    pub fn new(package: impl Into<String>, n_cells: usize, summary: &Summary) -> Self {
        Self {
            package: package.into(),
            n_cells,
            median: summary.median,
            q1: summary.q1,
            q3: summary.q3,
            min_time: summary.min,
            max_time: summary.max,
            mem_alloc: 0,
            n_itr: summary.n,
        }
    }
}

/// Write `records` to `path` as CSV with a header row, replacing any previous
/// report.
pub fn write_report(path: &Path, records: &[BenchmarkRecord]) -> Result<()> {
    write_atomic(path, |w| {
        let mut out = csv::WriterBuilder::new().has_headers(true).from_writer(w);
        for r in records {
            out.serialize(r)?;
        }
        out.flush()?;
        Ok(())
    })
}

/// Read a report written by [`write_report`].
pub fn read_report(path: &Path) -> Result<Vec<BenchmarkRecord>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
