//! Read-latency benchmark over a sweep of stored datasets.
//!
//! A run discovers `d<n>.<ext>` files, checks once on the smallest that a read
//! reproduces the stored `x_sum`, then times repeated load + force cycles per
//! file and writes one CSV row per file.

pub mod discovery;
pub mod report;
pub mod stats;
pub mod strategy;

use crate::config::BenchConfig;
use crate::container::{AccessMode, Container};
use crate::errors::{Result, SweepError};
use crate::logger::METRICS_TARGET;
use discovery::{DatasetFile, discover, sort_by_rows};
use report::{BenchmarkRecord, write_report};
use stats::Summary;
use strategy::{BackedRead, InMemoryRead, ReadStrategy, read_and_force};
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Whether `actual` is within relative `tolerance` of `expected`, with the
/// denominator floored at 1 so near-zero sums compare absolutely.
#[must_use]
pub fn within_tolerance(expected: f64, actual: f64, tolerance: f64) -> bool {
    (actual - expected).abs() / expected.abs().max(1.0) <= tolerance
}

pub struct Harness {
    config: BenchConfig,
    container: Box<dyn Container>,
}

impl Harness {
    #[must_use]
    pub fn new(config: BenchConfig, container: Box<dyn Container>) -> Self {
        Self { config, container }
    }

    /// `<format> (memory)` or `<format> (backed)`.
    #[must_use]
    pub fn package_label(&self, mode: AccessMode) -> String {
        format!("{} ({})", self.container.format(), mode.label())
    }

    /// `<timings_dir>/<format>_<memory|backed>.csv`.
    #[must_use]
    pub fn report_path(&self, mode: AccessMode) -> PathBuf {
        self.config
            .timings_dir
            .join(format!("{}_{}.csv", self.container.format(), mode.label()))
    }

    pub fn discover(&self) -> Result<Vec<DatasetFile>> {
        discover(&self.config.data_dir, self.container.extension())
    }

    /// Discover datasets in the configured directory and benchmark them.
    ///
    /// # Errors
    /// `Discovery` when nothing matches, `Validation` when the smallest dataset
    /// does not reproduce its stored checksum, plus any read or report error.
    pub fn run(&self, mode: AccessMode) -> Result<Vec<BenchmarkRecord>> {
        let files = self.discover()?;
        log::info!(
            "found {} dataset(s) in {}",
            files.len(),
            self.config.data_dir.display()
        );
        self.run_paths(mode, &files)
    }

    /// Benchmark an explicit list of dataset files.
    pub fn run_paths(
        &self,
        mode: AccessMode,
        files: &[DatasetFile],
    ) -> Result<Vec<BenchmarkRecord>> {
        let container = self.container.as_ref();
        match mode {
            AccessMode::Full => self.run_with(&InMemoryRead::new(container), files),
            AccessMode::Backed => self.run_with(&BackedRead::new(container), files),
        }
    }

    fn run_with<S: ReadStrategy>(
        &self,
        strategy: &S,
        files: &[DatasetFile],
    ) -> Result<Vec<BenchmarkRecord>> {
        let mut files = files.to_vec();
        sort_by_rows(&mut files);
        let Some(smallest) = files.first() else {
            return Err(SweepError::Discovery {
                dir: self.config.data_dir.clone(),
            });
        };
        self.validate(strategy, &smallest.path)?;

        let mode = strategy.mode();
        let label = self.package_label(mode);
        let mut records = Vec::with_capacity(files.len());
        for file in &files {
            let samples = self.time_dataset(strategy, file)?;
            let summary = Summary::from_durations(&samples)?;
            let record = BenchmarkRecord::new(label.clone(), file.n_obs, &summary);
            log::info!(
                "{label}: n_cells={} median={:.6}s q1={:.6}s q3={:.6}s",
                record.n_cells,
                record.median,
                record.q1,
                record.q3
            );
            match serde_json::to_string(&record) {
                Ok(line) => log::info!(target: METRICS_TARGET, "{line}"),
                Err(e) => log::warn!("could not encode metrics record: {e}"),
            }
            records.push(record);
        }

        let out = self.report_path(mode);
        write_report(&out, &records)?;
        log::info!("wrote {} record(s) to {}", records.len(), out.display());
        Ok(records)
    }

    /// Read the stored checksum, perform one load + force, and compare.
    ///
    /// # Errors
    /// `Validation` when the two sums differ by more than the tolerance.
    pub fn validate<S: ReadStrategy + ?Sized>(&self, strategy: &S, path: &Path) -> Result<()> {
        let expected = self.container.read_checksum(path)?;
        let actual = read_and_force(strategy, path)?;
        if !within_tolerance(expected, actual, self.config.tolerance) {
            return Err(SweepError::Validation {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }
        log::info!("validated {} (x_sum {expected})", path.display());
        Ok(())
    }

    fn time_dataset<S: ReadStrategy>(
        &self,
        strategy: &S,
        file: &DatasetFile,
    ) -> Result<Vec<Duration>> {
        // Handles from earlier repetitions and datasets are out of scope here.
        log::debug!(
            "released previous handles before timing {}",
            file.path.display()
        );
        let mut samples = Vec::with_capacity(self.config.iterations);
        for _ in 0..self.config.iterations {
            let start = Instant::now();
            let sum = read_and_force(strategy, &file.path)?;
            samples.push(start.elapsed());
            black_box(sum);
        }
        Ok(samples)
    }
}
