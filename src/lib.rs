//! Synthetic dataset sweeps and read-latency benchmarks for columnar
//! single-cell style containers.
//!
//! [`sweep::SweepGenerator`] writes one dataset per configured size,
//! [`bench::Harness`] times reading them back in memory or backed mode, and
//! [`fixtures::generate_fixtures`] produces small per-type test files.

pub mod assembler;
pub mod bench;
pub mod config;
pub mod container;
pub mod dataset;
pub mod errors;
pub mod features;
pub mod fixtures;
pub mod fsutil;
pub mod generator;
pub mod logger;
pub mod num;
pub mod sparse;
pub mod sweep;
pub mod synthetic;

pub use bench::Harness;
pub use config::{BenchConfig, Config, FixturesConfig, SweepConfig, load_config};
pub use container::{AccessMode, Container, ContainerFormat, LoadedDataset};
pub use dataset::Dataset;
pub use errors::{Result, SweepError};
pub use sparse::Matrix;
pub use sweep::{SweepGenerator, SweepOutcome};
