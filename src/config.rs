//! Run configuration for the sweep generator and the benchmark harness.
//!
//! Precedence: environment > config file > defaults. The config file is the
//! explicit path if one is given, else `$H5SWEEP_CONFIG`, else `./h5sweep.toml`.
//!
//! ```toml
//! data_dir = "runtime_benchmark/datasets"
//! format = "native"
//!
//! [sweep]
//! sizes = [100, 1000]
//! n_vars = 20000
//!
//! [bench]
//! timings_dir = "runtime_benchmark/timings"
//! iterations = 5
//!
//! [fixtures]
//! dir = "functionality_test/dummy_data"
//! ```

use crate::bench::stats::MIN_ITER;
use crate::container::ContainerFormat;
use crate::errors::{Result, SweepError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SIZES: [usize; 10] = [
    100, 200, 500, 1_000, 2_000, 5_000, 10_000, 20_000, 50_000, 100_000,
];
pub const DEFAULT_N_VARS: usize = 20_000;
pub const DEFAULT_DENSITY: f64 = 0.05;
pub const DEFAULT_CHUNK_SIZE: usize = 50_000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DATA_DIR: &str = "runtime_benchmark/datasets";
pub const DEFAULT_TIMINGS_DIR: &str = "runtime_benchmark/timings";
pub const DEFAULT_TOLERANCE: f64 = 1e-3;
pub const DEFAULT_FIXTURES_DIR: &str = "functionality_test/dummy_data";
pub const DEFAULT_FIXTURE_N_OBS: usize = 10;
pub const DEFAULT_FIXTURE_N_VARS: usize = 20;

/// Settings for [`crate::sweep::SweepGenerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    pub sizes: Vec<usize>,
    pub n_vars: usize,
    pub density: f64,
    pub chunk_size: usize,
    pub seed: u64,
    pub data_dir: PathBuf,
    pub format: ContainerFormat,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            n_vars: DEFAULT_N_VARS,
            density: DEFAULT_DENSITY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            seed: DEFAULT_SEED,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            format: ContainerFormat::Native,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.density) {
            return Err(SweepError::Config(format!(
                "density must be in [0, 1], got {}",
                self.density
            )));
        }
        if self.chunk_size == 0 {
            return Err(SweepError::Config("chunk_size must be positive".into()));
        }
        if self.n_vars == 0 {
            return Err(SweepError::Config("n_vars must be positive".into()));
        }
        Ok(())
    }
}

/// Settings for [`crate::bench::Harness`].
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    pub data_dir: PathBuf,
    pub timings_dir: PathBuf,
    pub iterations: usize,
    pub tolerance: f64,
    pub format: ContainerFormat,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timings_dir: PathBuf::from(DEFAULT_TIMINGS_DIR),
            iterations: MIN_ITER,
            tolerance: DEFAULT_TOLERANCE,
            format: ContainerFormat::Native,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.iterations < MIN_ITER {
            return Err(SweepError::Config(format!(
                "iterations must be at least {MIN_ITER}, got {}",
                self.iterations
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SweepError::Config(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Settings for [`crate::fixtures::generate_fixtures`]. Fixtures live apart
/// from the benchmark datasets.
#[derive(Clone, Debug, PartialEq)]
pub struct FixturesConfig {
    pub dir: PathBuf,
    pub n_obs: usize,
    pub n_vars: usize,
    pub seed: u64,
    pub format: ContainerFormat,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
            n_obs: DEFAULT_FIXTURE_N_OBS,
            n_vars: DEFAULT_FIXTURE_N_VARS,
            seed: DEFAULT_SEED,
            format: ContainerFormat::Native,
        }
    }
}

impl FixturesConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_obs == 0 || self.n_vars == 0 {
            return Err(SweepError::Config(format!(
                "fixture shape must be positive, got {} x {}",
                self.n_obs, self.n_vars
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SweepSection {
    sizes: Option<Vec<usize>>,
    n_vars: Option<usize>,
    density: Option<f64>,
    chunk_size: Option<usize>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BenchSection {
    timings_dir: Option<PathBuf>,
    iterations: Option<usize>,
    tolerance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FixturesSection {
    dir: Option<PathBuf>,
    n_obs: Option<usize>,
    n_vars: Option<usize>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    format: Option<ContainerFormat>,
    sweep: SweepSection,
    bench: BenchSection,
    fixtures: FixturesSection,
}

/// Resolved configuration for all tools.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub sweep: SweepConfig,
    pub bench: BenchConfig,
    pub fixtures: FixturesConfig,
}

impl Config {
    /// Defaults overlaid with the settings in a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(s).map_err(|e| SweepError::Config(e.to_string()))?;
        let mut cfg = Config::default();
        if let Some(dir) = file.data_dir {
            cfg.set_data_dir(dir);
        }
        if let Some(format) = file.format {
            cfg.set_format(format);
        }
        let s = file.sweep;
        if let Some(v) = s.sizes {
            cfg.sweep.sizes = v;
        }
        if let Some(v) = s.n_vars {
            cfg.sweep.n_vars = v;
        }
        if let Some(v) = s.density {
            cfg.sweep.density = v;
        }
        if let Some(v) = s.chunk_size {
            cfg.sweep.chunk_size = v;
        }
        if let Some(v) = s.seed {
            cfg.sweep.seed = v;
        }
        let b = file.bench;
        if let Some(v) = b.timings_dir {
            cfg.bench.timings_dir = v;
        }
        if let Some(v) = b.iterations {
            cfg.bench.iterations = v;
        }
        if let Some(v) = b.tolerance {
            cfg.bench.tolerance = v;
        }
        let f = file.fixtures;
        if let Some(v) = f.dir {
            cfg.fixtures.dir = v;
        }
        if let Some(v) = f.n_obs {
            cfg.fixtures.n_obs = v;
        }
        if let Some(v) = f.n_vars {
            cfg.fixtures.n_vars = v;
        }
        if let Some(v) = f.seed {
            cfg.fixtures.seed = v;
        }
        Ok(cfg)
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.sweep.data_dir = dir.clone();
        self.bench.data_dir = dir;
    }

    pub fn set_format(&mut self, format: ContainerFormat) {
        self.sweep.format = format;
        self.bench.format = format;
        self.fixtures.format = format;
    }

    /// Apply `H5SWEEP_DATA_DIR`, `H5SWEEP_TIMINGS_DIR`, `H5SWEEP_FIXTURES_DIR`
    /// and `H5SWEEP_FORMAT` looked up through `get`.
    pub fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, get: F) -> Result<()> {
        if let Some(dir) = get("H5SWEEP_DATA_DIR") {
            self.set_data_dir(PathBuf::from(dir));
        }
        if let Some(dir) = get("H5SWEEP_TIMINGS_DIR") {
            self.bench.timings_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("H5SWEEP_FIXTURES_DIR") {
            self.fixtures.dir = PathBuf::from(dir);
        }
        if let Some(fmt) = get("H5SWEEP_FORMAT") {
            self.set_format(fmt.parse()?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.sweep.validate()?;
        self.bench.validate()?;
        self.fixtures.validate()?;
        for format in [self.sweep.format, self.bench.format, self.fixtures.format] {
            if !format.is_available() {
                return Err(SweepError::FeatureNotCompiled(format!(
                    "format `{format}` requires the `{format}` cargo feature"
                )));
            }
        }
        Ok(())
    }
}

fn config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(p) = explicit {
        paths.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var("H5SWEEP_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join("h5sweep.toml"));
    }
    paths
}

/// Resolve the configuration from file, environment and defaults.
///
/// # Errors
/// `Config` if the chosen file cannot be parsed or a value is out of range.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut cfg = Config::default();
    if let Some(path) = config_candidates(explicit).into_iter().find(|p| p.exists()) {
        let text = std::fs::read_to_string(&path)?;
        cfg = Config::from_toml_str(&text)
            .map_err(|e| SweepError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("loaded config from {}", path.display());
    }
    cfg.apply_overrides(|k| std::env::var(k).ok())?;
    cfg.validate()?;
    Ok(cfg)
}
