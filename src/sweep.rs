//! Writes one dataset file per configured size, skipping files that exist.

use crate::assembler::{assemble, attach_matrix, stamp_checksum};
use crate::bench::discovery::dataset_file_name;
use crate::config::SweepConfig;
use crate::container::Container;
use crate::errors::Result;
use crate::fsutil::ensure_dir;
use crate::generator::generate_sparse;
use crate::num::usize_to_u64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

/// What [`SweepGenerator::generate_and_save`] did for one size.
#[derive(Clone, Debug, PartialEq)]
pub enum SweepOutcome {
    Generated { path: PathBuf, checksum: f64 },
    Skipped { path: PathBuf },
}

impl SweepOutcome {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            SweepOutcome::Generated { path, .. } | SweepOutcome::Skipped { path } => path,
        }
    }
}

pub struct SweepGenerator {
    config: SweepConfig,
    container: Box<dyn Container>,
}

impl SweepGenerator {
    #[must_use]
    pub fn new(config: SweepConfig, container: Box<dyn Container>) -> Self {
        Self { config, container }
    }

    /// `<data_dir>/d<n_obs>.<ext>`.
    #[must_use]
    pub fn output_path(&self, n_obs: usize) -> PathBuf {
        self.config.data_dir.join(dataset_file_name(n_obs, self.container.extension()))
    }

    /// Seeded per size so a dataset does not depend on which others exist.
    fn rng_for(&self, n_obs: usize) -> StdRng {
        StdRng::seed_from_u64(self.config.seed ^ usize_to_u64(n_obs))
    }

    /// Generate, assemble and store the dataset for `n_obs` rows unless its
    /// file is already present.
    pub fn generate_and_save(&self, n_obs: usize, n_vars: usize) -> Result<SweepOutcome> {
        let path = self.output_path(n_obs);
        if path.exists() {
            log::info!("{} already exists, skipping", path.display());
            return Ok(SweepOutcome::Skipped { path });
        }

        log::info!("generating {n_obs} x {n_vars} dataset");
        let mut rng = self.rng_for(n_obs);
        let (density, chunk_size) = (self.config.density, self.config.chunk_size);
        let x = generate_sparse(n_obs, n_vars, density, chunk_size, &mut rng)?;
        let dataset = assemble(n_obs, n_vars, &mut rng)?;
        let dataset = stamp_checksum(attach_matrix(dataset, x)?)?;
        let checksum = dataset.checksum().unwrap_or_default();
        self.container.write(&dataset, &path)?;
        log::info!("saved {} (x_sum {checksum})", path.display());
        Ok(SweepOutcome::Generated { path, checksum })
    }

    /// Every configured size in order; stops at the first failure.
    pub fn run(&self) -> Result<Vec<SweepOutcome>> {
        ensure_dir(&self.config.data_dir)?;
        let mut outcomes = Vec::with_capacity(self.config.sizes.len());
        for &n_obs in &self.config.sizes {
            outcomes.push(self.generate_and_save(n_obs, self.config.n_vars)?);
        }
        Ok(outcomes)
    }
}
