use h5sweep::SweepConfig;
use h5sweep::assembler::{assemble, attach_matrix, stamp_checksum};
use h5sweep::dataset::Dataset;
use h5sweep::generator::generate_sparse;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

/// Sweep settings small enough for a test run.
pub fn small_sweep(dir: &Path, sizes: &[usize]) -> SweepConfig {
    SweepConfig {
        sizes: sizes.to_vec(),
        n_vars: 30,
        density: 0.1,
        chunk_size: 16,
        seed: 7,
        data_dir: dir.to_path_buf(),
        ..SweepConfig::default()
    }
}

/// A benchmark-ready dataset with a stamped checksum.
pub fn stamped_dataset(n_obs: usize, n_vars: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let x = generate_sparse(n_obs, n_vars, 0.1, 16, &mut rng).unwrap();
    let ds = assemble(n_obs, n_vars, &mut rng).unwrap();
    stamp_checksum(attach_matrix(ds, x).unwrap()).unwrap()
}
