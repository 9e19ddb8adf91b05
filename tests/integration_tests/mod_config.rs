use h5sweep::config::{DEFAULT_SIZES, load_config};
use h5sweep::{Config, ContainerFormat, SweepError};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn defaults_describe_the_standard_sweep() {
    let cfg = Config::default();
    assert_eq!(cfg.sweep.sizes, DEFAULT_SIZES.to_vec());
    assert_eq!(cfg.sweep.sizes.last(), Some(&100_000));
    assert_eq!(cfg.sweep.n_vars, 20_000);
    assert_eq!(cfg.sweep.density, 0.05);
    assert_eq!(cfg.sweep.chunk_size, 50_000);
    assert_eq!(cfg.sweep.seed, 42);
    assert_eq!(
        cfg.bench.timings_dir,
        PathBuf::from("runtime_benchmark/timings")
    );
    assert_eq!(cfg.bench.iterations, 3);
    assert_eq!(cfg.bench.tolerance, 1e-3);
    assert_eq!(cfg.bench.format, ContainerFormat::Native);
}

#[test]
fn explicit_file_is_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("h5sweep.toml");
    std::fs::write(
        &path,
        "data_dir = \"ds\"\n[sweep]\nsizes = [5, 10]\nchunk_size = 2\n[bench]\ntolerance = 0.01\n",
    )
    .unwrap();
    let cfg = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.sweep.sizes, vec![5, 10]);
    assert_eq!(cfg.sweep.chunk_size, 2);
    assert_eq!(cfg.bench.tolerance, 0.01);
}

#[test]
fn explicit_file_with_too_few_iterations_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[bench]\niterations = 1\n").unwrap();
    assert!(matches!(load_config(Some(&path)), Err(SweepError::Config(_))));
}

#[test]
fn malformed_file_names_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[sweep\n").unwrap();
    let Err(SweepError::Config(msg)) = load_config(Some(&path)) else {
        panic!("expected config error")
    };
    assert!(msg.contains("broken.toml"));
}
