use super::_support::{small_sweep, stamped_dataset};
use h5sweep::bench::discovery::DatasetFile;
use h5sweep::bench::report::read_report;
use h5sweep::container::native::NativeContainer;
use h5sweep::dataset::{CHECKSUM_KEY, UnsValue};
use h5sweep::{
    AccessMode, BenchConfig, Container, Harness, SweepConfig, SweepError, SweepGenerator,
};
use std::path::Path;
use tempfile::tempdir;

fn bench_config(data: &Path, timings: &Path) -> BenchConfig {
    BenchConfig {
        data_dir: data.to_path_buf(),
        timings_dir: timings.to_path_buf(),
        ..BenchConfig::default()
    }
}

fn native_harness(data: &Path, timings: &Path) -> Harness {
    Harness::new(bench_config(data, timings), Box::new(NativeContainer))
}

#[test]
fn end_to_end_sweep_then_both_modes() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("datasets");
    let timings = dir.path().join("timings");
    let sweep = SweepConfig {
        sizes: vec![100],
        n_vars: 20_000,
        density: 0.05,
        chunk_size: 50,
        data_dir: data.clone(),
        ..SweepConfig::default()
    };
    SweepGenerator::new(sweep, Box::new(NativeContainer)).run().unwrap();

    let harness = native_harness(&data, &timings);
    for mode in [AccessMode::Full, AccessMode::Backed] {
        let records = harness.run(mode).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.package, format!("native ({})", mode.label()));
        assert_eq!(r.n_cells, 100);
        assert_eq!(r.n_itr, 3);
        assert_eq!(r.mem_alloc, 0);
        assert!(r.median >= 0.0);
        assert!(r.min_time <= r.q1 && r.q1 <= r.median && r.median <= r.q3 && r.q3 <= r.max_time);
        assert_eq!(read_report(&harness.report_path(mode)).unwrap(), records);
    }
    assert!(timings.join("native_memory.csv").exists());
    assert!(timings.join("native_backed.csv").exists());
}

#[test]
fn records_follow_numeric_size_order() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("d");
    SweepGenerator::new(small_sweep(&data, &[40, 8, 16]), Box::new(NativeContainer)).run().unwrap();
    std::fs::write(data.join("notes.txt"), b"ignored").unwrap();

    let cfg = BenchConfig {
        iterations: 4,
        ..bench_config(&data, &dir.path().join("t"))
    };
    let records = Harness::new(cfg, Box::new(NativeContainer)).run(AccessMode::Backed).unwrap();
    let sizes: Vec<usize> = records.iter().map(|r| r.n_cells).collect();
    assert_eq!(sizes, vec![8, 16, 40]);
    assert!(records.iter().all(|r| r.n_itr == 4));
}

#[test]
fn tampered_checksum_fails_before_any_report() {
    for factor in [1.1, 0.9] {
        let dir = tempdir().unwrap();
        let data = dir.path().join("d");
        let timings = dir.path().join("t");
        let mut ds = stamped_dataset(20, 30, 9);
        let sum = ds.checksum().unwrap();
        ds.uns.insert(CHECKSUM_KEY.into(), UnsValue::Float(sum * factor));
        NativeContainer.write(&ds, &data.join("d20.nxd")).unwrap();

        let harness = native_harness(&data, &timings);
        for mode in [AccessMode::Full, AccessMode::Backed] {
            let err = harness.run(mode).unwrap_err();
            let SweepError::Validation {
                expected,
                actual,
                path,
            } = err else {
                panic!("expected validation failure, got {err}");
            };
            assert_eq!(path, data.join("d20.nxd"));
            assert!((expected - sum * factor).abs() < 1e-9);
            assert!((actual - sum).abs() < 1e-6);
            assert!(!harness.report_path(mode).exists());
        }
    }
}

#[test]
fn only_the_smallest_dataset_is_validated() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("d");
    let small = stamped_dataset(10, 30, 1);
    let mut large = stamped_dataset(30, 30, 2);
    let sum = large.checksum().unwrap();
    large.uns.insert(CHECKSUM_KEY.into(), UnsValue::Float(sum * 2.0));
    NativeContainer.write(&small, &data.join("d10.nxd")).unwrap();
    NativeContainer.write(&large, &data.join("d30.nxd")).unwrap();

    let harness = native_harness(&data, &dir.path().join("t"));
    assert_eq!(harness.run(AccessMode::Full).unwrap().len(), 2);
}

#[test]
fn empty_directory_is_a_discovery_error() {
    let dir = tempdir().unwrap();
    let harness = native_harness(dir.path(), &dir.path().join("t"));
    assert!(matches!(harness.run(AccessMode::Full), Err(SweepError::Discovery { .. })));
}

#[test]
fn explicit_paths_are_sorted_before_validation() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("d");
    for (n, seed) in [(12, 3), (6, 4)] {
        let path = data.join(format!("d{n}.nxd"));
        NativeContainer.write(&stamped_dataset(n, 30, seed), &path).unwrap();
    }
    let files = vec![
        DatasetFile {
            n_obs: 12,
            path: data.join("d12.nxd"),
        },
        DatasetFile {
            n_obs: 6,
            path: data.join("d6.nxd"),
        },
    ];
    let harness = native_harness(&data, &dir.path().join("t"));
    let records = harness.run_paths(AccessMode::Full, &files).unwrap();
    assert_eq!(
        records.iter().map(|r| r.n_cells).collect::<Vec<_>>(),
        vec![6, 12]
    );
}
