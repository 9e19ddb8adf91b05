use h5sweep::SweepError;
use std::io;
use std::path::PathBuf;

#[test]
fn test_io_error_converts_and_displays() {
    let err: SweepError = io::Error::new(io::ErrorKind::NotFound, "file not found").into();
    assert!(matches!(err, SweepError::Io(_)));
    assert_eq!(format!("{err}"), "I/O error: file not found");
}

#[test]
fn test_discovery_error_names_directory() {
    let err = SweepError::Discovery {
        dir: PathBuf::from("runtime_benchmark/datasets"),
    };
    assert_eq!(
        format!("{err}"),
        "no datasets found in runtime_benchmark/datasets"
    );
}

#[test]
fn test_validation_error_carries_both_sums() {
    let err = SweepError::Validation {
        path: PathBuf::from("d100.nxd"),
        expected: 5000.0,
        actual: 4500.0,
    };
    let msg = format!("{err}");
    assert!(msg.contains("d100.nxd"));
    assert!(msg.contains("5000") && msg.contains("4500"));
}

#[test]
fn test_allocation_error_carries_chunk_shape() {
    let err = SweepError::Allocation {
        rows: 50_000,
        cols: 20_000,
        nnz: 50_000_000,
    };
    assert_eq!(
        format!("{err}"),
        "allocation failed for 50000x20000 chunk with 50000000 stored values"
    );
}

#[test]
fn test_shape_mismatch_display() {
    let err = SweepError::ShapeMismatch {
        expected: (10, 20),
        actual: (10, 21),
    };
    assert_eq!(
        format!("{err}"),
        "shape mismatch: expected (10, 20), got (10, 21)"
    );
}
