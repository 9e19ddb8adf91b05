use h5sweep::SweepError;
use h5sweep::generator::{ChunkPlan, generate_sparse};
use h5sweep::sparse::{CsrMatrix, DType, Matrix};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn chunked_output_is_column_compressed_with_requested_shape() {
    let mut rng = StdRng::seed_from_u64(11);
    let m = generate_sparse(120, 200, 0.05, 50, &mut rng).unwrap();
    let Matrix::Csc(csc) = &m else {
        panic!("expected CSC for a chunked request")
    };
    assert_eq!(csc.shape, (120, 200));
    csc.validate().unwrap();
    // 50 + 50 + 20 rows at 200 columns and 5% density.
    assert_eq!(csc.nnz(), 500 + 500 + 200);
}

#[test]
fn chunked_matches_row_wise_replay_of_same_rng() {
    let mut rng = StdRng::seed_from_u64(3);
    let chunked = generate_sparse(70, 40, 0.2, 25, &mut rng).unwrap();

    let mut replay = StdRng::seed_from_u64(3);
    let mut stacked = CsrMatrix::empty(40, DType::F32);
    for rows in ChunkPlan::new(70, 25).unwrap() {
        let chunk = CsrMatrix::random(rows, 40, 0.2, DType::F32, &mut replay).unwrap();
        stacked.append_rows(chunk).unwrap();
    }
    let mut expected = stacked.triplets();
    let Matrix::Csc(csc) = chunked else {
        panic!("expected CSC")
    };
    let mut actual = csc.triplets();
    expected.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    actual.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    assert_eq!(actual, expected);
}

#[test]
fn values_are_unit_interval_floats() {
    let mut rng = StdRng::seed_from_u64(5);
    let m = generate_sparse(40, 40, 0.3, 40, &mut rng).unwrap();
    assert_eq!(m.dtype(), DType::F32);
    let Matrix::Csr(csr) = &m else {
        panic!("expected CSR")
    };
    assert!(csr.triplets().iter().all(|&(_, _, v)| (0.0..1.0).contains(&v)));
}

#[test]
fn bad_density_is_invalid_argument() {
    let mut rng = StdRng::seed_from_u64(0);
    for d in [-0.1, 1.5, f64::NAN] {
        let res = generate_sparse(10, 10, d, 5, &mut rng);
        assert!(matches!(res, Err(SweepError::InvalidArgument(_))));
    }
}

#[test]
fn zero_density_and_full_density_edges() {
    let mut rng = StdRng::seed_from_u64(0);
    let empty = generate_sparse(30, 10, 0.0, 10, &mut rng).unwrap();
    assert_eq!(empty.stored_values().len(), 0);
    assert_eq!(empty.stored_sum(), 0.0);
    let full = generate_sparse(30, 10, 1.0, 10, &mut rng).unwrap();
    assert_eq!(full.stored_values().len(), 300);
}

#[test]
fn oversized_chunk_reports_allocation_failure() {
    let mut rng = StdRng::seed_from_u64(0);
    let res = generate_sparse(1 << 50, 10, 0.5, 1 << 49, &mut rng);
    let Err(SweepError::Allocation { rows, cols, nnz }) = res else {
        panic!("expected an allocation failure");
    };
    assert_eq!((rows, cols), (1 << 49, 10));
    assert_eq!(nnz, (1usize << 49) * 5);
}
