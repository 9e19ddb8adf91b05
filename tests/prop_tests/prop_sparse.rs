use h5sweep::sparse::{CsrMatrix, DType};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn dtype() -> impl Strategy<Value = DType> {
    prop_oneof![Just(DType::F32), Just(DType::I32)]
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 48,
        .. proptest::test_runner::Config::default()
    })]
    #[test]
    fn prop_csc_keeps_every_entry(
        rows in 0usize..40,
        cols in 1usize..40,
        density in 0.0f64..=1.0,
        dt in dtype(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let csr = CsrMatrix::random(rows, cols, density, dt, &mut rng).unwrap();
        let csc = csr.to_csc().unwrap();
        csc.validate().unwrap();
        prop_assert_eq!(csc.shape, csr.shape);
        prop_assert!((csc.data.sum() - csr.data.sum()).abs() < 1e-6);

        let mut a = csr.triplets();
        let mut b = csc.triplets();
        a.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        b.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_stacking_preserves_rows(
        split in 0usize..30,
        extra in 0usize..30,
        cols in 1usize..25,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let top = CsrMatrix::random(split, cols, 0.3, DType::F32, &mut rng).unwrap();
        let bottom = CsrMatrix::random(extra, cols, 0.3, DType::F32, &mut rng).unwrap();
        let mut stacked = CsrMatrix::empty(cols, DType::F32);
        stacked.append_rows(top.clone()).unwrap();
        stacked.append_rows(bottom.clone()).unwrap();
        stacked.validate().unwrap();
        prop_assert_eq!(stacked.shape, (split + extra, cols));
        let mut expected = top.triplets();
        expected.extend(bottom.triplets().into_iter().map(|(r, c, v)| (r + split, c, v)));
        prop_assert_eq!(stacked.triplets(), expected);
    }
}
