use h5sweep::bench::stats::{MIN_ITER, Summary};
use proptest::prelude::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 128,
        .. proptest::test_runner::Config::default()
    })]
    #[test]
    fn prop_summary_is_ordered(samples in proptest::collection::vec(0.0f64..10.0, MIN_ITER..40)) {
        let s = Summary::from_secs(&samples).unwrap();
        let eps = 1e-12;
        prop_assert!(s.min <= s.q1 + eps);
        prop_assert!(s.q1 <= s.median + eps);
        prop_assert!(s.median <= s.q3 + eps);
        prop_assert!(s.q3 <= s.max + eps);
        prop_assert_eq!(s.n, samples.len());
        prop_assert_eq!(s.min, samples.iter().copied().fold(f64::INFINITY, f64::min));
        prop_assert_eq!(s.max, samples.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    }

    #[test]
    fn prop_summary_ignores_input_order(mut samples in proptest::collection::vec(0.0f64..10.0, MIN_ITER..20)) {
        let a = Summary::from_secs(&samples).unwrap();
        samples.reverse();
        let b = Summary::from_secs(&samples).unwrap();
        prop_assert_eq!(a, b);
    }
}
