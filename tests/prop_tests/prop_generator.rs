use h5sweep::generator::{ChunkPlan, generate_sparse};
use h5sweep::num::expected_nnz;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 64,
        .. proptest::test_runner::Config::default()
    })]
    #[test]
    fn prop_chunk_plan_covers_total(total in 0usize..5_000, chunk in 1usize..700) {
        let plan: Vec<usize> = ChunkPlan::new(total, chunk).unwrap().collect();
        prop_assert_eq!(plan.iter().sum::<usize>(), total);
        prop_assert_eq!(plan.len(), total.div_ceil(chunk));
        if let Some((last, head)) = plan.split_last() {
            prop_assert!(head.iter().all(|&c| c == chunk));
            prop_assert!(*last >= 1 && *last <= chunk);
        }
    }

    #[test]
    fn prop_generated_shape_and_count(
        n_obs in 1usize..120,
        n_vars in 1usize..60,
        density in 0.0f64..=1.0,
        chunk in 1usize..50,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let m = generate_sparse(n_obs, n_vars, density, chunk, &mut rng).unwrap();
        prop_assert_eq!(m.shape(), (n_obs, n_vars));
        m.validate().unwrap();
        let expected: usize = ChunkPlan::new(n_obs, chunk)
            .unwrap()
            .map(|rows| expected_nnz(rows, n_vars, density))
            .sum();
        prop_assert_eq!(m.stored_values().len(), expected);
    }
}
