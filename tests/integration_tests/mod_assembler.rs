use h5sweep::SweepError;
use h5sweep::assembler::{assemble, attach_matrix, stamp_checksum};
use h5sweep::dataset::{CHECKSUM_KEY, Column, UnsValue};
use h5sweep::generator::generate_sparse;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn skeleton_has_only_axis_annotations() {
    let mut rng = StdRng::seed_from_u64(1);
    let ds = assemble(15, 25, &mut rng).unwrap();
    assert_eq!(ds.shape(), (15, 25));
    assert!(ds.x.is_none());
    assert!(ds.layers.is_empty() && ds.obsm.is_empty() && ds.varp.is_empty() && ds.uns.is_empty());
    for frame in [&ds.obs, &ds.var] {
        let names: Vec<&str> = frame.columns.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["dense_array", "integer_array"]);
        assert!(matches!(frame.columns["integer_array"], Column::Integer(_)));
    }
}

#[test]
fn checksum_equals_sum_of_stored_values() {
    let mut rng = StdRng::seed_from_u64(2);
    let x = generate_sparse(60, 30, 0.1, 20, &mut rng).unwrap();
    let sum = x.stored_sum();
    let skeleton = assemble(60, 30, &mut rng).unwrap();
    let ds = stamp_checksum(attach_matrix(skeleton, x).unwrap()).unwrap();
    assert_eq!(ds.uns.get(CHECKSUM_KEY), Some(&UnsValue::Float(sum)));
    assert_eq!(ds.checksum(), Some(sum));
    ds.validate().unwrap();
}

#[test]
fn wrong_shape_and_missing_matrix_are_rejected() {
    let mut rng = StdRng::seed_from_u64(3);
    let ds = assemble(10, 10, &mut rng).unwrap();
    let x = generate_sparse(10, 11, 0.1, 10, &mut rng).unwrap();
    assert!(matches!(
        attach_matrix(ds.clone(), x),
        Err(SweepError::ShapeMismatch {
            expected: (10, 10),
            actual: (10, 11),
        })
    ));
    assert!(matches!(stamp_checksum(ds), Err(SweepError::MissingMatrix)));
}
