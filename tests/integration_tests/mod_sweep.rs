use super::_support::small_sweep;
use h5sweep::container::native::NativeContainer;
use h5sweep::{Container, SweepGenerator, SweepOutcome};
use tempfile::tempdir;

#[test]
fn run_creates_data_dir_and_one_file_per_size() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("nested").join("datasets");
    let g = SweepGenerator::new(small_sweep(&data, &[40, 10, 20]), Box::new(NativeContainer));
    let outcomes = g.run().unwrap();
    let names: Vec<String> = outcomes
        .iter()
        .map(|o| o.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["d40.nxd", "d10.nxd", "d20.nxd"]);
    for o in &outcomes {
        let SweepOutcome::Generated { path, checksum } = o else {
            panic!("fresh dir should generate")
        };
        let stored = NativeContainer.read_checksum(path).unwrap();
        assert_eq!(stored, *checksum);
    }
}

#[test]
fn existing_file_is_left_untouched() {
    let dir = tempdir().unwrap();
    let g = SweepGenerator::new(small_sweep(dir.path(), &[10]), Box::new(NativeContainer));
    let path = g.output_path(10);
    std::fs::write(&path, b"placeholder").unwrap();
    let outcome = g.generate_and_save(10, 30).unwrap();
    assert_eq!(outcome, SweepOutcome::Skipped { path: path.clone() });
    assert_eq!(std::fs::read(&path).unwrap(), b"placeholder");
}

#[test]
fn entries_do_not_depend_on_each_other() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    SweepGenerator::new(small_sweep(a.path(), &[10, 20]), Box::new(NativeContainer)).run().unwrap();
    SweepGenerator::new(small_sweep(b.path(), &[20]), Box::new(NativeContainer)).run().unwrap();
    let ca = NativeContainer.read_checksum(&a.path().join("d20.nxd")).unwrap();
    let cb = NativeContainer.read_checksum(&b.path().join("d20.nxd")).unwrap();
    assert_eq!(ca, cb);
}
