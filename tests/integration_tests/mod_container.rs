use super::_support::stamped_dataset;
use h5sweep::container::native::NativeContainer;
use h5sweep::{AccessMode, Container, ContainerFormat, LoadedDataset, SweepError};
use tempfile::tempdir;

#[test]
fn format_names_and_extensions() {
    assert_eq!(
        "native".parse::<ContainerFormat>().unwrap(),
        ContainerFormat::Native
    );
    assert_eq!(
        "H5AD".parse::<ContainerFormat>().unwrap(),
        ContainerFormat::H5ad
    );
    assert!(matches!("zarr".parse::<ContainerFormat>(), Err(SweepError::Config(_))));
    assert_eq!(ContainerFormat::Native.extension(), "nxd");
    assert_eq!(ContainerFormat::H5ad.extension(), "h5ad");
    assert_eq!(ContainerFormat::Native.open().unwrap().extension(), "nxd");
}

#[test]
fn h5ad_backend_requires_its_feature() {
    let opened = ContainerFormat::H5ad.open();
    if cfg!(feature = "h5ad") {
        assert!(opened.is_ok());
    } else {
        assert!(matches!(opened, Err(SweepError::FeatureNotCompiled(_))));
    }
}

#[test]
fn native_write_leaves_no_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d25.nxd");
    NativeContainer.write(&stamped_dataset(25, 30, 1), &path).unwrap();
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["d25.nxd"]);
}

#[test]
fn backed_handle_exposes_metadata_before_x() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d25.nxd");
    let ds = stamped_dataset(25, 30, 2);
    NativeContainer.write(&ds, &path).unwrap();
    let loaded = NativeContainer.read(&path, AccessMode::Backed).unwrap();
    assert_eq!(loaded.shape(), (25, 30));
    let LoadedDataset::Backed(mut handle) = loaded else {
        panic!("expected backed handle")
    };
    assert_eq!(handle.uns(), &ds.uns);
    assert_eq!(
        handle.read_x().unwrap().stored_sum(),
        ds.checksum().unwrap()
    );
}

#[test]
fn truncated_file_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d25.nxd");
    NativeContainer.write(&stamped_dataset(25, 30, 3), &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    assert!(NativeContainer.read(&path, AccessMode::Full).is_err());
}

#[cfg(feature = "h5ad")]
#[test]
fn h5ad_full_and_backed_reads_agree() {
    use h5sweep::container::h5ad::H5adContainer;
    let dir = tempdir().unwrap();
    let path = dir.path().join("d25.h5ad");
    let ds = stamped_dataset(25, 30, 4);
    H5adContainer.write(&ds, &path).unwrap();
    assert_eq!(
        H5adContainer.read_checksum(&path).unwrap(),
        ds.checksum().unwrap()
    );
    let loaded = H5adContainer.read(&path, AccessMode::Backed).unwrap();
    let LoadedDataset::Backed(mut handle) = loaded else {
        panic!("expected backed handle");
    };
    assert_eq!(handle.read_x().unwrap(), ds.x.clone().unwrap());
}
