//! Small fixture files for functionality tests of container readers.
//!
//! Besides one file per primary-matrix type and a complete file, a chain of
//! reduced variants is written for readers that only cope with part of the
//! layout: `dummy_obsp` drops the dense pairwise obs matrices, `dummy_varp`
//! also drops the dense pairwise var matrices, and `dummy_uns` also drops the
//! nested auxiliary mapping.

use crate::container::Container;
use crate::dataset::Dataset;
use crate::errors::Result;
use crate::fsutil::ensure_dir;
use crate::synthetic::{GenerationRequest, MatrixKind, generate_dataset};
use rand::Rng;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DENSE_KINDS: [MatrixKind; 2] = [MatrixKind::FloatMatrix, MatrixKind::IntegerMatrix];
const NESTED_UNS_KEY: &str = "nested";

fn drop_dense<V>(slot: &mut BTreeMap<String, V>) {
    for kind in DENSE_KINDS {
        slot.remove(kind.as_str());
    }
}

fn write_fixture(
    container: &dyn Container,
    dir: &Path,
    stem: &str,
    ds: &Dataset,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = dir.join(format!("{stem}.{}", container.extension()));
    container.write(ds, &path)?;
    log::info!("wrote {}", path.display());
    written.push(path);
    Ok(())
}

/// Write `dummy_x_<type>.<ext>` for every primary-matrix type, with only X and
/// the axis annotations, then `dummy_complete.<ext>` with every slot populated,
/// then the `dummy_obsp`, `dummy_varp` and `dummy_uns` variants. Returns the
/// written paths in that order.
pub fn generate_fixtures<R: Rng + ?Sized>(
    dir: &Path,
    n_obs: usize,
    n_vars: usize,
    container: &dyn Container,
    rng: &mut R,
) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;
    let mut written = Vec::with_capacity(MatrixKind::ALL.len() + 4);

    for kind in MatrixKind::ALL {
        let mut ds = generate_dataset(&GenerationRequest::complete(n_obs, n_vars, kind), rng)?;
        ds.strip_optional();
        let stem = format!("dummy_x_{kind}");
        write_fixture(container, dir, &stem, &ds, &mut written)?;
    }

    let complete = GenerationRequest::complete(n_obs, n_vars, MatrixKind::IntegerMatrix);
    let ds = generate_dataset(&complete, rng)?;
    write_fixture(container, dir, "dummy_complete", &ds, &mut written)?;

    // Each reduced variant builds on the previous one.
    let mut ds = generate_dataset(&complete, rng)?;
    drop_dense(&mut ds.obsp);
    write_fixture(container, dir, "dummy_obsp", &ds, &mut written)?;
    drop_dense(&mut ds.varp);
    write_fixture(container, dir, "dummy_varp", &ds, &mut written)?;
    ds.uns.remove(NESTED_UNS_KEY);
    write_fixture(container, dir, "dummy_uns", &ds, &mut written)?;
    Ok(written)
}
