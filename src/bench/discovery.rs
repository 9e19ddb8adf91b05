//! Locating sweep outputs on disk.

use crate::errors::{Result, SweepError};
use regex::Regex;
use std::path::{Path, PathBuf};

/// A dataset file named `d<n_obs>.<ext>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetFile {
    pub n_obs: usize,
    pub path: PathBuf,
}

/// File name for a sweep entry of `n_obs` rows.
#[must_use]
pub fn dataset_file_name(n_obs: usize, ext: &str) -> String {
    format!("d{n_obs}.{ext}")
}

/// Matcher for `d<n_obs>.<ext>` file names.
#[derive(Clone, Debug)]
pub struct DatasetPattern {
    re: Regex,
}

impl DatasetPattern {
    pub fn new(ext: &str) -> Result<Self> {
        let re = Regex::new(&format!(r"^d(\d+)\.{}$", regex::escape(ext)))
            .map_err(|e| SweepError::InvalidArgument(format!("dataset extension {ext:?}: {e}")))?;
        Ok(Self { re })
    }

    /// Parse the row count out of a dataset path; `None` when the name does not
    /// follow the sweep convention.
    #[must_use]
    pub fn parse(&self, path: &Path) -> Option<DatasetFile> {
        let name = path.file_name()?.to_str()?;
        let caps = self.re.captures(name)?;
        let n_obs = caps[1].parse().ok()?;
        Some(DatasetFile {
            n_obs,
            path: path.to_path_buf(),
        })
    }
}

/// Order dataset files by row count, smallest first.
pub fn sort_by_rows(files: &mut [DatasetFile]) {
    files.sort_by_key(|f| f.n_obs);
}

/// All `d<n>.<ext>` files directly inside `dir`, ascending by `n`.
///
/// # Errors
/// `Discovery` when the directory is missing or holds no matching file.
pub fn discover(dir: &Path, ext: &str) -> Result<Vec<DatasetFile>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SweepError::Discovery {
                dir: dir.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    let pattern = DatasetPattern::new(ext)?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(f) = pattern.parse(&entry.path()) {
            files.push(f);
        }
    }
    if files.is_empty() {
        return Err(SweepError::Discovery {
            dir: dir.to_path_buf(),
        });
    }
    sort_by_rows(&mut files);
    Ok(files)
}
