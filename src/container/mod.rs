//! Durable dataset storage.
//!
//! A [`Container`] writes a [`Dataset`] to one file and reads it back either
//! fully into memory or as a lazily realized handle. Two formats exist:
//! `native` (always available) and `h5ad` (cargo feature `h5ad`).
pub mod native;

#[cfg(feature = "h5ad")]
pub mod h5ad;

use crate::dataset::{CHECKSUM_KEY, Dataset, UnsValue};
use crate::errors::{Result, SweepError};
use crate::features;
use crate::sparse::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How a dataset is read back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    /// Everything is decoded into memory on load.
    Full,
    /// Storage is opened on load; X is realized only on explicit request.
    Backed,
}

impl AccessMode {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AccessMode::Full => "memory",
            AccessMode::Backed => "backed",
        }
    }
}

/// On-disk format of dataset files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Native,
    H5ad,
}

impl ContainerFormat {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ContainerFormat::Native => "native",
            ContainerFormat::H5ad => "h5ad",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ContainerFormat::Native => native::EXTENSION,
            ContainerFormat::H5ad => "h5ad",
        }
    }

    /// Whether the backend for this format was compiled in.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            ContainerFormat::Native => true,
            ContainerFormat::H5ad => features::is_compiled("h5ad"),
        }
    }

    /// Instantiate the backend.
    ///
    /// # Errors
    /// `FeatureNotCompiled` when the format needs a cargo feature this build lacks.
    pub fn open(self) -> Result<Box<dyn Container>> {
        match self {
            ContainerFormat::Native => Ok(Box::new(native::NativeContainer)),
            #[cfg(feature = "h5ad")]
            ContainerFormat::H5ad => Ok(Box::new(h5ad::H5adContainer)),
            #[cfg(not(feature = "h5ad"))]
            ContainerFormat::H5ad => Err(SweepError::FeatureNotCompiled(
                "the h5ad format needs the `h5ad` cargo feature".into(),
            )),
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContainerFormat {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(ContainerFormat::Native),
            "h5ad" => Ok(ContainerFormat::H5ad),
            other => Err(SweepError::Config(format!("unknown container format: {other}"))),
        }
    }
}

/// A dataset opened in backed mode. Metadata is available immediately; X is
/// read from storage by [`BackedDataset::read_x`].
pub trait BackedDataset {
    fn shape(&self) -> (usize, usize);
    fn uns(&self) -> &BTreeMap<String, UnsValue>;
    fn read_x(&mut self) -> Result<Matrix>;
}

/// Result of [`Container::read`].
pub enum LoadedDataset {
    InMemory(Dataset),
    Backed(Box<dyn BackedDataset>),
}

impl LoadedDataset {
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match self {
            LoadedDataset::InMemory(ds) => ds.shape(),
            LoadedDataset::Backed(b) => b.shape(),
        }
    }
}

pub trait Container {
    fn format(&self) -> ContainerFormat;

    /// Create or overwrite `path` with `dataset`.
    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()>;

    fn read(&self, path: &Path, mode: AccessMode) -> Result<LoadedDataset>;

    /// Read the stored `x_sum` without touching X.
    fn read_checksum(&self, path: &Path) -> Result<f64>;

    fn extension(&self) -> &'static str {
        self.format().extension()
    }
}

/// Pull the checksum out of an auxiliary mapping.
pub(crate) fn checksum_from_uns(uns: &BTreeMap<String, UnsValue>, path: &Path) -> Result<f64> {
    match uns.get(CHECKSUM_KEY) {
        Some(UnsValue::Float(v)) => Ok(*v),
        Some(UnsValue::Int(v)) => Ok(*v as f64),
        _ => Err(SweepError::MissingUns(format!("{CHECKSUM_KEY} in {}", path.display()))),
    }
}
