//! The two ways a dataset is read back during timing.

use crate::container::{AccessMode, BackedDataset, Container, LoadedDataset};
use crate::dataset::Dataset;
use crate::errors::{Result, SweepError};
use std::hint::black_box;
use std::path::Path;

/// Load a dataset, then force X so the read is complete.
pub trait ReadStrategy {
    type Handle;

    fn mode(&self) -> AccessMode;

    fn load(&self, path: &Path) -> Result<Self::Handle>;

    /// Make X resident and return the sum of its stored values.
    fn force(&self, handle: Self::Handle) -> Result<f64>;
}

/// Everything is decoded on load; forcing only sums X.
pub struct InMemoryRead<'a> {
    container: &'a dyn Container,
}

impl<'a> InMemoryRead<'a> {
    #[must_use]
    pub fn new(container: &'a dyn Container) -> Self {
        Self { container }
    }
}

impl ReadStrategy for InMemoryRead<'_> {
    type Handle = Dataset;

    fn mode(&self) -> AccessMode {
        AccessMode::Full
    }

    fn load(&self, path: &Path) -> Result<Dataset> {
        match self.container.read(path, AccessMode::Full)? {
            LoadedDataset::InMemory(ds) => Ok(ds),
            LoadedDataset::Backed(_) => Err(SweepError::InvalidArgument(format!(
                "{} backend returned a backed handle for a full read",
                self.container.format()
            ))),
        }
    }

    fn force(&self, handle: Dataset) -> Result<f64> {
        handle.x.as_ref().map(|x| x.stored_sum()).ok_or(SweepError::MissingMatrix)
    }
}

/// Storage is opened on load; X is read from it only when forced.
pub struct BackedRead<'a> {
    container: &'a dyn Container,
}

impl<'a> BackedRead<'a> {
    #[must_use]
    pub fn new(container: &'a dyn Container) -> Self {
        Self { container }
    }
}

impl ReadStrategy for BackedRead<'_> {
    type Handle = Box<dyn BackedDataset>;

    fn mode(&self) -> AccessMode {
        AccessMode::Backed
    }

    fn load(&self, path: &Path) -> Result<Box<dyn BackedDataset>> {
        match self.container.read(path, AccessMode::Backed)? {
            LoadedDataset::Backed(b) => Ok(b),
            LoadedDataset::InMemory(_) => Err(SweepError::InvalidArgument(format!(
                "{} backend returned an in-memory dataset for a backed read",
                self.container.format()
            ))),
        }
    }

    fn force(&self, mut handle: Box<dyn BackedDataset>) -> Result<f64> {
        Ok(handle.read_x()?.stored_sum())
    }
}

/// One load followed by one force; the handle is dropped before returning.
pub fn read_and_force<S: ReadStrategy + ?Sized>(strategy: &S, path: &Path) -> Result<f64> {
    let handle = strategy.load(path)?;
    let sum = strategy.force(handle)?;
    Ok(black_box(sum))
}
