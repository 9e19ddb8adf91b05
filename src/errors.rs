use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[cfg(feature = "h5ad")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    /// A matrix chunk could not be materialized. Aborts the current sweep entry.
    #[error("allocation failed for {rows}x{cols} chunk with {nnz} stored values")]
    Allocation {
        rows: usize,
        cols: usize,
        nnz: usize,
    },

    /// No dataset files matched the naming convention.
    #[error("no datasets found in {}", dir.display())]
    Discovery { dir: PathBuf },

    /// The read path returned a sum that disagrees with the stored checksum.
    #[error(
        "validation failed for {}: X sum mismatch (expected {expected:.0}, got {actual:.0})",
        path.display()
    )]
    Validation {
        path: PathBuf,
        expected: f64,
        actual: f64,
    },

    #[error("need at least {min} timing samples, got {got}")]
    InsufficientSamples { got: usize, min: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("dataset has no primary matrix")]
    MissingMatrix,

    #[error("missing auxiliary value: {0}")]
    MissingUns(String),

    #[error("unknown generator type: {0}")]
    UnknownType(String),

    #[error("corrupt container: {0}")]
    Corrupt(String),

    #[error("feature not compiled: {0}")]
    FeatureNotCompiled(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;
