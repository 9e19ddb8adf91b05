//! The in-memory dataset: one primary matrix plus per-axis annotations, extra
//! matrix slots and an auxiliary value mapping.

use crate::errors::{Result, SweepError};
use crate::sparse::Matrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which the primary matrix checksum is stored in `uns`.
pub const CHECKSUM_KEY: &str = "x_sum";

/// One annotation column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Integer(Vec<i32>),
    Dense(Vec<f64>),
    Boolean(Vec<bool>),
    Strings(Vec<String>),
    Categorical {
        codes: Vec<i32>,
        categories: Vec<String>,
    },
}

impl Column {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Integer(v) => v.len(),
            Column::Dense(v) => v.len(),
            Column::Boolean(v) => v.len(),
            Column::Strings(v) => v.len(),
            Column::Categorical { codes, .. } => codes.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Names plus annotation columns for one axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisFrame {
    pub index: Vec<String>,
    pub columns: BTreeMap<String, Column>,
}

impl AxisFrame {
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// A value in the auxiliary mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum UnsValue {
    Float(f64),
    Int(i64),
    Str(String),
    Bool(bool),
    Nested(BTreeMap<String, UnsValue>),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub n_obs: usize,
    pub n_vars: usize,
    pub x: Option<Matrix>,
    pub obs: AxisFrame,
    pub var: AxisFrame,
    pub layers: BTreeMap<String, Matrix>,
    pub obsm: BTreeMap<String, Matrix>,
    pub varm: BTreeMap<String, Matrix>,
    pub obsp: BTreeMap<String, Matrix>,
    pub varp: BTreeMap<String, Matrix>,
    pub uns: BTreeMap<String, UnsValue>,
}

impl Dataset {
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_obs, self.n_vars)
    }

    /// The stored checksum, if one has been stamped.
    #[must_use]
    pub fn checksum(&self) -> Option<f64> {
        match self.uns.get(CHECKSUM_KEY) {
            Some(UnsValue::Float(v)) => Some(*v),
            Some(UnsValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    /// Drop every optional slot except the axis annotations.
    pub fn strip_optional(&mut self) {
        self.layers.clear();
        self.obsm.clear();
        self.varm.clear();
        self.obsp.clear();
        self.varp.clear();
        self.uns.clear();
    }

    /// Check the axis-length invariants across every slot.
    pub fn validate(&self) -> Result<()> {
        let (n, m) = self.shape();
        if let Some(x) = &self.x {
            expect_shape((n, m), x.shape())?;
        }
        for (axis, frame) in [(n, &self.obs), (m, &self.var)] {
            expect_shape((axis, 1), (frame.len(), 1))?;
            for col in frame.columns.values() {
                expect_shape((axis, 1), (col.len(), 1))?;
            }
        }
        for mat in self.layers.values() {
            expect_shape((n, m), mat.shape())?;
        }
        for mat in self.obsm.values() {
            expect_rows(n, mat.shape())?;
        }
        for mat in self.varm.values() {
            expect_rows(m, mat.shape())?;
        }
        for mat in self.obsp.values() {
            expect_shape((n, n), mat.shape())?;
        }
        for mat in self.varp.values() {
            expect_shape((m, m), mat.shape())?;
        }
        Ok(())
    }
}

fn expect_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected != actual {
        return Err(SweepError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

fn expect_rows(rows: usize, actual: (usize, usize)) -> Result<()> {
    expect_shape((rows, actual.1), actual)
}
