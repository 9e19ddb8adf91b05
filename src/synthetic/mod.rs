//! Random dataset generation with explicit per-slot type lists.
//!
//! Every slot of a [`Dataset`] gets one entry per requested generator kind,
//! named after the kind (`obs["integer_array"]`, `layers["float_csparse"]`, ...).
pub mod kinds;

pub use kinds::{MatrixKind, ScalarKind, VectorKind, parse_kinds};

use crate::dataset::{AxisFrame, Column, Dataset, UnsValue};
use crate::errors::Result;
use crate::sparse::{CscMatrix, CsrMatrix, DenseMatrix, Matrix};
use fake::Fake;
use fake::faker::lorem::en::Word;
use rand::Rng;
use std::collections::BTreeMap;

/// Density of randomly generated sparse slots.
pub const SPARSE_FIELD_DENSITY: f64 = 0.1;
/// Column count of generated obsm/varm embeddings.
pub const EMBEDDING_DIM: usize = 10;

const CATEGORIES: [&str; 3] = ["Value1", "Value2", "Value3"];

/// What to generate, slot by slot. An empty list leaves the slot empty and
/// `x_type: None` leaves the primary matrix unset.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub n_obs: usize,
    pub n_vars: usize,
    pub x_type: Option<MatrixKind>,
    pub layer_types: Vec<MatrixKind>,
    pub obs_types: Vec<VectorKind>,
    pub var_types: Vec<VectorKind>,
    pub obsm_types: Vec<MatrixKind>,
    pub varm_types: Vec<MatrixKind>,
    pub obsp_types: Vec<MatrixKind>,
    pub varp_types: Vec<MatrixKind>,
    pub uns_types: Vec<ScalarKind>,
    pub nested_uns_types: Vec<ScalarKind>,
}

impl GenerationRequest {
    /// Nothing but the axis indexes.
    #[must_use]
    pub fn empty(n_obs: usize, n_vars: usize) -> Self {
        Self {
            n_obs,
            n_vars,
            x_type: None,
            layer_types: Vec::new(),
            obs_types: Vec::new(),
            var_types: Vec::new(),
            obsm_types: Vec::new(),
            varm_types: Vec::new(),
            obsp_types: Vec::new(),
            varp_types: Vec::new(),
            uns_types: Vec::new(),
            nested_uns_types: Vec::new(),
        }
    }

    /// Every generator in every slot.
    #[must_use]
    pub fn complete(n_obs: usize, n_vars: usize, x_type: MatrixKind) -> Self {
        Self {
            x_type: Some(x_type),
            layer_types: MatrixKind::ALL.to_vec(),
            obs_types: VectorKind::ALL.to_vec(),
            var_types: VectorKind::ALL.to_vec(),
            obsm_types: MatrixKind::ALL.to_vec(),
            varm_types: MatrixKind::ALL.to_vec(),
            obsp_types: MatrixKind::ALL.to_vec(),
            varp_types: MatrixKind::ALL.to_vec(),
            uns_types: ScalarKind::ALL.to_vec(),
            nested_uns_types: ScalarKind::ALL.to_vec(),
            ..Self::empty(n_obs, n_vars)
        }
    }
}

/// Build a dataset according to `req`.
pub fn generate_dataset<R: Rng + ?Sized>(req: &GenerationRequest, rng: &mut R) -> Result<Dataset> {
    let (n, m) = (req.n_obs, req.n_vars);
    let mut ds = Dataset {
        n_obs: n,
        n_vars: m,
        obs: axis_frame("Cell", n, &req.obs_types, rng),
        var: axis_frame("Gene", m, &req.var_types, rng),
        ..Dataset::default()
    };
    if let Some(kind) = req.x_type {
        ds.x = Some(random_matrix(kind, n, m, rng)?);
    }
    ds.layers = matrices(&req.layer_types, n, m, rng)?;
    ds.obsm = matrices(&req.obsm_types, n, EMBEDDING_DIM, rng)?;
    ds.varm = matrices(&req.varm_types, m, EMBEDDING_DIM, rng)?;
    ds.obsp = matrices(&req.obsp_types, n, n, rng)?;
    ds.varp = matrices(&req.varp_types, m, m, rng)?;
    ds.uns = scalars(&req.uns_types, rng);
    if !req.nested_uns_types.is_empty() {
        ds.uns.insert(
            "nested".into(),
            UnsValue::Nested(scalars(&req.nested_uns_types, rng)),
        );
    }
    Ok(ds)
}

/// One random matrix of the given kind and shape.
pub fn random_matrix<R: Rng + ?Sized>(
    kind: MatrixKind,
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<Matrix> {
    let dtype = kind.dtype();
    Ok(match kind {
        MatrixKind::FloatMatrix | MatrixKind::IntegerMatrix => {
            Matrix::Dense(DenseMatrix::random(rows, cols, dtype, rng)?)
        }
        MatrixKind::FloatRsparse | MatrixKind::IntegerRsparse => {
            Matrix::Csr(CsrMatrix::random(rows, cols, SPARSE_FIELD_DENSITY, dtype, rng)?)
        }
        MatrixKind::FloatCsparse | MatrixKind::IntegerCsparse => {
            Matrix::Csc(CscMatrix::random(rows, cols, SPARSE_FIELD_DENSITY, dtype, rng)?)
        }
    })
}

fn matrices<R: Rng + ?Sized>(
    kinds: &[MatrixKind],
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> Result<BTreeMap<String, Matrix>> {
    kinds
        .iter()
        .map(|&k| Ok((k.as_str().to_string(), random_matrix(k, rows, cols, rng)?)))
        .collect()
}

fn axis_frame<R: Rng + ?Sized>(
    prefix: &str,
    len: usize,
    kinds: &[VectorKind],
    rng: &mut R,
) -> AxisFrame {
    let index = (0..len).map(|i| format!("{prefix}{i:03}")).collect();
    let columns = kinds
        .iter()
        .map(|&k| (k.as_str().to_string(), random_column(k, len, rng)))
        .collect();
    AxisFrame { index, columns }
}

fn random_column<R: Rng + ?Sized>(kind: VectorKind, len: usize, rng: &mut R) -> Column {
    match kind {
        VectorKind::IntegerArray => {
            Column::Integer((0..len).map(|_| rng.random_range(0..100)).collect())
        }
        VectorKind::DenseArray => Column::Dense((0..len).map(|_| rng.random::<f64>()).collect()),
        VectorKind::BooleanArray => {
            Column::Boolean((0..len).map(|_| rng.random_bool(0.5)).collect())
        }
        VectorKind::StringArray => {
            Column::Strings((0..len).map(|_| Word().fake_with_rng::<String, _>(rng)).collect())
        }
        VectorKind::Categorical => Column::Categorical {
            codes: (0..len).map(|_| rng.random_range(0..CATEGORIES.len() as i32)).collect(),
            categories: CATEGORIES.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn scalars<R: Rng + ?Sized>(kinds: &[ScalarKind], rng: &mut R) -> BTreeMap<String, UnsValue> {
    kinds
        .iter()
        .map(|&k| {
            let v = match k {
                ScalarKind::Integer => UnsValue::Int(rng.random_range(0..100)),
                ScalarKind::Float => UnsValue::Float(rng.random()),
                ScalarKind::String => UnsValue::Str(Word().fake_with_rng::<String, _>(rng)),
                ScalarKind::Boolean => UnsValue::Bool(rng.random_bool(0.5)),
            };
            (k.as_str().to_string(), v)
        })
        .collect()
}
