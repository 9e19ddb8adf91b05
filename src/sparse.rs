//! In-memory matrix layouts: dense row-major, CSR and CSC over `f32` or `i32`
//! values.
//!
//! Index arrays use `u32` for row/column indices and `u64` for pointer arrays.
//! Every buffer that scales with the stored-entry count is reserved fallibly so
//! that an oversized request surfaces as [`SweepError::Allocation`] instead of
//! aborting the process.

use crate::errors::{Result, SweepError};
use crate::num::{expected_nnz, u32_to_usize, u64_to_usize, usize_to_u32, usize_to_u64};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Element type of a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DType {
    F32,
    I32,
}

/// Stored values of a matrix, tagged by element type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Values {
    F32(Vec<f32>),
    I32(Vec<i32>),
}

fn alloc_error(shape: (usize, usize), nnz: usize) -> SweepError {
    SweepError::Allocation {
        rows: shape.0,
        cols: shape.1,
        nnz,
    }
}

fn try_vec<T>(len: usize, shape: (usize, usize), nnz: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| alloc_error(shape, nnz))?;
    Ok(v)
}

fn try_reserve<T>(
    v: &mut Vec<T>,
    additional: usize,
    shape: (usize, usize),
    nnz: usize,
) -> Result<()> {
    v.try_reserve(additional)
        .map_err(|_| alloc_error(shape, nnz))
}

impl Values {
    fn with_capacity(dtype: DType, cap: usize, shape: (usize, usize)) -> Result<Self> {
        Ok(match dtype {
            DType::F32 => Values::F32(try_vec(cap, shape, cap)?),
            DType::I32 => Values::I32(try_vec(cap, shape, cap)?),
        })
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        match self {
            Values::F32(_) => DType::F32,
            Values::I32(_) => DType::I32,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Values::F32(v) => v.len(),
            Values::I32(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all values, accumulated in `f64`.
    #[must_use]
    pub fn sum(&self) -> f64 {
        match self {
            Values::F32(v) => v.iter().map(|&x| f64::from(x)).sum(),
            Values::I32(v) => v.iter().map(|&x| f64::from(x)).sum(),
        }
    }

    /// Value at `i` widened to `f64`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<f64> {
        match self {
            Values::F32(v) => v.get(i).map(|&x| f64::from(x)),
            Values::I32(v) => v.get(i).map(|&x| f64::from(x)),
        }
    }

    fn push_random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self {
            Values::F32(v) => v.push(rng.random::<f32>()),
            Values::I32(v) => v.push(rng.random_range(1..=100)),
        }
    }

    fn append(&mut self, other: Values, shape: (usize, usize)) -> Result<()> {
        match (self, other) {
            (Values::F32(a), Values::F32(b)) => {
                try_reserve(a, b.len(), shape, b.len())?;
                a.extend(b);
            }
            (Values::I32(a), Values::I32(b)) => {
                try_reserve(a, b.len(), shape, b.len())?;
                a.extend(b);
            }
            (a, b) => {
                return Err(SweepError::InvalidArgument(format!(
                    "cannot stack {:?} values onto {:?}",
                    b.dtype(),
                    a.dtype()
                )));
            }
        }
        Ok(())
    }
}

/// Dense row-major matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    pub shape: (usize, usize),
    pub data: Values,
}

impl DenseMatrix {
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        dtype: DType,
        rng: &mut R,
    ) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or(SweepError::Allocation {
                rows,
                cols,
                nnz: usize::MAX,
            })?;
        let mut data = Values::with_capacity(dtype, len, (rows, cols))?;
        for _ in 0..len {
            data.push_random(rng);
        }
        Ok(Self {
            shape: (rows, cols),
            data,
        })
    }
}

/// Compressed sparse row matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    pub shape: (usize, usize),
    pub indptr: Vec<u64>,
    pub indices: Vec<u32>,
    pub data: Values,
}

/// Compressed sparse column matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CscMatrix {
    pub shape: (usize, usize),
    pub indptr: Vec<u64>,
    pub indices: Vec<u32>,
    pub data: Values,
}

fn check_density(density: f64) -> Result<()> {
    if !density.is_finite() || !(0.0..=1.0).contains(&density) {
        return Err(SweepError::InvalidArgument(format!(
            "density must be in [0, 1], got {density}"
        )));
    }
    Ok(())
}

/// Check the structural invariants shared by CSR and CSC: pointer length and
/// monotonicity, total count, and minor-axis bounds.
fn check_compressed(
    major: usize,
    minor: usize,
    indptr: &[u64],
    indices: &[u32],
    data_len: usize,
) -> Result<()> {
    if indptr.len() != major + 1 {
        return Err(SweepError::Corrupt(format!(
            "indptr has {} entries, expected {}",
            indptr.len(),
            major + 1
        )));
    }
    if indptr.first() != Some(&0) || indptr.windows(2).any(|w| w[0] > w[1]) {
        return Err(SweepError::Corrupt("indptr is not monotonically increasing from 0".into()));
    }
    let last = u64_to_usize(indptr[major])?;
    if last != indices.len() || last != data_len {
        return Err(SweepError::Corrupt(format!(
            "indptr ends at {last} but there are {} indices and {data_len} values",
            indices.len()
        )));
    }
    if indices.iter().any(|&i| u32_to_usize(i) >= minor) {
        return Err(SweepError::Corrupt(format!("index out of bounds for axis of length {minor}")));
    }
    Ok(())
}

impl CsrMatrix {
    /// A matrix with zero rows, ready to have chunks appended.
    #[must_use]
    pub fn empty(cols: usize, dtype: DType) -> Self {
        let data = match dtype {
            DType::F32 => Values::F32(Vec::new()),
            DType::I32 => Values::I32(Vec::new()),
        };
        Self {
            shape: (0, cols),
            indptr: vec![0],
            indices: Vec::new(),
            data,
        }
    }

    /// Random sparse matrix with `round(density * rows * cols)` stored entries at
    /// distinct positions. Entries are spread across rows uniformly at random;
    /// columns within a row are sorted.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        density: f64,
        dtype: DType,
        rng: &mut R,
    ) -> Result<Self> {
        check_density(density)?;
        usize_to_u32(cols)?;
        let shape = (rows, cols);
        let nnz = expected_nnz(rows, cols, density);

        let mut counts: Vec<usize> = try_vec(rows, shape, nnz)?;
        if nnz == rows.saturating_mul(cols) {
            counts.resize(rows, cols);
        } else {
            counts.resize(rows, 0);
            let mut remaining = nnz;
            while remaining > 0 {
                let r = rng.random_range(0..rows);
                if counts[r] < cols {
                    counts[r] += 1;
                    remaining -= 1;
                }
            }
        }

        let mut indptr: Vec<u64> = try_vec(rows + 1, shape, nnz)?;
        let mut indices: Vec<u32> = try_vec(nnz, shape, nnz)?;
        let mut data = Values::with_capacity(dtype, nnz, shape)?;
        indptr.push(0);
        for &count in &counts {
            let mut picked = rand::seq::index::sample(rng, cols, count).into_vec();
            picked.sort_unstable();
            for c in picked {
                indices.push(c as u32);
                data.push_random(rng);
            }
            indptr.push(usize_to_u64(indices.len()));
        }
        Ok(Self {
            shape,
            indptr,
            indices,
            data,
        })
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Append `chunk` below the current rows. The chunk is consumed so its
    /// buffers are released as soon as they are copied.
    pub fn append_rows(&mut self, chunk: CsrMatrix) -> Result<()> {
        if chunk.shape.1 != self.shape.1 {
            return Err(SweepError::ShapeMismatch {
                expected: (chunk.shape.0, self.shape.1),
                actual: chunk.shape,
            });
        }
        let grown = (self.shape.0 + chunk.shape.0, self.shape.1);
        let base = usize_to_u64(self.nnz());
        let total = self.nnz() + chunk.nnz();
        try_reserve(&mut self.indptr, chunk.shape.0, grown, total)?;
        try_reserve(&mut self.indices, chunk.nnz(), grown, total)?;
        self.data.append(chunk.data, grown)?;
        self.indices.extend_from_slice(&chunk.indices);
        self.indptr.extend(chunk.indptr.iter().skip(1).map(|&p| p + base));
        self.shape = grown;
        Ok(())
    }

    /// Convert to column-compressed layout. Rows within each column stay in
    /// ascending order.
    pub fn to_csc(&self) -> Result<CscMatrix> {
        let cols = self.shape.1;
        let nnz = self.nnz();
        let mut indptr: Vec<u64> = try_vec(cols + 1, self.shape, nnz)?;
        indptr.resize(cols + 1, 0);
        for &c in &self.indices {
            indptr[u32_to_usize(c) + 1] += 1;
        }
        for j in 0..cols {
            indptr[j + 1] += indptr[j];
        }
        let cursor = indptr.clone();
        let mut row_idx: Vec<u32> = try_vec(nnz, self.shape, nnz)?;
        row_idx.resize(nnz, 0);
        let mut data = Values::with_capacity(self.dtype(), nnz, self.shape)?;
        match (&self.data, &mut data) {
            (Values::F32(src), Values::F32(dst)) => {
                self.scatter_by_column(src, cursor, &mut row_idx, dst)
            }
            (Values::I32(src), Values::I32(dst)) => {
                self.scatter_by_column(src, cursor, &mut row_idx, dst)
            }
            _ => unreachable!("with_capacity preserves dtype"),
        }
        Ok(CscMatrix {
            shape: self.shape,
            indptr,
            indices: row_idx,
            data,
        })
    }

    /// Move every stored entry to its column-major slot. `cursor` starts as the
    /// CSC pointer array; `dst` must have capacity for all values.
    fn scatter_by_column<T: Copy + Default>(
        &self,
        src: &[T],
        mut cursor: Vec<u64>,
        row_idx: &mut [u32],
        dst: &mut Vec<T>,
    ) {
        dst.resize(src.len(), T::default());
        for r in 0..self.shape.0 {
            for k in self.indptr[r] as usize..self.indptr[r + 1] as usize {
                let c = u32_to_usize(self.indices[k]);
                let dest = cursor[c] as usize;
                cursor[c] += 1;
                row_idx[dest] = r as u32;
                dst[dest] = src[k];
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_compressed(
            self.shape.0,
            self.shape.1,
            &self.indptr,
            &self.indices,
            self.data.len(),
        )
    }

    /// All stored entries as `(row, col, value)`, in storage order.
    #[must_use]
    pub fn triplets(&self) -> Vec<(usize, usize, f64)> {
        let mut out = Vec::with_capacity(self.nnz());
        for r in 0..self.shape.0 {
            for k in self.indptr[r] as usize..self.indptr[r + 1] as usize {
                out.push((r, u32_to_usize(self.indices[k]), self.data.get(k).unwrap_or_default()));
            }
        }
        out
    }
}

impl CscMatrix {
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        density: f64,
        dtype: DType,
        rng: &mut R,
    ) -> Result<Self> {
        CsrMatrix::random(rows, cols, density, dtype, rng)?.to_csc()
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn validate(&self) -> Result<()> {
        check_compressed(
            self.shape.1,
            self.shape.0,
            &self.indptr,
            &self.indices,
            self.data.len(),
        )
    }

    /// All stored entries as `(row, col, value)`, in storage order.
    #[must_use]
    pub fn triplets(&self) -> Vec<(usize, usize, f64)> {
        let mut out = Vec::with_capacity(self.nnz());
        for c in 0..self.shape.1 {
            for k in self.indptr[c] as usize..self.indptr[c + 1] as usize {
                out.push((u32_to_usize(self.indices[k]), c, self.data.get(k).unwrap_or_default()));
            }
        }
        out
    }
}

/// Any primary or auxiliary matrix a dataset can hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Matrix {
    Dense(DenseMatrix),
    Csr(CsrMatrix),
    Csc(CscMatrix),
}

impl Matrix {
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(m) => m.shape,
            Matrix::Csr(m) => m.shape,
            Matrix::Csc(m) => m.shape,
        }
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.stored_values().dtype()
    }

    /// The explicitly stored values. For dense matrices that is every cell.
    #[must_use]
    pub fn stored_values(&self) -> &Values {
        match self {
            Matrix::Dense(m) => &m.data,
            Matrix::Csr(m) => &m.data,
            Matrix::Csc(m) => &m.data,
        }
    }

    /// Sum of stored (non-implicit-zero) values.
    #[must_use]
    pub fn stored_sum(&self) -> f64 {
        self.stored_values().sum()
    }

    /// Encoding name in the AnnData convention.
    #[must_use]
    pub fn encoding(&self) -> &'static str {
        match self {
            Matrix::Dense(_) => "array",
            Matrix::Csr(_) => "csr_matrix",
            Matrix::Csc(_) => "csc_matrix",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Matrix::Dense(m) => {
                if m.data.len() != m.shape.0 * m.shape.1 {
                    return Err(SweepError::Corrupt(format!(
                        "dense matrix {:?} holds {} values",
                        m.shape,
                        m.data.len()
                    )));
                }
                Ok(())
            }
            Matrix::Csr(m) => m.validate(),
            Matrix::Csc(m) => m.validate(),
        }
    }
}
