use crate::errors::SweepError;
use crate::sparse::DType;
use std::fmt;
use std::str::FromStr;

/// Matrix generators available for X, layers and the embedding/pairwise slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    FloatMatrix,
    IntegerMatrix,
    FloatCsparse,
    FloatRsparse,
    IntegerCsparse,
    IntegerRsparse,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 6] = [
        MatrixKind::FloatMatrix,
        MatrixKind::IntegerMatrix,
        MatrixKind::FloatCsparse,
        MatrixKind::FloatRsparse,
        MatrixKind::IntegerCsparse,
        MatrixKind::IntegerRsparse,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatrixKind::FloatMatrix => "float_matrix",
            MatrixKind::IntegerMatrix => "integer_matrix",
            MatrixKind::FloatCsparse => "float_csparse",
            MatrixKind::FloatRsparse => "float_rsparse",
            MatrixKind::IntegerCsparse => "integer_csparse",
            MatrixKind::IntegerRsparse => "integer_rsparse",
        }
    }

    #[must_use]
    pub fn dtype(self) -> DType {
        match self {
            MatrixKind::FloatMatrix | MatrixKind::FloatCsparse | MatrixKind::FloatRsparse => {
                DType::F32
            }
            MatrixKind::IntegerMatrix
            | MatrixKind::IntegerCsparse
            | MatrixKind::IntegerRsparse => DType::I32,
        }
    }
}

/// Per-axis annotation column generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VectorKind {
    IntegerArray,
    DenseArray,
    BooleanArray,
    StringArray,
    Categorical,
}

impl VectorKind {
    pub const ALL: [VectorKind; 5] = [
        VectorKind::IntegerArray,
        VectorKind::DenseArray,
        VectorKind::BooleanArray,
        VectorKind::StringArray,
        VectorKind::Categorical,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VectorKind::IntegerArray => "integer_array",
            VectorKind::DenseArray => "dense_array",
            VectorKind::BooleanArray => "boolean_array",
            VectorKind::StringArray => "string_array",
            VectorKind::Categorical => "categorical",
        }
    }
}

/// Scalar generators for the auxiliary mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Integer,
    Float,
    String,
    Boolean,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 4] = [
        ScalarKind::Integer,
        ScalarKind::Float,
        ScalarKind::String,
        ScalarKind::Boolean,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Integer => "scalar_integer",
            ScalarKind::Float => "scalar_float",
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
        }
    }
}

macro_rules! kind_str_impls {
    ($($ty:ty),*) => {$(
        impl FromStr for $ty {
            type Err = SweepError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|k| k.as_str() == s)
                    .ok_or_else(|| SweepError::UnknownType(s.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

kind_str_impls!(MatrixKind, VectorKind, ScalarKind);

/// Parse a list of generator names, failing on the first unknown one.
pub fn parse_kinds<T: FromStr<Err = SweepError>>(names: &[&str]) -> Result<Vec<T>, SweepError> {
    names.iter().map(|n| n.parse()).collect()
}
