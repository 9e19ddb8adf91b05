//! HDF5 container in the AnnData (`.h5ad`) group layout.
//!
//! Every element carries `encoding-type` and `encoding-version` attributes.
//! `X`, layers and the embedding/pairwise slots are written as 2-D `array`
//! datasets or as `csr_matrix`/`csc_matrix` groups with `data`/`indices`/
//! `indptr` and a `shape` attribute. `obs`/`var` are `dataframe` groups holding
//! an `_index` string dataset, one element per annotation column and a
//! `column-order` attribute. `uns` is a `dict` group of scalar datasets, nested
//! maps become `dict` subgroups.
//!
//! Requires the `h5ad` cargo feature and a system HDF5 library.

use super::{AccessMode, BackedDataset, Container, ContainerFormat, LoadedDataset};
use crate::dataset::{AxisFrame, CHECKSUM_KEY, Column, Dataset, UnsValue};
use crate::errors::{Result, SweepError};
use crate::fsutil::{ensure_dir, partial_path};
use crate::num::{u64_to_usize, usize_to_u64};
use crate::sparse::{CscMatrix, CsrMatrix, DenseMatrix, Matrix, Values};
use hdf5::types::{TypeDescriptor, VarLenUnicode};
use hdf5::{File, Group, Location};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

const MATRIX_SLOTS: [&str; 5] = ["layers", "obsm", "varm", "obsp", "varp"];
const INDEX: &str = "_index";

fn varlen(s: &str) -> Result<VarLenUnicode> {
    VarLenUnicode::from_str(s)
        .map_err(|e| SweepError::InvalidArgument(format!("not storable as HDF5 string: {e}")))
}

fn varlens(values: &[String]) -> Result<Vec<VarLenUnicode>> {
    values.iter().map(|x| varlen(x)).collect()
}

fn write_str_attr(loc: &Location, name: &str, value: &str) -> Result<()> {
    loc.new_attr::<VarLenUnicode>().create(name)?.write_scalar(&varlen(value)?)?;
    Ok(())
}

fn read_str_attr(loc: &Location, name: &str) -> Result<String> {
    Ok(loc.attr(name)?.read_scalar::<VarLenUnicode>()?.as_str().to_string())
}

/// Version AnnData pairs with each encoding type.
fn encoding_version(encoding: &str) -> &'static str {
    match encoding {
        "anndata" | "dict" | "csr_matrix" | "csc_matrix" => "0.1.0",
        _ => "0.2.0",
    }
}

fn write_encoding(loc: &Location, encoding: &str) -> Result<()> {
    write_str_attr(loc, "encoding-type", encoding)?;
    write_str_attr(loc, "encoding-version", encoding_version(encoding))
}

fn shape_attr(rows: usize, cols: usize) -> [u64; 2] {
    [usize_to_u64(rows), usize_to_u64(cols)]
}

fn write_values(group: &Group, name: &str, values: &Values) -> Result<()> {
    match values {
        Values::F32(v) => group.new_dataset_builder().with_data(v.as_slice()).create(name)?,
        Values::I32(v) => group.new_dataset_builder().with_data(v.as_slice()).create(name)?,
    };
    Ok(())
}

fn read_values(ds: &hdf5::Dataset) -> Result<Values> {
    match ds.dtype()?.to_descriptor()? {
        TypeDescriptor::Float(_) => Ok(Values::F32(ds.read_raw::<f32>()?)),
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            Ok(Values::I32(ds.read_raw::<i32>()?))
        }
        other => Err(SweepError::Corrupt(format!("unsupported matrix dtype {other:?}"))),
    }
}

fn write_dense(parent: &Group, name: &str, m: &DenseMatrix) -> Result<()> {
    let ds = match &m.data {
        Values::F32(v) => {
            let ds = parent.new_dataset::<f32>().shape(m.shape).create(name)?;
            ds.write_raw(v.as_slice())?;
            ds
        }
        Values::I32(v) => {
            let ds = parent.new_dataset::<i32>().shape(m.shape).create(name)?;
            ds.write_raw(v.as_slice())?;
            ds
        }
    };
    write_encoding(&ds, "array")
}

fn write_matrix(parent: &Group, name: &str, matrix: &Matrix) -> Result<()> {
    let (rows, cols) = matrix.shape();
    let (indptr, indices, data) = match matrix {
        Matrix::Dense(m) => return write_dense(parent, name, m),
        Matrix::Csr(m) => (&m.indptr, &m.indices, &m.data),
        Matrix::Csc(m) => (&m.indptr, &m.indices, &m.data),
    };
    let group = parent.create_group(name)?;
    write_encoding(&group, matrix.encoding())?;
    group.new_attr_builder().with_data(&shape_attr(rows, cols)[..]).create("shape")?;
    write_values(&group, "data", data)?;
    group.new_dataset_builder().with_data(indices.as_slice()).create("indices")?;
    group.new_dataset_builder().with_data(indptr.as_slice()).create("indptr")?;
    Ok(())
}

fn read_matrix(parent: &Group, name: &str) -> Result<Matrix> {
    if let Ok(group) = parent.group(name) {
        let shape = group.attr("shape")?.read_raw::<u64>()?;
        let [rows, cols] = shape[..] else {
            return Err(SweepError::Corrupt(format!(
                "{name}: shape attribute has {} entries",
                shape.len()
            )));
        };
        let shape = (u64_to_usize(rows)?, u64_to_usize(cols)?);
        let indptr = group.dataset("indptr")?.read_raw::<u64>()?;
        let indices = group.dataset("indices")?.read_raw::<u32>()?;
        let data = read_values(&group.dataset("data")?)?;
        let matrix = match read_str_attr(&group, "encoding-type")?.as_str() {
            "csr_matrix" => Matrix::Csr(CsrMatrix {
                shape,
                indptr,
                indices,
                data,
            }),
            "csc_matrix" => Matrix::Csc(CscMatrix {
                shape,
                indptr,
                indices,
                data,
            }),
            other => {
                return Err(SweepError::Corrupt(format!("{name}: unknown encoding {other}")));
            }
        };
        matrix.validate()?;
        return Ok(matrix);
    }
    let ds = parent.dataset(name)?;
    let dims = ds.shape();
    let [rows, cols] = dims[..] else {
        return Err(SweepError::Corrupt(format!(
            "{name}: {}-d dense matrices are not supported",
            dims.len()
        )));
    };
    let matrix = Matrix::Dense(DenseMatrix {
        shape: (rows, cols),
        data: read_values(&ds)?,
    });
    matrix.validate()?;
    Ok(matrix)
}

fn write_column(group: &Group, name: &str, column: &Column) -> Result<()> {
    let ds = match column {
        Column::Integer(v) => group.new_dataset_builder().with_data(v.as_slice()).create(name)?,
        Column::Dense(v) => group.new_dataset_builder().with_data(v.as_slice()).create(name)?,
        Column::Boolean(v) => group.new_dataset_builder().with_data(v.as_slice()).create(name)?,
        Column::Strings(v) => {
            let s = varlens(v)?;
            let ds = group.new_dataset_builder().with_data(s.as_slice()).create(name)?;
            write_encoding(&ds, "string-array")?;
            return Ok(());
        }
        Column::Categorical { codes, categories } => {
            let cat = group.create_group(name)?;
            write_encoding(&cat, "categorical")?;
            cat.new_attr::<bool>().create("ordered")?.write_scalar(&false)?;
            cat.new_dataset_builder().with_data(codes.as_slice()).create("codes")?;
            let s = varlens(categories)?;
            let cats = cat.new_dataset_builder().with_data(s.as_slice()).create("categories")?;
            write_encoding(&cats, "string-array")?;
            return Ok(());
        }
    };
    write_encoding(&ds, "array")
}

fn read_strings(ds: &hdf5::Dataset) -> Result<Vec<String>> {
    Ok(ds.read_raw::<VarLenUnicode>()?.iter().map(|s| s.as_str().to_string()).collect())
}

fn read_column(group: &Group, name: &str) -> Result<Column> {
    if let Ok(cat) = group.group(name) {
        return Ok(Column::Categorical {
            codes: cat.dataset("codes")?.read_raw::<i32>()?,
            categories: read_strings(&cat.dataset("categories")?)?,
        });
    }
    let ds = group.dataset(name)?;
    match ds.dtype()?.to_descriptor()? {
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
            Ok(Column::Integer(ds.read_raw::<i32>()?))
        }
        TypeDescriptor::Float(_) => Ok(Column::Dense(ds.read_raw::<f64>()?)),
        TypeDescriptor::Boolean | TypeDescriptor::Enum(_) => {
            Ok(Column::Boolean(ds.read_raw::<bool>()?))
        }
        TypeDescriptor::VarLenUnicode => Ok(Column::Strings(read_strings(&ds)?)),
        other => Err(SweepError::Corrupt(format!("column {name}: unsupported dtype {other:?}"))),
    }
}

fn write_frame(file: &File, name: &str, frame: &AxisFrame) -> Result<()> {
    let group = file.create_group(name)?;
    write_encoding(&group, "dataframe")?;
    write_str_attr(&group, INDEX, INDEX)?;
    let order = frame.columns.keys().map(|k| varlen(k)).collect::<Result<Vec<_>>>()?;
    group.new_attr_builder().with_data(order.as_slice()).create("column-order")?;
    let index = varlens(&frame.index)?;
    let ds = group.new_dataset_builder().with_data(index.as_slice()).create(INDEX)?;
    write_encoding(&ds, "string-array")?;
    for (col_name, column) in &frame.columns {
        write_column(&group, col_name, column)?;
    }
    Ok(())
}

fn read_frame(file: &File, name: &str) -> Result<AxisFrame> {
    let group = file.group(name)?;
    let index = read_strings(&group.dataset(INDEX)?)?;
    let mut frame = AxisFrame {
        index,
        ..AxisFrame::default(),
    };
    for member in group.member_names()? {
        if member != INDEX {
            frame.columns.insert(member.clone(), read_column(&group, &member)?);
        }
    }
    Ok(frame)
}

fn write_uns(group: &Group, uns: &BTreeMap<String, UnsValue>) -> Result<()> {
    write_encoding(group, "dict")?;
    for (key, value) in uns {
        let key = key.as_str();
        let ds = match value {
            UnsValue::Float(v) => {
                let ds = group.new_dataset::<f64>().shape(()).create(key)?;
                ds.write_scalar(v)?;
                ds
            }
            UnsValue::Int(v) => {
                let ds = group.new_dataset::<i64>().shape(()).create(key)?;
                ds.write_scalar(v)?;
                ds
            }
            UnsValue::Bool(v) => {
                let ds = group.new_dataset::<bool>().shape(()).create(key)?;
                ds.write_scalar(v)?;
                ds
            }
            UnsValue::Str(s) => {
                let ds = group.new_dataset::<VarLenUnicode>().shape(()).create(key)?;
                ds.write_scalar(&varlen(s)?)?;
                write_encoding(&ds, "string")?;
                continue;
            }
            UnsValue::Nested(map) => {
                write_uns(&group.create_group(key)?, map)?;
                continue;
            }
        };
        write_encoding(&ds, "numeric-scalar")?;
    }
    Ok(())
}

fn read_uns(group: &Group) -> Result<BTreeMap<String, UnsValue>> {
    let mut out = BTreeMap::new();
    for key in group.member_names()? {
        if let Ok(sub) = group.group(&key) {
            out.insert(key, UnsValue::Nested(read_uns(&sub)?));
            continue;
        }
        let ds = group.dataset(&key)?;
        let value = match ds.dtype()?.to_descriptor()? {
            TypeDescriptor::Float(_) => UnsValue::Float(ds.read_scalar::<f64>()?),
            TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
                UnsValue::Int(ds.read_scalar::<i64>()?)
            }
            TypeDescriptor::Boolean | TypeDescriptor::Enum(_) => {
                UnsValue::Bool(ds.read_scalar::<bool>()?)
            }
            TypeDescriptor::VarLenUnicode => {
                UnsValue::Str(ds.read_scalar::<VarLenUnicode>()?.as_str().to_string())
            }
            other => {
                return Err(SweepError::Corrupt(format!(
                    "uns/{key}: unsupported dtype {other:?}"
                )));
            }
        };
        out.insert(key, value);
    }
    Ok(out)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct H5adContainer;

impl H5adContainer {
    fn write_file(dataset: &Dataset, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        write_encoding(&file, "anndata")?;
        if let Some(x) = &dataset.x {
            write_matrix(&file, "X", x)?;
        }
        write_frame(&file, "obs", &dataset.obs)?;
        write_frame(&file, "var", &dataset.var)?;
        for (slot, mats) in MATRIX_SLOTS.iter().zip([
            &dataset.layers,
            &dataset.obsm,
            &dataset.varm,
            &dataset.obsp,
            &dataset.varp,
        ]) {
            let group = file.create_group(slot)?;
            write_encoding(&group, "dict")?;
            for (name, m) in mats {
                write_matrix(&group, name, m)?;
            }
        }
        write_uns(&file.create_group("uns")?, &dataset.uns)?;
        file.flush()?;
        Ok(())
    }
}

impl Container for H5adContainer {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::H5ad
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        dataset.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let tmp = partial_path(path);
        if let Err(e) = Self::write_file(dataset, &tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        std::fs::rename(&tmp, path)?;
        log::debug!("wrote h5ad container {}", path.display());
        Ok(())
    }

    fn read(&self, path: &Path, mode: AccessMode) -> Result<LoadedDataset> {
        let handle = H5adBacked::open(path)?;
        Ok(match mode {
            AccessMode::Full => LoadedDataset::InMemory(handle.into_dataset()?),
            AccessMode::Backed => LoadedDataset::Backed(Box::new(handle)),
        })
    }

    fn read_checksum(&self, path: &Path) -> Result<f64> {
        let file = File::open(path)?;
        match file.dataset(&format!("uns/{CHECKSUM_KEY}")) {
            Ok(ds) => Ok(ds.read_scalar::<f64>()?),
            Err(_) => {
                Err(SweepError::MissingUns(format!("{CHECKSUM_KEY} in {}", path.display())))
            }
        }
    }
}

/// An open `.h5ad` file; X stays on disk until [`BackedDataset::read_x`].
pub struct H5adBacked {
    file: File,
    shape: (usize, usize),
    uns: BTreeMap<String, UnsValue>,
}

impl H5adBacked {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let n_obs = file.group("obs")?.dataset(INDEX)?.shape().first().copied().unwrap_or(0);
        let n_vars = file.group("var")?.dataset(INDEX)?.shape().first().copied().unwrap_or(0);
        let uns = if file.link_exists("uns") {
            read_uns(&file.group("uns")?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            file,
            shape: (n_obs, n_vars),
            uns,
        })
    }

    pub fn into_dataset(mut self) -> Result<Dataset> {
        let x = if self.file.link_exists("X") {
            Some(self.read_x()?)
        } else {
            None
        };
        let mut slots: Vec<BTreeMap<String, Matrix>> = Vec::with_capacity(MATRIX_SLOTS.len());
        for slot in MATRIX_SLOTS {
            let mut mats = BTreeMap::new();
            if self.file.link_exists(slot) {
                let group = self.file.group(slot)?;
                for name in group.member_names()? {
                    let m = read_matrix(&group, &name)?;
                    mats.insert(name, m);
                }
            }
            slots.push(mats);
        }
        let [layers, obsm, varm, obsp, varp]: [BTreeMap<String, Matrix>; 5] = slots
            .try_into()
            .map_err(|_| SweepError::Corrupt("matrix slot count".into()))?;
        let ds = Dataset {
            n_obs: self.shape.0,
            n_vars: self.shape.1,
            x,
            obs: read_frame(&self.file, "obs")?,
            var: read_frame(&self.file, "var")?,
            layers,
            obsm,
            varm,
            obsp,
            varp,
            uns: self.uns,
        };
        Ok(ds)
    }
}

impl BackedDataset for H5adBacked {
    fn shape(&self) -> (usize, usize) {
        self.shape
    }

    fn uns(&self) -> &BTreeMap<String, UnsValue> {
        &self.uns
    }

    fn read_x(&mut self) -> Result<Matrix> {
        if !self.file.link_exists("X") {
            return Err(SweepError::MissingMatrix);
        }
        read_matrix(&self.file, "X")
    }
}
