//! Native single-file container.
//!
//! Layout:
//!
//! ```text
//! [magic: 8 bytes "H5SWPDS1"][version: u32 LE]
//! [X payload: bincode Matrix, absent when the dataset has no X]
//! [footer: bincode Footer][footer length: u64 LE]
//! ```
//!
//! The footer carries everything except X, plus the payload's offset, length
//! and CRC32. Backed reads decode only the footer; X is streamed and checked
//! against the CRC when realized.

use super::{
    AccessMode, BackedDataset, Container, ContainerFormat, LoadedDataset, checksum_from_uns,
};
use crate::dataset::{AxisFrame, Dataset, UnsValue};
use crate::errors::{Result, SweepError};
use crate::fsutil::write_atomic;
use crate::num::u64_to_usize;
use crate::sparse::Matrix;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, decode_from_std_read, encode_into_std_write, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const EXTENSION: &str = "nxd";
const MAGIC: &[u8; 8] = b"H5SWPDS1";
const VERSION: u32 = 1;
const PREAMBLE_LEN: u64 = 12;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct PayloadInfo {
    offset: u64,
    len: u64,
    crc32: u32,
    shape: (usize, usize),
}

#[derive(Debug, Serialize, Deserialize)]
struct Footer {
    n_obs: usize,
    n_vars: usize,
    obs: AxisFrame,
    var: AxisFrame,
    layers: BTreeMap<String, Matrix>,
    obsm: BTreeMap<String, Matrix>,
    varm: BTreeMap<String, Matrix>,
    obsp: BTreeMap<String, Matrix>,
    varp: BTreeMap<String, Matrix>,
    uns: BTreeMap<String, UnsValue>,
    x: Option<PayloadInfo>,
}

/// Counts and checksums bytes on their way to `inner`.
struct CrcWriter<W> {
    inner: W,
    hasher: crc32fast::Hasher,
    len: u64,
}

impl<W: Write> Write for CrcWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.len += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Counts and checksums bytes as they are read from `inner`.
struct CrcReader<R> {
    inner: R,
    hasher: crc32fast::Hasher,
    len: u64,
}

impl<R: Read> Read for CrcReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.len += n as u64;
        Ok(n)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NativeContainer;

impl Container for NativeContainer {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Native
    }

    fn write(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        dataset.validate()?;
        write_atomic(path, |w| {
            w.write_all(MAGIC)?;
            w.write_all(&VERSION.to_le_bytes())?;
            let x = match &dataset.x {
                Some(matrix) => {
                    let mut cw = CrcWriter {
                        inner: &mut *w,
                        hasher: crc32fast::Hasher::new(),
                        len: 0,
                    };
                    encode_into_std_write(matrix, &mut cw, standard())?;
                    Some(PayloadInfo {
                        offset: PREAMBLE_LEN,
                        len: cw.len,
                        crc32: cw.hasher.finalize(),
                        shape: matrix.shape(),
                    })
                }
                None => None,
            };
            let footer = Footer {
                n_obs: dataset.n_obs,
                n_vars: dataset.n_vars,
                obs: dataset.obs.clone(),
                var: dataset.var.clone(),
                layers: dataset.layers.clone(),
                obsm: dataset.obsm.clone(),
                varm: dataset.varm.clone(),
                obsp: dataset.obsp.clone(),
                varp: dataset.varp.clone(),
                uns: dataset.uns.clone(),
                x,
            };
            let bytes = encode_to_vec(&footer, standard())?;
            w.write_all(&bytes)?;
            w.write_all(&(bytes.len() as u64).to_le_bytes())?;
            Ok(())
        })?;
        log::debug!("wrote native container {}", path.display());
        Ok(())
    }

    fn read(&self, path: &Path, mode: AccessMode) -> Result<LoadedDataset> {
        let handle = NativeBacked::open(path)?;
        Ok(match mode {
            AccessMode::Full => LoadedDataset::InMemory(handle.into_dataset()?),
            AccessMode::Backed => LoadedDataset::Backed(Box::new(handle)),
        })
    }

    fn read_checksum(&self, path: &Path) -> Result<f64> {
        let handle = NativeBacked::open(path)?;
        checksum_from_uns(&handle.footer.uns, path)
    }
}

/// An open native container whose X has not been read yet.
pub struct NativeBacked {
    path: PathBuf,
    reader: BufReader<File>,
    footer: Footer,
}

impl NativeBacked {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let corrupt = |what: &str| SweepError::Corrupt(format!("{}: {what}", path.display()));

        if file_len < PREAMBLE_LEN + 8 {
            return Err(corrupt("file too short"));
        }
        let mut preamble = [0u8; PREAMBLE_LEN as usize];
        reader.read_exact(&mut preamble)?;
        if &preamble[..8] != MAGIC {
            return Err(corrupt("bad magic"));
        }
        let version = u32::from_le_bytes([preamble[8], preamble[9], preamble[10], preamble[11]]);
        if version != VERSION {
            return Err(corrupt(&format!("unsupported version {version}")));
        }

        reader.seek(SeekFrom::End(-8))?;
        let mut len_buf = [0u8; 8];
        reader.read_exact(&mut len_buf)?;
        let footer_len = u64::from_le_bytes(len_buf);
        if footer_len > file_len - PREAMBLE_LEN - 8 {
            return Err(corrupt("footer length exceeds file"));
        }
        let footer_start = file_len - 8 - footer_len;
        reader.seek(SeekFrom::Start(footer_start))?;
        let mut buf = vec![0u8; u64_to_usize(footer_len)?];
        reader.read_exact(&mut buf)?;
        let (footer, _) = decode_from_slice::<Footer, _>(&buf, standard())?;
        if let Some(info) = &footer.x {
            if info.offset.checked_add(info.len).is_none_or(|end| end > footer_start) {
                return Err(corrupt("payload overlaps footer"));
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            reader,
            footer,
        })
    }

    /// Read everything, X included, into an owned dataset.
    pub fn into_dataset(mut self) -> Result<Dataset> {
        let x = match self.footer.x {
            Some(_) => Some(self.read_x()?),
            None => None,
        };
        let f = self.footer;
        Ok(Dataset {
            n_obs: f.n_obs,
            n_vars: f.n_vars,
            x,
            obs: f.obs,
            var: f.var,
            layers: f.layers,
            obsm: f.obsm,
            varm: f.varm,
            obsp: f.obsp,
            varp: f.varp,
            uns: f.uns,
        })
    }
}

impl BackedDataset for NativeBacked {
    fn shape(&self) -> (usize, usize) {
        (self.footer.n_obs, self.footer.n_vars)
    }

    fn uns(&self) -> &BTreeMap<String, UnsValue> {
        &self.footer.uns
    }

    fn read_x(&mut self) -> Result<Matrix> {
        let info = self.footer.x.ok_or(SweepError::MissingMatrix)?;
        self.reader.seek(SeekFrom::Start(info.offset))?;
        let mut cr = CrcReader {
            inner: (&mut self.reader).take(info.len),
            hasher: crc32fast::Hasher::new(),
            len: 0,
        };
        let matrix: Matrix = decode_from_std_read(&mut cr, standard())?;
        if cr.len != info.len || cr.hasher.finalize() != info.crc32 {
            return Err(SweepError::Corrupt(format!(
                "{}: X payload checksum mismatch",
                self.path.display()
            )));
        }
        if matrix.shape() != info.shape {
            return Err(SweepError::ShapeMismatch {
                expected: info.shape,
                actual: matrix.shape(),
            });
        }
        Ok(matrix)
    }
}
