//! Private utility module
use crate::error::{NiftiError, Result};
use std::path::{Path, PathBuf};

/// Check whether the file at the given path is expected to be
/// Gzip-encoded, solely by its extension.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Convert a file path to a header file (.hdr or .hdr.gz) to
/// the respective volume file with GZip compression (.img.gz).
///
/// # Panics
/// Can panic if the given file path is not a valid path to a header file.
/// If it doesn't panic in this case, the result might still not be correct.
pub fn to_img_file_gz(mut path: PathBuf) -> PathBuf {
    if is_gz_file(&path) {
        let _ = path.set_extension(""); // remove .gz
    }
    let _ = path.set_extension("img.gz");
    path
}

/// Validate the raw `dim` field, returning the slice of effective
/// dimensions (`dim[1..=dim[0]]`).
pub fn validate_dim(raw_dim: &[u16; 8]) -> Result<&[u16]> {
    let ndim = raw_dim[0];
    if ndim == 0 || ndim > 7 {
        return Err(NiftiError::InconsistentDim(0, ndim));
    }
    let dim = &raw_dim[1..=ndim as usize];
    if let Some(i) = dim.iter().position(|d| *d == 0) {
        return Err(NiftiError::InconsistentDim(i as u8 + 1, dim[i]));
    }
    Ok(dim)
}

/// Number of voxels described by the given `dim` field.
/// Fails with `InconsistentDim` at the first entry that overflows the count.
pub fn nb_voxels(raw_dim: &[u16; 8]) -> Result<usize> {
    validate_dim(raw_dim)?
        .iter()
        .enumerate()
        .try_fold(1usize, |acc, (i, d)| {
            acc.checked_mul(*d as usize)
                .ok_or(NiftiError::InconsistentDim(i as u8 + 1, *d))
        })
}
