//! Image geometry and voxel data retrieval for host applications.
//!
//! These functions take a file path and either summarize the image's
//! geometry or copy its voxel data into a buffer owned by the caller.
//! Buffers are validated before anything is written to them: on failure,
//! they are left untouched.

use crate::affine::{recover_affine_with, AffineOptions};
use crate::error::{NiftiError, Result};
use crate::header::NiftiHeader;
use crate::matrix::Mat4;
use crate::object::ReaderOptions;
use std::path::Path;

/// Number of spatial dimensions described by an [`ImageGeometry`].
///
/// [`ImageGeometry`]: ./struct.ImageGeometry.html
pub const SPATIAL_DIMS: usize = 3;

/// A summary of an image's layout and voxel-to-world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    dims: [usize; SPATIAL_DIMS],
    nb_voxels: usize,
    bytes_per_voxel: usize,
    datatype: i16,
    affine: Mat4,
}

impl ImageGeometry {
    /// Summarize the geometry described by the given header.
    ///
    /// # Errors
    ///
    /// - `NiftiError::InconsistentDim` if the `dim` field is invalid.
    /// - `NiftiError::InvalidCode` if the data type is unknown.
    /// - `NiftiError::NoOrientationAvailable` if the header has neither
    /// sform nor qform.
    pub fn from_header(header: &NiftiHeader, options: &AffineOptions) -> Result<Self> {
        let dim = header.dim()?;
        let mut dims = [1; SPATIAL_DIMS];
        for (d, v) in dims.iter_mut().zip(dim) {
            *d = *v as usize;
        }
        Ok(ImageGeometry {
            dims,
            nb_voxels: header.nb_voxels()?,
            bytes_per_voxel: header.bytes_per_voxel()?,
            datatype: header.datatype,
            affine: recover_affine_with(header, options)?,
        })
    }

    /// Number of voxels along each spatial axis.
    pub fn dims(&self) -> [usize; SPATIAL_DIMS] {
        self.dims
    }

    /// Total number of voxels, over all dimensions of the image.
    pub fn nb_voxels(&self) -> usize {
        self.nb_voxels
    }

    /// Number of bytes per voxel.
    pub fn bytes_per_voxel(&self) -> usize {
        self.bytes_per_voxel
    }

    /// Number of bytes of the voxel data.
    pub fn nb_bytes(&self) -> usize {
        self.nb_voxels * self.bytes_per_voxel
    }

    /// Number of spatial dimensions, always 3.
    pub fn dimensionality(&self) -> usize {
        SPATIAL_DIMS
    }

    /// The raw NIfTI data type code.
    pub fn datatype(&self) -> i16 {
        self.datatype
    }

    /// The voxel-to-world transform, over 0-based voxel indices.
    pub fn affine(&self) -> &Mat4 {
        &self.affine
    }
}

/// Read the header of the image at `path` and summarize its geometry.
///
/// # Errors
///
/// - `NiftiError::Io` or `NiftiError::InvalidFormat` if the file cannot be read.
/// - `NiftiError::UnsupportedByteOrder` if multi-byte data is stored in
/// a foreign byte order.
/// - `NiftiError::NoOrientationAvailable` if the header has neither
/// sform nor qform.
pub fn compute_geometry<P: AsRef<Path>>(path: P) -> Result<ImageGeometry> {
    compute_geometry_with(path, &AffineOptions::default())
}

/// Same as [`compute_geometry`], with custom affine recovery options.
///
/// [`compute_geometry`]: ./fn.compute_geometry.html
pub fn compute_geometry_with<P: AsRef<Path>>(
    path: P,
    options: &AffineOptions,
) -> Result<ImageGeometry> {
    let image = ReaderOptions::new().header_only(true).read_file(path)?;
    ImageGeometry::from_header(image.header(), options)
}

/// Recover the affine of a header, over 0-based voxel indices.
pub fn compute_affine(header: &NiftiHeader) -> Result<Mat4> {
    recover_affine_with(header, &AffineOptions::default())
}

/// Recover the affine of a header into a flat column-major array.
/// `out` is only written on success.
pub fn compute_affine_into(header: &NiftiHeader, out: &mut [f64; 16]) -> Result<()> {
    let affine = compute_affine(header)?;
    *out = affine.to_column_major();
    Ok(())
}

/// Copy the raw voxel data of the image at `path` into `dest`, whose length
/// must be exactly the number of bytes of the voxel data.
///
/// # Errors
///
/// - `NiftiError::BufferSizeMismatch` if the length of `dest` differs from
/// the size of the voxel data. Nothing is read past the header, and nothing
/// is written, in this case.
pub fn read_voxel_data<P: AsRef<Path>>(path: P, dest: &mut [u8]) -> Result<()> {
    let data = read_checked_voxels(path.as_ref(), dest.len())?;
    dest.copy_from_slice(&data);
    Ok(())
}

/// Copy the raw voxel data of the image at `path` into a buffer of 16-bit
/// words. The bytes are reinterpreted in the host's byte order.
///
/// # Errors
///
/// - `NiftiError::BufferSizeMismatch` if the size of `dest` in bytes differs
/// from the size of the voxel data. Nothing is written in this case.
pub fn read_voxel_data_u16<P: AsRef<Path>>(path: P, dest: &mut [u16]) -> Result<()> {
    let data = read_checked_voxels(path.as_ref(), dest.len() * 2)?;
    for (d, chunk) in dest.iter_mut().zip(data.chunks_exact(2)) {
        *d = u16::from_ne_bytes([chunk[0], chunk[1]]);
    }
    Ok(())
}

/// Read the voxel data of the image at `path` once its size is known
/// to be `len` bytes.
fn read_checked_voxels(path: &Path, len: usize) -> Result<Vec<u8>> {
    let image = ReaderOptions::new().header_only(true).read_file(path)?;
    check_buffer_size(image.header(), len)?;

    let image = ReaderOptions::new().read_file(path)?;
    // the file may have changed in between
    check_buffer_size(image.header(), len)?;
    Ok(image.into_raw_data())
}

fn check_buffer_size(header: &NiftiHeader, len: usize) -> Result<()> {
    let expected = header.nb_bytes()?;
    if expected != len {
        return Err(NiftiError::BufferSizeMismatch(expected, len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typedef::NiftiType;

    fn header() -> NiftiHeader {
        NiftiHeader {
            dim: [4, 10, 20, 30, 2, 1, 1, 1],
            datatype: NiftiType::Int16 as i16,
            bitpix: 16,
            qform_code: 1,
            pixdim: [1., 2., 2., 2., 1., 1., 1., 1.],
            ..NiftiHeader::default()
        }
    }

    #[test]
    fn geometry_from_header() {
        let g = ImageGeometry::from_header(&header(), &AffineOptions::default()).unwrap();
        assert_eq!(g.dims(), [10, 20, 30]);
        assert_eq!(g.nb_voxels(), 12000);
        assert_eq!(g.bytes_per_voxel(), 2);
        assert_eq!(g.nb_bytes(), 24000);
        assert_eq!(g.dimensionality(), 3);
        assert_eq!(g.datatype(), 4);
        assert_eq!(g.affine().get(0, 0), 2.);
        assert_eq!(g.affine().get(0, 3), -2.);
    }

    #[test]
    fn geometry_of_2d_image() {
        let h = NiftiHeader {
            dim: [2, 10, 20, 1, 1, 1, 1, 1],
            ..header()
        };
        let g = ImageGeometry::from_header(&h, &AffineOptions::default()).unwrap();
        assert_eq!(g.dims(), [10, 20, 1]);
        assert_eq!(g.nb_voxels(), 200);
        // third axis keeps a unit spacing
        assert_eq!(g.affine().get(2, 2), 1.);
    }

    #[test]
    fn affine_into_untouched_on_failure() {
        let h = NiftiHeader {
            qform_code: 0,
            sform_code: 0,
            ..header()
        };
        let mut out = [7.; 16];
        assert!(matches!(
            compute_affine_into(&h, &mut out),
            Err(NiftiError::NoOrientationAvailable)
        ));
        assert_eq!(out, [7.; 16]);

        compute_affine_into(&header(), &mut out).unwrap();
        assert_eq!(out[0], 2.);
        assert_eq!(out[12], -2.);
        assert_eq!(out[15], 1.);
    }

    #[test]
    fn buffer_size() {
        assert!(check_buffer_size(&header(), 24000).is_ok());
        assert!(matches!(
            check_buffer_size(&header(), 23999),
            Err(NiftiError::BufferSizeMismatch(24000, 23999))
        ));
    }
}
