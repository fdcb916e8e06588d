//! Voxel-to-world geometry of NIfTI-1 images.
//!
//! This crate reads NIfTI-1 headers and voxel data (".nii", ".nii.gz" and
//! ".hdr"/".img" pairs) and recovers the affine transform mapping 0-based
//! voxel indices to world coordinates, from either the sform or the qform
//! of the header.
//!
//! # Example
//!
//! ```no_run
//! use nifti_geometry::compute_geometry;
//! # use nifti_geometry::Result;
//!
//! # fn run() -> Result<()> {
//! let geometry = compute_geometry("T1.nii.gz")?;
//! let affine = geometry.affine().to_column_major();
//! let mut data = vec![0u8; geometry.nb_bytes()];
//! nifti_geometry::read_voxel_data("T1.nii.gz", &mut data)?;
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate log;

pub mod affine;
pub mod error;
pub mod geometry;
pub mod header;
pub mod matrix;
pub mod object;
pub mod typedef;
mod util;
pub mod writer;

pub use byteordered::Endianness;
pub use error::{NiftiError, Result};
pub use geometry::{
    compute_affine, compute_affine_into, compute_geometry, read_voxel_data,
    read_voxel_data_u16, ImageGeometry,
};
pub use header::NiftiHeader;
pub use matrix::Mat4;
pub use object::{NiftiImage, ReaderOptions};
pub use typedef::{NiftiType, Unit, XForm};
