//! Utility functions to write nifti images.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteordered::ByteOrdered;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{NiftiError, Result};
use crate::header::{NiftiHeader, MAGIC_CODE_NI1, MAGIC_CODE_NIP1};
use crate::util::{is_gz_file, to_img_file_gz};

/// Options for writing a NIfTI image made of a header and raw voxel bytes.
///
/// The file layout is chosen by the extension of the given path: ".nii"
/// (or ".nii.gz") writes a single file, while ".hdr" (or ".hdr.gz") writes
/// the header there and the voxels to the matching ".img" (or ".img.gz").
#[derive(Debug, Clone, PartialEq)]
pub struct WriterOptions {
    /// Where to write the header (and possibly the voxels).
    path: PathBuf,
    /// Header used to fill in all fields other than `bitpix`,
    /// `vox_offset` and `magic`.
    header_reference: Option<NiftiHeader>,
}

impl WriterOptions {
    /// Creates a new set of options to write to `path`.
    pub fn new<P>(path: P) -> WriterOptions
    where
        P: AsRef<Path>,
    {
        WriterOptions {
            path: path.as_ref().to_path_buf(),
            header_reference: None,
        }
    }

    /// Sets a reference header for the output file.
    pub fn reference_header(mut self, header: &NiftiHeader) -> WriterOptions {
        self.header_reference = Some(header.clone());
        self
    }

    /// Write the image: the header, followed by `data`, the raw voxel
    /// bytes, copied as given. The header is always written in
    /// little-endian order, so multi-byte voxels must be supplied in
    /// little-endian order as well.
    ///
    /// # Errors
    ///
    /// - `NiftiError::InconsistentDim` or `NiftiError::InvalidCode` if the
    /// reference header (or the default one, when none was given) does not
    /// describe a valid volume.
    /// - `NiftiError::BufferSizeMismatch` if `data` does not have the size
    /// implied by the header's `dim` and `datatype`.
    pub fn write_raw(&self, data: &[u8]) -> Result<()> {
        let mut header = self.header_reference.clone().unwrap_or_default();
        header.validate_description()?;
        let data_type = header.data_type()?;
        header.bitpix = (data_type.size_of() * 8) as i16;
        let expected = header.nb_bytes()?;
        if expected != data.len() {
            return Err(NiftiError::BufferSizeMismatch(expected, data.len()));
        }

        let pair = self
            .path
            .file_name()
            .map(|n| {
                let n = n.to_string_lossy();
                n.ends_with(".hdr") || n.ends_with(".hdr.gz")
            })
            .unwrap_or(false);

        if pair {
            header.vox_offset = 0.;
            header.magic = *MAGIC_CODE_NI1;
            write_file(&self.path, |w| write_header(w, &header))?;
            let img_path = to_img_file_gz(self.path.clone());
            let img_path = if is_gz_file(&self.path) {
                img_path
            } else {
                img_path.with_extension("")
            };
            write_file(&img_path, |w| Ok(w.write_all(data)?))
        } else {
            header.vox_offset = 352.;
            header.magic = *MAGIC_CODE_NIP1;
            write_file(&self.path, |w| {
                write_header(&mut *w, &header)?;
                // no extensions
                w.write_all(&[0u8; 4])?;
                w.write_all(data)?;
                Ok(())
            })
        }
    }
}

fn write_file<F>(path: &Path, f: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let writer = BufWriter::new(File::create(path)?);
    if is_gz_file(path) {
        let mut e = GzEncoder::new(writer, Compression::default());
        f(&mut e)?;
        let _ = e.finish()?; // Must use result
    } else {
        let mut writer = writer;
        f(&mut writer)?;
        writer.flush()?;
    }
    Ok(())
}

fn write_header(writer: &mut dyn Write, header: &NiftiHeader) -> Result<()> {
    let mut writer = ByteOrdered::le(writer);

    writer.write_i32(header.sizeof_hdr)?;
    writer.write_all(&header.data_type)?;
    writer.write_all(&header.db_name)?;
    writer.write_i32(header.extents)?;
    writer.write_i16(header.session_error)?;
    writer.write_u8(header.regular)?;
    writer.write_u8(header.dim_info)?;
    for s in &header.dim {
        writer.write_u16(*s)?;
    }
    writer.write_f32(header.intent_p1)?;
    writer.write_f32(header.intent_p2)?;
    writer.write_f32(header.intent_p3)?;
    writer.write_i16(header.intent_code)?;
    writer.write_i16(header.datatype)?;
    writer.write_i16(header.bitpix)?;
    writer.write_i16(header.slice_start)?;
    for f in &header.pixdim {
        writer.write_f32(*f)?;
    }
    writer.write_f32(header.vox_offset)?;
    writer.write_f32(header.scl_slope)?;
    writer.write_f32(header.scl_inter)?;
    writer.write_i16(header.slice_end)?;
    writer.write_u8(header.slice_code)?;
    writer.write_u8(header.xyzt_units)?;
    writer.write_f32(header.cal_max)?;
    writer.write_f32(header.cal_min)?;
    writer.write_f32(header.slice_duration)?;
    writer.write_f32(header.toffset)?;
    writer.write_i32(header.glmax)?;
    writer.write_i32(header.glmin)?;

    writer.write_all(&header.descrip)?;
    writer.write_all(&header.aux_file)?;
    writer.write_i16(header.qform_code)?;
    writer.write_i16(header.sform_code)?;
    for f in &[
        header.quatern_b,
        header.quatern_c,
        header.quatern_d,
        header.quatern_x,
        header.quatern_y,
        header.quatern_z,
    ] {
        writer.write_f32(*f)?;
    }
    for f in header.srow_x.iter().chain(&header.srow_y).chain(&header.srow_z) {
        writer.write_f32(*f)?;
    }
    writer.write_all(&header.intent_name)?;
    writer.write_all(&header.magic)?;
    Ok(())
}
