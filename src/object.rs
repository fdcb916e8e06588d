//! Module for handling and retrieving complete NIFTI-1 objects.

use crate::error::{NiftiError, Result};
use crate::header::{NiftiHeader, MAGIC_CODE_NIP1};
use crate::typedef::NiftiType;
use crate::util::{is_gz_file, to_img_file_gz};
use byteordered::Endianness;
use flate2::bufread::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Options and flags which can be used to configure how a NIfTI image
/// is read.
///
/// # Example
///
/// ```no_run
/// use nifti_geometry::ReaderOptions;
/// # use nifti_geometry::Result;
///
/// # fn run() -> Result<()> {
/// let image = ReaderOptions::new()
///     .require_native_byte_order(false)
///     .read_file("volume.nii.gz")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOptions {
    /// Whether to skip the voxel data.
    header_only: bool,
    /// Whether to reject multi-byte voxel data stored in a foreign byte order.
    require_native_byte_order: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            header_only: false,
            require_native_byte_order: true,
        }
    }
}

impl ReaderOptions {
    /// Creates a blank new set of options ready for configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read the header, leaving the image's voxel data empty.
    pub fn header_only(&mut self, header_only: bool) -> &mut Self {
        self.header_only = header_only;
        self
    }

    /// Reject images whose byte order differs from the host's, unless
    /// their voxels are single bytes. Enabled by default: the voxel data
    /// is handed out as raw bytes, which are never swapped.
    pub fn require_native_byte_order(&mut self, require: bool) -> &mut Self {
        self.require_native_byte_order = require;
        self
    }

    /// Retrieve the full contents of a NIFTI object.
    /// The given file system path is used as reference.
    /// If the file only contains the header, this method will
    /// look for the corresponding file with the extension ".img",
    /// or ".img.gz" if the former wasn't found.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<NiftiImage> {
        let gz = is_gz_file(&path);
        let file = BufReader::new(File::open(&path)?);
        if gz {
            self.read_file_2(path, GzDecoder::new(file))
        } else {
            self.read_file_2(path, file)
        }
    }

    fn read_file_2<P, S>(&self, path: P, mut stream: S) -> Result<NiftiImage>
    where
        P: AsRef<Path>,
        S: Read,
    {
        let header = NiftiHeader::from_reader(&mut stream)?;
        self.check_byte_order(&header)?;
        if self.header_only {
            return Ok(NiftiImage {
                header,
                raw_data: Vec::new(),
            });
        }

        let raw_data = if &header.magic != MAGIC_CODE_NIP1 {
            // volume is in another file (NIfTI pair or ANALYZE 7.5)
            let img_path = path.as_ref().to_path_buf();
            let mut img_path_gz = to_img_file_gz(img_path);

            read_volume_file(&img_path_gz, &header)
                .or_else(|e| match e {
                    NiftiError::Io(ref io_e) if io_e.kind() == io::ErrorKind::NotFound => {
                        // try .img file instead (remove .gz extension)
                        let has_ext = img_path_gz.set_extension("");
                        debug_assert!(has_ext);
                        read_volume_file(&img_path_gz, &header)
                    }
                    e => Err(e),
                })
                .map_err(|e| {
                    if let NiftiError::Io(io_e) = e {
                        NiftiError::MissingVolumeFile(io_e)
                    } else {
                        e
                    }
                })?
        } else {
            // extensions (skipped) and volume are in the same source
            let skip = (header.vox_offset as u64).saturating_sub(348);
            let skipped = io::copy(&mut (&mut stream).take(skip), &mut io::sink())?;
            if skipped < skip {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            read_volume(stream, &header)?
        };

        Ok(NiftiImage { header, raw_data })
    }

    /// Retrieve a NIFTI object as separate header and volume files.
    /// This method is useful when file names are not conventional for a
    /// NIFTI file pair.
    pub fn read_file_pair<P, Q>(&self, hdr_path: P, vol_path: Q) -> Result<NiftiImage>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let header = NiftiHeader::from_file(hdr_path)?;
        self.check_byte_order(&header)?;
        let raw_data = if self.header_only {
            Vec::new()
        } else {
            read_volume_file(vol_path, &header)?
        };
        Ok(NiftiImage { header, raw_data })
    }

    fn check_byte_order(&self, header: &NiftiHeader) -> Result<()> {
        if !self.require_native_byte_order || header.endianness == Endianness::native() {
            return Ok(());
        }
        let data_type = header.data_type()?;
        if data_type == NiftiType::Uint8 {
            Ok(())
        } else {
            Err(NiftiError::UnsupportedByteOrder(header.endianness, data_type))
        }
    }
}

fn read_volume_file<P: AsRef<Path>>(path: P, header: &NiftiHeader) -> Result<Vec<u8>> {
    let gz = is_gz_file(&path);
    let file = BufReader::new(File::open(path)?);
    if gz {
        read_volume(GzDecoder::new(file), header)
    } else {
        read_volume(file, header)
    }
}

fn read_volume<R: Read>(source: R, header: &NiftiHeader) -> Result<Vec<u8>> {
    let nb_bytes = header.nb_bytes()?;
    debug!("reading volume of {} bytes", nb_bytes);
    // grows with the data actually present, not with the declared size
    let mut raw_data = Vec::new();
    let read = source.take(nb_bytes as u64).read_to_end(&mut raw_data)?;
    if read < nb_bytes {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(raw_data)
}

/// Data type for a NIFTI image fully contained in memory: the header
/// and the raw voxel bytes, in the byte order of the file.
#[derive(Debug, PartialEq, Clone)]
pub struct NiftiImage {
    header: NiftiHeader,
    raw_data: Vec<u8>,
}

impl NiftiImage {
    /// Read an image with default options.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nifti_geometry::NiftiImage;
    /// # use nifti_geometry::Result;
    ///
    /// # fn run() -> Result<()> {
    /// let image = NiftiImage::from_file("minimal.nii.gz")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NiftiImage> {
        ReaderOptions::new().read_file(path)
    }

    /// Obtain a reference to the NIFTI header.
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// Retrieve a reference to the raw data.
    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    /// Retrieve the raw data, consuming the image.
    pub fn into_raw_data(self) -> Vec<u8> {
        self.raw_data
    }
}
