//! Types for error handling go here.

use crate::typedef::NiftiType;
use byteordered::Endianness;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum NiftiError {
        /// An invalid NIfTI-1 header was read (bad size or magic code).
        InvalidFormat {
            display("Invalid NIfTI-1 file")
        }
        /// A header field holds a code which does not map to a known value.
        InvalidCode(typename: &'static str, code: i16) {
            display("invalid code `{}` for header field {}", code, typename)
        }
        /// A `dim` entry is inconsistent with the declared dimensionality,
        /// or makes the size of the volume overflow.
        InconsistentDim(index: u8, value: u16) {
            display("inconsistent value `{}` in header field dim[{}]", value, index)
        }
        /// The image data is stored in a foreign byte order, which is only
        /// accepted for single byte voxels.
        UnsupportedByteOrder(endianness: Endianness, data_type: NiftiType) {
            display("Unsupported byte order {:?} for {:?} voxels", endianness, data_type)
        }
        /// Neither the sform nor the qform of the header is valid.
        NoOrientationAvailable {
            display("Neither sform nor qform is available")
        }
        /// The destination buffer does not have the exact size of the voxel data.
        BufferSizeMismatch(expected: usize, got: usize) {
            display("Buffer size mismatch: voxel data has {} bytes, buffer has {}", expected, got)
        }
        /// Attempted to set a description with more than 80 bytes.
        IncorrectDescriptionLength(len: usize) {
            display("Description length ({} bytes) is greater than 80 bytes.", len)
        }
        /// The header's companion volume file could not be opened.
        MissingVolumeFile(err: IOError) {
            source(err)
            display("Volume file not found")
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("{}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, NiftiError>;
