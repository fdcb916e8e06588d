//! This module contains the code types defined by the standard which
//! take part in geometry recovery. Primitive integer values can be
//! converted to these types (via `num_traits::FromPrimitive`) and
//! vice-versa.

/// Data type for representing a NIFTI value type in a volume.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum NiftiType {
    /// unsigned char.
    // NIFTI_TYPE_UINT8           2
    Uint8 = 2,
    /// signed short.
    // NIFTI_TYPE_INT16           4
    Int16 = 4,
    /// signed int.
    // NIFTI_TYPE_INT32           8
    Int32 = 8,
    /// 32 bit float.
    // NIFTI_TYPE_FLOAT32        16
    Float32 = 16,
    /// 64 bit complex = 2 32 bit floats.
    // NIFTI_TYPE_COMPLEX64      32
    Complex64 = 32,
    /// 64 bit float = double.
    // NIFTI_TYPE_FLOAT64        64
    Float64 = 64,
    /// 3 8 bit bytes.
    // NIFTI_TYPE_RGB24         128
    Rgb24 = 128,
    /// signed char.
    // NIFTI_TYPE_INT8          256
    Int8 = 256,
    /// unsigned short.
    // NIFTI_TYPE_UINT16        512
    Uint16 = 512,
    /// unsigned int.
    // NIFTI_TYPE_UINT32        768
    Uint32 = 768,
    /// signed long long.
    // NIFTI_TYPE_INT64        1024
    Int64 = 1024,
    /// unsigned long long.
    // NIFTI_TYPE_UINT64       1280
    Uint64 = 1280,
    /// 128 bit float = long double.
    // NIFTI_TYPE_FLOAT128     1536
    Float128 = 1536,
    /// 128 bit complex = 2 64 bit floats.
    // NIFTI_TYPE_COMPLEX128   1792
    Complex128 = 1792,
    /// 256 bit complex = 2 128 bit floats
    // NIFTI_TYPE_COMPLEX256   2048
    Complex256 = 2048,
    /// 4 8 bit bytes.
    // NIFTI_TYPE_RGBA32       2304
    Rgba32 = 2304,
}

impl NiftiType {
    /// Retrieve the size of an element of this data type, in bytes.
    pub fn size_of(self) -> usize {
        use NiftiType::*;
        match self {
            Int8 | Uint8 => 1,
            Int16 | Uint16 => 2,
            Rgb24 => 3,
            Int32 | Uint32 | Float32 | Rgba32 => 4,
            Int64 | Uint64 | Float64 | Complex64 => 8,
            Float128 | Complex128 => 16,
            Complex256 => 32,
        }
    }
}

/// An enum type which represents a unit type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum Unit {
    /// NIFTI code for unspecified units.
    Unknown = 0,
    /* Space codes are multiples of 1. */
    /// NIFTI code for meters.
    Meter = 1,
    /// NIFTI code for millimeters.
    Mm = 2,
    /// NIFTI code for micrometers.
    Micron = 3,
    /* Time codes are multiples of 8. */
    /// NIFTI code for seconds.
    Sec = 8,
    /// NIFTI code for milliseconds.
    Msec = 16,
    /// NIFTI code for microseconds.
    Usec = 24,
    /* These units are for spectral data: */
    /// NIFTI code for Hertz.
    Hz = 32,
    /// NIFTI code for ppm.
    Ppm = 40,
    /// NIFTI code for radians per second.
    Rads = 48,
}

impl Unit {
    /// How many millimeters make up one of this unit.
    ///
    /// Only spatial units have a factor. `Unknown` and the temporal or
    /// spectral units yield `None`, meaning that no rescaling applies.
    pub fn millimeter_factor(self) -> Option<f64> {
        match self {
            Unit::Meter => Some(1000.),
            Unit::Mm => Some(1.),
            Unit::Micron => Some(0.001),
            _ => None,
        }
    }
}

/// An enum type for representing a NIFTI XForm.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum XForm {
    /// Arbitrary coordinates (Method 1).
    Unknown = 0,
    /// Scanner-based anatomical coordinates
    ScannerAnat = 1,
    /// Coordinates aligned to another file's,
    /// or to anatomical "truth".
    AlignedAnat = 2,
    /// Coordinates aligned to Talairach-Tournoux
    /// Atlas; (0,0,0)=AC, etc.
    Talairach = 3,
    /// MNI 152 normalized coordinates.
    Mni152 = 4,
}

#[cfg(test)]
mod tests {
    use super::{NiftiType, Unit, XForm};
    use num_traits::FromPrimitive;

    #[test]
    fn type_sizes() {
        assert_eq!(NiftiType::Uint8.size_of(), 1);
        assert_eq!(NiftiType::Uint16.size_of(), 2);
        assert_eq!(NiftiType::Rgb24.size_of(), 3);
        assert_eq!(NiftiType::Float64.size_of(), 8);
        assert_eq!(NiftiType::Complex256.size_of(), 32);
    }

    #[test]
    fn codes() {
        assert_eq!(NiftiType::from_i16(512), Some(NiftiType::Uint16));
        assert_eq!(NiftiType::from_i16(3), None);
        assert_eq!(Unit::from_u8(2), Some(Unit::Mm));
        assert_eq!(XForm::from_i16(4), Some(XForm::Mni152));
        assert_eq!(XForm::from_i16(5), None);
    }

    #[test]
    fn unit_factors() {
        assert_eq!(Unit::Meter.millimeter_factor(), Some(1000.));
        assert_eq!(Unit::Mm.millimeter_factor(), Some(1.));
        assert_eq!(Unit::Micron.millimeter_factor(), Some(0.001));
        assert_eq!(Unit::Unknown.millimeter_factor(), None);
        assert_eq!(Unit::Sec.millimeter_factor(), None);
    }
}
