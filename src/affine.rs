//! Recovery of the voxel-to-world affine transform of a NIfTI-1 image.
//!
//! The header may describe its orientation in two ways: the sform, a direct
//! 3x4 matrix, and the qform, a rotation quaternion combined with voxel
//! spacing and an offset. The sform takes precedence whenever its code is
//! positive. Either way, the resulting affine is corrected so that it maps
//! 0-based voxel indices, and optionally rescaled by the spatial unit.

use crate::error::{NiftiError, Result};
use crate::header::NiftiHeader;
use crate::matrix::Mat4;
use crate::typedef::Unit;

/// Below this value, the quaternion's real part is treated as zero.
const QUATERNION_W_EPSILON: f64 = 1e-7;

/// The qform parameters of a header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qform {
    /// Quaternion b, c and d parameters.
    pub quatern: [f64; 3],
    /// Offsets along x, y and z.
    pub offset: [f64; 3],
    /// Spacing along the first three axes (`pixdim[1..4]`).
    pub pixdim: [f64; 3],
    /// Declared number of dimensions (`dim[0]`).
    pub ndim: u16,
    /// Handedness of the slice axis, -1 or 1.
    pub qfac: f64,
}

/// The orientation information chosen from a header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrientationSource {
    /// The sform matrix, which maps voxel indices to world coordinates.
    Sform(Mat4),
    /// The qform parameters.
    Qform(Qform),
}

impl OrientationSource {
    /// Choose the orientation source of the given header. The sform is
    /// preferred; either form is present only if its code is positive.
    ///
    /// # Errors
    ///
    /// - `NiftiError::NoOrientationAvailable` if neither form is present.
    pub fn from_header(header: &NiftiHeader) -> Result<Self> {
        if header.sform_code > 0 {
            Ok(OrientationSource::Sform(header.sform_matrix()))
        } else if header.qform_code > 0 {
            let p = &header.pixdim;
            Ok(OrientationSource::Qform(Qform {
                quatern: [
                    header.quatern_b as f64,
                    header.quatern_c as f64,
                    header.quatern_d as f64,
                ],
                offset: [
                    header.quatern_x as f64,
                    header.quatern_y as f64,
                    header.quatern_z as f64,
                ],
                pixdim: [p[1] as f64, p[2] as f64, p[3] as f64],
                ndim: header.dim[0],
                qfac: header.qfac(),
            }))
        } else {
            Err(NiftiError::NoOrientationAvailable)
        }
    }

    /// Build the raw affine of this source, before any index origin
    /// correction or unit rescaling.
    pub fn to_affine(&self) -> Mat4 {
        match self {
            OrientationSource::Sform(m) => *m,
            OrientationSource::Qform(q) => qform_to_affine(q),
        }
    }
}

/// Which spatial units are rescaled relative to millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRescale {
    /// Only millimeters go through the rescale step, which with a factor
    /// of 1 leaves the affine unchanged. Meters and microns are kept as
    /// they are.
    MillimeterOnly,
    /// Meters and microns are rescaled as well.
    AllUnits,
}

/// Which way the unit factor is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescaleDirection {
    /// Scale by the factor, `diag(f, f, f, 1)`.
    ToMillimeters,
    /// Scale by the reciprocal, `diag(1/f, 1/f, 1/f, 1)`.
    FromMillimeters,
}

/// Options for affine recovery.
///
/// # Example
///
/// ```
/// use nifti_geometry::affine::{AffineOptions, RescaleDirection, UnitRescale};
///
/// let options = AffineOptions::new()
///     .rescale(UnitRescale::AllUnits)
///     .direction(RescaleDirection::ToMillimeters);
/// assert_eq!(options.get_rescale(), UnitRescale::AllUnits);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffineOptions {
    rescale: UnitRescale,
    direction: RescaleDirection,
}

impl Default for AffineOptions {
    fn default() -> Self {
        AffineOptions {
            rescale: UnitRescale::MillimeterOnly,
            direction: RescaleDirection::FromMillimeters,
        }
    }
}

impl AffineOptions {
    /// Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which units are rescaled.
    pub fn rescale(mut self, rescale: UnitRescale) -> Self {
        self.rescale = rescale;
        self
    }

    /// Set the direction of the unit rescale.
    pub fn direction(mut self, direction: RescaleDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Which units are rescaled.
    pub fn get_rescale(&self) -> UnitRescale {
        self.rescale
    }

    /// The direction of the unit rescale.
    pub fn get_direction(&self) -> RescaleDirection {
        self.direction
    }
}

/// Recover the affine transform mapping 0-based voxel indices to world
/// coordinates, using default options.
///
/// # Errors
///
/// - `NiftiError::NoOrientationAvailable` if neither sform nor qform is present.
pub fn recover_affine(header: &NiftiHeader) -> Result<Mat4> {
    recover_affine_with(header, &AffineOptions::default())
}

/// Recover the affine transform mapping 0-based voxel indices to world
/// coordinates.
///
/// # Errors
///
/// - `NiftiError::NoOrientationAvailable` if neither sform nor qform is present.
pub fn recover_affine_with(header: &NiftiHeader, options: &AffineOptions) -> Result<Mat4> {
    let source = header.orientation_source()?;
    match source {
        OrientationSource::Sform(_) => {
            debug!("using sform (code {})", header.sform_code)
        }
        OrientationSource::Qform(_) => {
            debug!("using qform (code {})", header.qform_code)
        }
    }

    // out of range codes carry no unit information
    let unit = header.xyzt_to_space().unwrap_or(Unit::Unknown);
    Ok(affine_from_source(&source, unit, options))
}

/// Build the final affine from an orientation source: the raw affine,
/// shifted to 0-based indices, then rescaled by the spatial unit.
pub fn affine_from_source(source: &OrientationSource, unit: Unit, options: &AffineOptions) -> Mat4 {
    let affine = source.to_affine() * Mat4::index_origin_shift();
    rescale_units(&affine, unit, options)
}

/// Right-multiply the affine by the scale matrix implied by the given unit.
///
/// Units without a millimeter factor leave the affine unchanged, and so
/// do meters and microns under `UnitRescale::MillimeterOnly`.
pub fn rescale_units(affine: &Mat4, unit: Unit, options: &AffineOptions) -> Mat4 {
    let factor = match (unit.millimeter_factor(), options.rescale) {
        (Some(f), UnitRescale::AllUnits) => f,
        (Some(f), UnitRescale::MillimeterOnly) if unit == Unit::Mm => f,
        _ => return *affine,
    };
    let s = match options.direction {
        RescaleDirection::ToMillimeters => factor,
        RescaleDirection::FromMillimeters => 1. / factor,
    };
    affine.scale_columns(s, s, s)
}

/// Assemble the qform affine `T * R * Z`: scale by the voxel spacing
/// (with the slice axis flipped by qfac), rotate, then translate.
pub fn qform_to_affine(q: &Qform) -> Mat4 {
    let r = quaternion_to_rotation(q.quatern[0], q.quatern[1], q.quatern[2]);
    let t = Mat4::translation(q.offset[0], q.offset[1], q.offset[2]);

    let mut z = [1.; 3];
    let n = usize::from(q.ndim).min(3);
    for (i, v) in z.iter_mut().enumerate().take(n) {
        // negative spacing is dropped, not made absolute
        if q.pixdim[i] < 0. {
            warn!("negative pixdim[{}] = {}, using 1", i + 1, q.pixdim[i]);
        } else {
            *v = q.pixdim[i];
        }
    }
    if q.qfac < 0. {
        z[2] = -z[2];
    }

    t * r * Mat4::from_diagonal([z[0], z[1], z[2], 1.])
}

/// Calculate the homogeneous rotation matrix of a unit quaternion, given
/// its b, c and d parameters.
///
/// The real part is recovered as `w = sqrt(1 - (b*b + c*c + d*d))`. When
/// it is too small or undefined, the quaternion is taken as a rotation by
/// 180 degrees (w = 0) about the normalized (b, c, d) axis.
pub fn quaternion_to_rotation(b: f64, c: f64, d: f64) -> Mat4 {
    let (mut x, mut y, mut z) = (b, c, d);
    let mut w = (1. - (x * x + y * y + z * z)).max(0.).sqrt();
    if w < QUATERNION_W_EPSILON || !w.is_finite() {
        let norm = (x * x + y * y + z * z).sqrt();
        if norm == 0. || !norm.is_finite() {
            return Mat4::identity();
        }
        x /= norm;
        y /= norm;
        z /= norm;
        w = 0.;
    }

    let (xx, yy, zz, ww) = (x * x, y * y, z * z, w * w);
    let (xy, xz, xw) = (x * y, x * z, x * w);
    let (yz, yw) = (y * z, y * w);
    let zw = z * w;

    Mat4::from_rows([
        [xx - yy - zz + ww, 2. * (xy - zw), 2. * (xz + yw), 0.],
        [2. * (xy + zw), -xx + yy - zz + ww, 2. * (yz - xw), 0.],
        [2. * (xz - yw), 2. * (yz + xw), -xx - yy + zz + ww, 0.],
        [0., 0., 0., 1.],
    ])
}
