use byteordered::ByteOrdered;
use nifti_geometry::{Endianness, NiftiHeader, NiftiType};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// A 3D header with 2mm voxels and no orientation information.
#[allow(dead_code)]
pub fn header_3d(dim: [u16; 3], datatype: NiftiType) -> NiftiHeader {
    NiftiHeader {
        dim: [3, dim[0], dim[1], dim[2], 1, 1, 1, 1],
        datatype: datatype as i16,
        bitpix: (datatype.size_of() * 8) as i16,
        pixdim: [1., 2., 2., 2., 1., 1., 1., 1.],
        xyzt_units: 2,
        sform_code: 0,
        qform_code: 0,
        ..NiftiHeader::default()
    }
}

/// The header of the MNI152 2mm template, oriented by its sform.
#[allow(dead_code)]
pub fn avg152_header() -> NiftiHeader {
    NiftiHeader {
        sform_code: 4,
        srow_x: [-2., 0., 0., 90.],
        srow_y: [0., 2., 0., -126.],
        srow_z: [0., 0., 2., -72.],
        ..header_3d([91, 109, 91], NiftiType::Uint8)
    }
}

/// A temporary directory along with a path to a file inside it. The
/// directory is removed when the returned guard is dropped.
#[allow(dead_code)]
pub fn temp_path(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}

/// Serialize a header with the given byte order, as a NIfTI-1 file would
/// hold it.
#[allow(dead_code)]
pub fn encode_header(h: &NiftiHeader, e: Endianness) -> Vec<u8> {
    let mut w = ByteOrdered::runtime(Vec::with_capacity(348), e);
    w.write_i32(h.sizeof_hdr).unwrap();
    w.write_all(&h.data_type).unwrap();
    w.write_all(&h.db_name).unwrap();
    w.write_i32(h.extents).unwrap();
    w.write_i16(h.session_error).unwrap();
    w.write_u8(h.regular).unwrap();
    w.write_u8(h.dim_info).unwrap();
    for v in &h.dim {
        w.write_u16(*v).unwrap();
    }
    for v in &[h.intent_p1, h.intent_p2, h.intent_p3] {
        w.write_f32(*v).unwrap();
    }
    for v in &[h.intent_code, h.datatype, h.bitpix, h.slice_start] {
        w.write_i16(*v).unwrap();
    }
    for v in h.pixdim.iter().chain(&[h.vox_offset, h.scl_slope, h.scl_inter]) {
        w.write_f32(*v).unwrap();
    }
    w.write_i16(h.slice_end).unwrap();
    w.write_u8(h.slice_code).unwrap();
    w.write_u8(h.xyzt_units).unwrap();
    for v in &[h.cal_max, h.cal_min, h.slice_duration, h.toffset] {
        w.write_f32(*v).unwrap();
    }
    w.write_i32(h.glmax).unwrap();
    w.write_i32(h.glmin).unwrap();
    w.write_all(&h.descrip).unwrap();
    w.write_all(&h.aux_file).unwrap();
    w.write_i16(h.qform_code).unwrap();
    w.write_i16(h.sform_code).unwrap();
    let quatern = [
        h.quatern_b, h.quatern_c, h.quatern_d, h.quatern_x, h.quatern_y, h.quatern_z,
    ];
    for v in quatern.iter().chain(&h.srow_x).chain(&h.srow_y).chain(&h.srow_z) {
        w.write_f32(*v).unwrap();
    }
    w.write_all(&h.intent_name).unwrap();
    w.write_all(&h.magic).unwrap();
    let out = w.into_inner();
    assert_eq!(out.len(), 348);
    out
}
