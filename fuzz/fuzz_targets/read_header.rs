#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_geometry::affine::recover_affine;
use nifti_geometry::NiftiHeader;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = NiftiHeader::from_reader(data) {
        let _ = header.dim();
        let _ = header.data_type();
        let _ = header.nb_bytes();
        let _ = header.qform();
        let _ = header.sform();
        let _ = header.xyzt_to_space();
        let _ = header.orientation_source();
        let _ = recover_affine(&header);
        let _ = header.clone().validate_description();
    }
});
