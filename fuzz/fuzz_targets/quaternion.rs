#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_geometry::affine::quaternion_to_rotation;

fuzz_target!(|data: [f32; 3]| {
    let r = quaternion_to_rotation(data[0] as f64, data[1] as f64, data[2] as f64);
    assert!(r.is_homogeneous());
});
