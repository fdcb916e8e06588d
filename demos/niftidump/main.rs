//! An application for printing the header and geometry of a NIfTI-1 file.

extern crate nifti_geometry;

use nifti_geometry::{compute_affine, NiftiHeader};
use std::env;

fn main() {
    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to NIFTI file is required");
    let header = NiftiHeader::from_file(filename).expect("Failed to read NIFTI file");
    println!("{:#?}", &header);

    match compute_affine(&header) {
        Ok(affine) => {
            println!("voxel-to-world affine:");
            for row in affine.rows().iter() {
                println!("  {:>10.4} {:>10.4} {:>10.4} {:>10.4}", row[0], row[1], row[2], row[3]);
            }
        }
        Err(e) => println!("no affine: {}", e),
    }
}
