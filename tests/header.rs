#[macro_use]
extern crate pretty_assertions;

use nifti_geometry::header::{MAGIC_CODE_NI1, MAGIC_CODE_NIP1};
use nifti_geometry::{Endianness, NiftiError, NiftiHeader, NiftiType, Unit, XForm};
use std::fs;

mod util;

use util::{avg152_header, encode_header, temp_path};

#[test]
fn little_endian_hdr() {
    let mut expected = avg152_header();
    expected.set_description_str("FSL3.2beta").unwrap();
    expected.endianness = Endianness::Little;

    let bytes = encode_header(&expected, Endianness::Little);
    let h = NiftiHeader::from_reader(&bytes[..]).unwrap();
    assert_eq!(h, expected);
}

#[test]
fn big_endian_hdr() {
    let mut expected = avg152_header();
    expected.endianness = Endianness::Big;

    let bytes = encode_header(&expected, Endianness::Big);
    let h = NiftiHeader::from_reader(&bytes[..]).unwrap();
    assert_eq!(h, expected);
    assert_eq!(h.dim().unwrap(), &[91, 109, 91]);
    assert_eq!(h.sform().unwrap(), XForm::Mni152);
    assert_eq!(h.qform().unwrap(), XForm::Unknown);
    assert_eq!(h.data_type().unwrap(), NiftiType::Uint8);
    assert_eq!(h.xyzt_to_space().unwrap(), Unit::Mm);
}

#[test]
fn hdr_gz_file() {
    let mut expected = avg152_header();
    expected.endianness = Endianness::Big;
    let (_dir, path) = temp_path("avg152T1_LR_nifti.hdr.gz");

    let bytes = encode_header(&expected, Endianness::Big);
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    std::io::Write::write_all(&mut encoder, &bytes).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let h = NiftiHeader::from_file(&path).unwrap();
    assert_eq!(h, expected);
}

#[test]
fn bad_magic() {
    let mut header = avg152_header();
    header.magic = *b"nope";
    header.sizeof_hdr = 540;
    let bytes = encode_header(&header, Endianness::Little);
    assert!(matches!(
        NiftiHeader::from_reader(&bytes[..]),
        Err(NiftiError::InvalidFormat)
    ));
}

#[test]
fn analyze_header() {
    for endianness in &[Endianness::Little, Endianness::Big] {
        let mut header = avg152_header();
        header.magic = [0; 4];
        let bytes = encode_header(&header, *endianness);

        let h = NiftiHeader::from_reader(&bytes[..]).unwrap();
        assert!(!h.is_nifti());
        assert_eq!(h.endianness, *endianness);
        assert_eq!(h.dim().unwrap(), &[91, 109, 91]);
        // no orientation in ANALYZE 7.5
        assert_eq!(h.sform_code, 0);
        assert_eq!(h.qform_code, 0);
        assert!(matches!(
            h.orientation_source(),
            Err(NiftiError::NoOrientationAvailable)
        ));
    }
}

#[test]
fn magic_codes() {
    for magic in &[MAGIC_CODE_NI1, MAGIC_CODE_NIP1] {
        let mut header = avg152_header();
        header.magic = **magic;
        let bytes = encode_header(&header, Endianness::Little);
        let h = NiftiHeader::from_reader(&bytes[..]).unwrap();
        assert_eq!(&h.magic, *magic);
    }
}

#[test]
fn truncated_header() {
    let bytes = encode_header(&avg152_header(), Endianness::Little);
    assert!(matches!(
        NiftiHeader::from_reader(&bytes[..200]),
        Err(NiftiError::Io(_))
    ));
}

#[test]
fn invalid_codes() {
    let mut header = avg152_header();
    header.datatype = 3;
    header.sform_code = 9;
    assert!(matches!(
        header.data_type(),
        Err(NiftiError::InvalidCode("datatype", 3))
    ));
    assert!(matches!(header.sform(), Err(NiftiError::InvalidCode("sform", 9))));
    // still present as far as orientation goes
    assert!(header.orientation_source().is_ok());
}
