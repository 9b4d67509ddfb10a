use std::collections::BTreeMap;

use imgmeta::{CodecErrorKind, Error, Image, MagicNumber, Origin};

mod common;
use common::*;

#[test]
fn open_file() {
    logger();
    let file = temp_file(&pixel_jpeg(), ".jpg");

    let image = Image::open(file.path()).unwrap();
    assert_eq!(image.origin(), Origin::File(file.path().to_path_buf()));
    assert_eq!(image.format(), MagicNumber::Jpeg);
    assert_eq!((image.pixel_width(), image.pixel_height()), (1, 1));
}

#[test]
fn open_missing_file() {
    logger();
    let dir = tempfile::tempdir().unwrap();
    let err = Image::open(dir.path().join("thisimagedoesnotexist")).unwrap_err();

    assert_eq!(err.code(), 9);
    assert_eq!(err.kind(), Some(CodecErrorKind::OpenFailed));
}

#[test]
fn open_unknown_file() {
    logger();
    let file = temp_file(b"just some text", ".txt");
    let err = Image::open(file.path()).unwrap_err();

    assert_eq!(err.code(), 11);
    assert_eq!(err.kind(), Some(CodecErrorKind::UnknownImageType));
}

#[test]
fn open_bytes() {
    logger();
    let image = Image::open_bytes(pixel_jpeg()).unwrap();
    assert_eq!(image.origin(), Origin::Bytes);

    let webp = Image::open_bytes(pixel_webp()).unwrap();
    assert_eq!(webp.format(), MagicNumber::Webp);
    assert_eq!((webp.pixel_width(), webp.pixel_height()), (1, 1));
}

#[test]
fn open_bytes_failures() {
    logger();

    let cases: [(&str, Vec<u8>, &str, i32); 3] = [
        ("no image", b"no image".to_vec(), "Failed to read input data", 20),
        ("empty byte slice", vec![0_u8; 0], "input is empty", 0),
        ("never-allocated vec", Vec::new(), "input is empty", 0),
    ];

    for (name, bytes, message, code) in cases {
        let err = Image::open_bytes(bytes).unwrap_err();
        assert_eq!(err.to_string(), message, "{name}");
        assert_eq!(err.code(), code, "{name}");
    }

    assert_eq!(Image::open_bytes([0_u8; 0]).unwrap_err(), Error::EmptyInput);
}

#[test]
fn metadata_of_a_populated_image() {
    logger();
    let file = temp_file(&populated_jpeg(), ".jpg");

    let image = Image::open(file.path()).unwrap();
    image.read_metadata().unwrap();
    assert_eq!((image.pixel_width(), image.pixel_height()), (1, 1));
    assert!(image.has_metadata());

    let exif = image.exif_data();
    assert!(exif.find_key("NotARealKey").into_result().is_err());
    assert_eq!(
        exif.find_key("Exif.Image.Make").ok().unwrap().to_string(),
        "FakeMake"
    );
    assert!(exif.find_key("Exif.Photo.Flash").is_absent());

    let mut expected: BTreeMap<String, String> = EXIF_TAGS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut got = exif.all_tags();

    // the offset of the Exif IFD depends on the layout
    assert!(got.remove("Exif.Image.ExifTag").is_some());
    assert_eq!(got, expected);

    let iptc = image.iptc_data();
    expected = IPTC_TAGS
        .iter()
        .map(|(k, _, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(iptc.all_tags(), expected);

    let xmp = image.xmp_data();
    expected = XMP_TAGS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(xmp.all_tags(), expected);
}

#[test]
fn metadata_of_a_bare_image() {
    logger();
    let image = Image::open_bytes(pixel_jpeg()).unwrap();
    image.read_metadata().unwrap();

    assert!(!image.has_metadata());
    assert!(image.exif_data().is_empty());
    assert!(image.iptc_data().is_empty());
    assert!(image.xmp_data().is_empty());
    assert_eq!(image.icc_profile(), None);
}

#[test]
fn read_metadata_is_reentrant() {
    logger();
    let image = Image::open_bytes(populated_jpeg()).unwrap();
    image.read_metadata().unwrap();
    let first = image.exif_data().all_tags();

    image.read_metadata().unwrap();
    image.read_metadata().unwrap();
    assert_eq!(image.exif_data().all_tags(), first);
}

#[test]
fn icc_profile() {
    logger();
    let profile: Vec<u8> = (0..=255).collect();
    let image = Image::open_bytes(jpeg_with_icc(&profile)).unwrap();

    assert_eq!(image.icc_profile(), Some(profile));
    assert_eq!((image.pixel_width(), image.pixel_height()), (1, 1));
}

#[test]
fn get_bytes_without_changes() {
    logger();
    let bytes = pixel_jpeg();
    let image = Image::open_bytes(&bytes).unwrap();

    assert_eq!(image.get_bytes().unwrap(), bytes);
    assert_eq!(image.get_bytes().unwrap(), image.get_bytes().unwrap());
}

#[test]
fn get_bytes_after_changes() {
    logger();
    let bytes = pixel_jpeg();
    let image = Image::open_bytes(&bytes).unwrap();

    let before = image.get_bytes().unwrap();
    image.set_exif_string("Exif.Photo.UserComment", "123").unwrap();
    let after = image.get_bytes().unwrap();
    assert!(after.len() > before.len(), "adding a tag must grow the image");

    let tags = image.exif_data().all_tags();
    image.set_exif_string("Exif.Photo.UserComment", "123").unwrap();
    let again = image.get_bytes().unwrap();
    assert_eq!(again.len(), after.len(), "setting the same tag again keeps the size");
    assert_eq!(again, image.get_bytes().unwrap());
    assert_eq!(image.exif_data().all_tags(), tags, "setting a tag twice adds nothing");

    // a different value of the same length
    image.set_exif_string("Exif.Photo.UserComment", "456").unwrap();
    let overwritten = image.get_bytes().unwrap();
    assert_eq!(overwritten.len(), after.len());
    assert_ne!(overwritten, after);
    let overwritten_tags = image.exif_data().all_tags();
    assert!(overwritten_tags.keys().eq(tags.keys()));

    // the result is still a good image
    let reopened = Image::open_bytes(&overwritten).unwrap();
    reopened.read_metadata().unwrap();
    assert_eq!(
        reopened.exif_data().get_string("Exif.Photo.UserComment").unwrap(),
        "456"
    );
}

#[test]
fn save_writes_the_origin_file() {
    logger();
    let file = temp_file(&pixel_jpeg(), ".jpg");

    let image = Image::open(file.path()).unwrap();
    image.set_exif_string("Exif.Image.Artist", "John Doe").unwrap();
    image.save().unwrap();

    let on_disk = std::fs::read(file.path()).unwrap();
    assert_eq!(on_disk, image.get_bytes().unwrap());

    let reopened = Image::open(file.path()).unwrap();
    reopened.read_metadata().unwrap();
    assert_eq!(
        reopened.exif_data().get_string("Exif.Image.Artist").unwrap(),
        "John Doe"
    );
}

#[test]
fn save_to_another_file() {
    logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.webp");

    let image = Image::open_bytes(pixel_webp()).unwrap();
    image.set_xmp_string("Xmp.dc.format", "image/webp").unwrap();
    image.save_to(&path).unwrap();

    let copy = Image::open(&path).unwrap();
    copy.read_metadata().unwrap();
    assert_eq!(copy.xmp_data().get_string("Xmp.dc.format").unwrap(), "image/webp");

    let err = image.save().unwrap_err();
    assert_eq!(err.kind(), Some(CodecErrorKind::WriteFailed));
}
