//! Helpers shared by the integration tests.
//!
//! Test images are built in memory, so no binary assets are needed.

#![allow(dead_code)]

use std::io::Write as _;

use imgmeta::Image;

pub fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// A 1x1 baseline JPEG with a JFIF header and no metadata.
pub fn pixel_jpeg() -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];

    // APP0 (JFIF)
    out.extend([0xFF, 0xE0, 0, 16]);
    out.extend(b"JFIF\0\x01\x02\0\0\x01\0\x01\0\0");

    // SOF0: 8-bit, 1x1, one component
    out.extend([0xFF, 0xC0, 0, 11, 8, 0, 1, 0, 1, 1, 1, 0x11, 0]);

    // SOS, a little scan data, then EOI
    out.extend([0xFF, 0xDA, 0, 8, 1, 1, 0, 0, 0x3f, 0]);
    out.extend([0x12, 0xFF, 0x00, 0x34]);
    out.extend([0xFF, 0xD9]);
    out
}

/// A 1x1 JPEG with an ICC profile split across two `APP2` segments.
pub fn jpeg_with_icc(profile: &[u8]) -> Vec<u8> {
    let (first, second) = profile.split_at(profile.len() / 2);
    let mut out = vec![0xFF, 0xD8];

    // written out of order, to check they're put back together in sequence
    for (seq, part) in [(2_u8, second), (1_u8, first)] {
        let mut payload = b"ICC_PROFILE\0".to_vec();
        payload.extend([seq, 2]);
        payload.extend_from_slice(part);

        out.extend([0xFF, 0xE2]);
        out.extend(((payload.len() + 2) as u16).to_be_bytes());
        out.extend(payload);
    }

    out.extend_from_slice(&pixel_jpeg()[20..]);
    out
}

/// A 1x1 lossless WebP with no metadata.
pub fn pixel_webp() -> Vec<u8> {
    const VP8L: &[u8] = &[0x2f, 0, 0, 0, 0, 0x07, 0x10];

    let mut out = b"RIFF\0\0\0\0WEBP".to_vec();
    out.extend(b"VP8L");
    out.extend((VP8L.len() as u32).to_le_bytes());
    out.extend(VP8L);
    out.push(0); // pad to an even length

    let riff_size = (out.len() - 8) as u32;
    out[4..8].copy_from_slice(&riff_size.to_le_bytes());
    out
}

pub const EXIF_TAGS: [(&str, &str); 13] = [
    ("Exif.Image.Artist", "John Doe"),
    ("Exif.Image.Copyright", "©2023 John Doe, all rights reserved"),
    ("Exif.Image.Make", "FakeMake"),
    ("Exif.Image.Model", "FakeModel"),
    ("Exif.Image.ResolutionUnit", "2"),
    ("Exif.Image.XResolution", "72/1"),
    ("Exif.Image.YCbCrPositioning", "1"),
    ("Exif.Image.YResolution", "72/1"),
    ("Exif.Photo.ColorSpace", "65535"),
    ("Exif.Photo.ComponentsConfiguration", "1 2 3 0"),
    ("Exif.Photo.DateTimeDigitized", "2013:12:08 21:06:10"),
    ("Exif.Photo.ExifVersion", "48 50 51 48"),
    ("Exif.Photo.FlashpixVersion", "48 49 48 48"),
];

/// `(key, value as set, value as read back)`
pub const IPTC_TAGS: [(&str, &str, &str); 4] = [
    (
        "Iptc.Application2.Copyright",
        "this is the copy, right?",
        "this is the copy, right?",
    ),
    ("Iptc.Application2.CountryName", "Lancre", "Lancre"),
    ("Iptc.Application2.DateCreated", "20121013", "2012-10-13"),
    ("Iptc.Application2.TimeCreated", "124932:0100", "12:49:32+01:00"),
];

pub const XMP_TAGS: [(&str, &str); 3] = [
    ("Xmp.iptc.CreditLine", "John Doe"),
    ("Xmp.iptc.CopyrightNotice", "this is the copy, right?"),
    ("Xmp.iptc.JobId", "12345"),
];

/// Sets every tag above on the image.
pub fn populate(image: &Image) {
    for (key, value, _) in IPTC_TAGS {
        image.set_iptc_string(key, value).unwrap();
    }
    for (key, value) in EXIF_TAGS {
        image.set_exif_string(key, value).unwrap();
    }
    for (key, value) in XMP_TAGS {
        image.set_xmp_string(key, value).unwrap();
    }
}

/// The pixel JPEG with every tag above, as bytes.
pub fn populated_jpeg() -> Vec<u8> {
    let image = Image::open_bytes(pixel_jpeg()).unwrap();
    populate(&image);
    image.get_bytes().unwrap()
}

/// Writes the bytes to a fresh temporary file.
pub fn temp_file(bytes: &[u8], suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("imgmeta-")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
