use std::collections::BTreeMap;

use imgmeta::{CodecErrorKind, Error, Image, MetadataFormat, MetadataProvider};

mod common;
use common::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Container {
    Jpeg,
    Webp,
}

impl Container {
    fn open(self) -> Image {
        let bytes = match self {
            Container::Jpeg => pixel_jpeg(),
            Container::Webp => pixel_webp(),
        };
        Image::open_bytes(bytes).unwrap()
    }
}

fn data_of(image: &Image, format: MetadataFormat) -> Box<dyn MetadataProvider> {
    match format {
        MetadataFormat::Exif => Box::new(image.exif_data()),
        MetadataFormat::Iptc => Box::new(image.iptc_data()),
        MetadataFormat::Xmp => Box::new(image.xmp_data()),
    }
}

const HELLO: &str = "Hello, world! Привет, мир!";

#[test]
fn set_metadata_string() {
    logger();

    // `(format, key, value, container, expected error)`
    let cases = [
        (MetadataFormat::Exif, "Exif.Photo.UserComment", HELLO, Container::Jpeg, None),
        (MetadataFormat::Exif, "Exif.Photo.UserComment", HELLO, Container::Webp, None),
        (MetadataFormat::Iptc, "Iptc.Application2.Caption", HELLO, Container::Jpeg, None),
        (
            MetadataFormat::Iptc,
            "Exif.Invalid.Key",
            "this value should not be written",
            Container::Jpeg,
            Some("Invalid key"),
        ),
        (MetadataFormat::Xmp, "Xmp.iptc.CreditLine", "Hello, world!", Container::Jpeg, None),
        (MetadataFormat::Xmp, "Xmp.iptc.CreditLine", "Hello, world!", Container::Webp, None),
        (
            MetadataFormat::Exif,
            "Exif.Invalid.Key",
            "this value should not be written",
            Container::Webp,
            Some("Invalid key"),
        ),
        (
            MetadataFormat::Iptc,
            "Iptc.Invalid.Key",
            "this value should not be written",
            Container::Jpeg,
            Some("Invalid record name"),
        ),
        (
            MetadataFormat::Xmp,
            "Xmp.Invalid.Key",
            "this value should not be written",
            Container::Jpeg,
            Some("No namespace info available for XMP prefix"),
        ),
        (
            MetadataFormat::Iptc,
            "Iptc.Application2.Caption",
            HELLO,
            Container::Webp,
            Some("not supported"),
        ),
    ];

    for (i, (format, key, value, container, expected_err)) in cases.into_iter().enumerate() {
        let image = container.open();
        let result = image.set_metadata_string(format, key, value);

        if let Some(expected) = expected_err {
            let err = result.expect_err(&format!("case #{i} should fail"));
            assert!(
                err.to_string().contains(expected),
                "case #{i}: `{err}` should contain `{expected}`"
            );
            continue;
        }

        result.unwrap_or_else(|e| panic!("case #{i} failed to set `{key}`: {e}"));
        image.read_metadata().unwrap();
        assert_eq!(
            data_of(&image, format).get_string(key).unwrap(),
            value,
            "case #{i}: value read must equal value written"
        );
    }
}

#[test]
fn set_metadata_short() {
    logger();

    let cases = [
        (MetadataFormat::Exif, "Exif.Photo.ExposureProgram", "1", Container::Jpeg, None),
        (MetadataFormat::Exif, "Exif.Photo.ExposureProgram", "2", Container::Webp, None),
        (MetadataFormat::Iptc, "Iptc.Envelope.ModelVersion", "3", Container::Jpeg, None),
        (MetadataFormat::Exif, "Exif.Invalid.Key", "4", Container::Jpeg, Some("Invalid key")),
        (MetadataFormat::Exif, "Exif.Invalid.Key", "5", Container::Webp, Some("Invalid key")),
        (
            MetadataFormat::Iptc,
            "Iptc.Invalid.Key",
            "6",
            Container::Jpeg,
            Some("Invalid record name"),
        ),
        (
            MetadataFormat::Xmp,
            "Xmp.iptc.JobId",
            "7",
            Container::Jpeg,
            Some("invalid metadata type"),
        ),
    ];

    for (i, (format, key, value, container, expected_err)) in cases.into_iter().enumerate() {
        let image = container.open();
        let result = image.set_metadata_short(format, key, value);

        if let Some(expected) = expected_err {
            let err = result.expect_err(&format!("case #{i} should fail"));
            assert!(
                err.to_string().contains(expected),
                "case #{i}: `{err}` should contain `{expected}`"
            );
            continue;
        }

        result.unwrap_or_else(|e| panic!("case #{i} failed to set `{key}`: {e}"));
        image.read_metadata().unwrap();
        assert_eq!(data_of(&image, format).get_string(key).unwrap(), value, "case #{i}");
    }
}

#[test]
fn unknown_formats_are_rejected() {
    logger();
    let err = MetadataFormat::from_raw(999).unwrap_err();
    assert_eq!(err, Error::InvalidMetadataFormat);
    assert!(err.to_string().contains("invalid metadata type"));
}

#[test]
fn set_iptc_short() {
    logger();
    let image = Container::Jpeg.open();
    image.set_iptc_short("Iptc.Envelope.ModelVersion", "1").unwrap();
    image.read_metadata().unwrap();

    assert_eq!(
        image.iptc_data().get_string("Iptc.Envelope.ModelVersion").unwrap(),
        "1"
    );
}

#[test]
fn iptc_dates_and_times_are_normalized() {
    logger();
    let image = Container::Jpeg.open();
    image.set_iptc_string("Iptc.Application2.DateCreated", "2012-10-13").unwrap();
    image.set_iptc_string("Iptc.Application2.TimeCreated", "12:49:32+01:00").unwrap();
    image.read_metadata().unwrap();

    let iptc = image.iptc_data();
    assert_eq!(iptc.get_string("Iptc.Application2.DateCreated").unwrap(), "2012-10-13");
    assert_eq!(iptc.get_string("Iptc.Application2.TimeCreated").unwrap(), "12:49:32+01:00");

    let err = image
        .set_iptc_string("Iptc.Application2.DateCreated", "yesterday")
        .unwrap_err();
    assert_eq!(err.kind(), Some(CodecErrorKind::InvalidValue));
}

#[test]
fn strip_key_in_each_namespace() {
    logger();
    let cases = [
        (MetadataFormat::Exif, "Exif.Photo.UserComment"),
        (MetadataFormat::Iptc, "Iptc.Application2.Caption"),
        (MetadataFormat::Xmp, "Xmp.dc.description"),
    ];

    for (format, key) in cases {
        let image = Container::Jpeg.open();
        image.set_metadata_string(format, key, "123").unwrap();
        image.strip_key(format, key).unwrap();
        image.read_metadata().unwrap();

        assert_eq!(data_of(&image, format).get_string(key), Err(Error::KeyNotFound));
    }
}

#[test]
fn strip_each_namespace() {
    logger();
    let cases = [
        (MetadataFormat::Exif, "Exif.Photo.UserComment", "Exif.Photo.DateTimeOriginal"),
        (MetadataFormat::Iptc, "Iptc.Application2.Caption", "Iptc.Application2.Keywords"),
        (MetadataFormat::Xmp, "Xmp.dc.description", "Xmp.dc.subject"),
    ];

    for (format, kept, stripped) in cases {
        let image = Container::Jpeg.open();
        image.set_metadata_string(format, kept, "123").unwrap();
        image.set_metadata_string(format, stripped, "123").unwrap();

        let except = [kept];
        match format {
            MetadataFormat::Exif => image.exif_strip_metadata(&except),
            MetadataFormat::Iptc => image.iptc_strip_metadata(&except),
            MetadataFormat::Xmp => image.xmp_strip_metadata(&except),
        }
        .unwrap();
        image.read_metadata().unwrap();

        let data = data_of(&image, format);
        assert_eq!(data.get_string(kept).unwrap(), "123", "{format}");
        assert_eq!(data.get_string(stripped), Err(Error::KeyNotFound), "{format}");
    }
}

#[test]
fn strip_metadata() {
    logger();
    let image = Image::open_bytes(populated_jpeg()).unwrap();
    image.read_metadata().unwrap();

    image
        .strip_metadata(&[
            "Exif.Image.Copyright",
            "Iptc.Application2.Copyright",
            "Xmp.iptc.CreditLine",
        ])
        .unwrap();

    let one = |key: &str, value: &str| BTreeMap::from([(key.to_string(), value.to_string())]);

    assert_eq!(
        image.exif_data().all_tags(),
        one("Exif.Image.Copyright", "©2023 John Doe, all rights reserved")
    );
    assert_eq!(
        image.iptc_data().all_tags(),
        one("Iptc.Application2.Copyright", "this is the copy, right?")
    );
    assert_eq!(
        image.xmp_data().all_tags(),
        one("Xmp.iptc.CreditLine", "John Doe")
    );

    // and it holds once written out
    image.read_metadata().unwrap();
    assert_eq!(image.exif_data().len(), 1);
    assert_eq!(image.iptc_data().len(), 1);
    assert_eq!(image.xmp_data().len(), 1);
}

#[test]
fn strip_metadata_without_reading_first() {
    logger();
    let image = Image::open_bytes(populated_jpeg()).unwrap();
    image.strip_metadata::<&str>(&[]).unwrap();

    assert!(!image.has_metadata());
    let bare = Image::open_bytes(image.get_bytes().unwrap()).unwrap();
    assert!(!bare.has_metadata());
}

#[test]
fn invalid_keys_leave_exif_untouched() {
    logger();
    let image = Image::open_bytes(populated_jpeg()).unwrap();
    image.read_metadata().unwrap();
    let before = image.exif_data().all_tags();

    let err = image.set_exif_string("Exif.Invalid.Key", "x").unwrap_err();
    assert!(err.to_string().contains("Invalid key"));
    let err = image.exif_strip_key("Exif.Invalid.Key").unwrap_err();
    assert_eq!(err.kind(), Some(CodecErrorKind::InvalidKey));

    assert_eq!(image.exif_data().all_tags(), before);
}

#[test]
fn unicode_comments_survive_both_containers() {
    logger();
    for container in [Container::Jpeg, Container::Webp] {
        let image = container.open();
        image.set_exif_string("Exif.Photo.UserComment", HELLO).unwrap();

        let reopened = Image::open_bytes(image.get_bytes().unwrap()).unwrap();
        reopened.read_metadata().unwrap();
        assert_eq!(
            reopened.exif_data().get_string("Exif.Photo.UserComment").unwrap(),
            HELLO,
            "{container:?}"
        );
    }
}

#[test]
fn values_that_cant_be_written_are_refused() {
    logger();
    let image = Container::Jpeg.open();
    let original = image.get_bytes().unwrap();

    let huge = "a".repeat(70_000);
    let err = image
        .set_exif_string("Exif.Image.ImageDescription", &huge)
        .unwrap_err();
    assert_eq!(err.kind(), Some(CodecErrorKind::ValueTooLarge));
    assert_eq!(image.get_bytes().unwrap(), original);

    // the image still takes other changes
    image.set_xmp_string("Xmp.dc.format", "image/jpeg").unwrap();
    image.read_metadata().unwrap();
    assert_eq!(
        image.exif_data().get_string("Exif.Image.ImageDescription"),
        Err(Error::KeyNotFound)
    );
    assert_eq!(image.xmp_data().get_string("Xmp.dc.format").unwrap(), "image/jpeg");

    let err = image.set_xmp_string("Xmp.dc.title", &huge).unwrap_err();
    assert_eq!(err.kind(), Some(CodecErrorKind::ValueTooLarge));
    image.get_bytes().unwrap();
}

#[test]
fn iptc_datasets_that_overflow_together_are_refused() {
    logger();
    let image = Container::Jpeg.open();
    let big = "b".repeat(30_000);

    image.set_iptc_string("Iptc.Application2.Caption", &big).unwrap();
    image.set_iptc_string("Iptc.Application2.Headline", &big).unwrap();
    let err = image
        .set_iptc_string("Iptc.Application2.Copyright", &"c".repeat(10_000))
        .unwrap_err();
    assert_eq!(err.kind(), Some(CodecErrorKind::ValueTooLarge));

    // what was accepted round-trips
    image.read_metadata().unwrap();
    let iptc = image.iptc_data();
    assert_eq!(iptc.get_string("Iptc.Application2.Caption").unwrap(), big);
    assert_eq!(iptc.get_string("Iptc.Application2.Headline").unwrap(), big);
    assert_eq!(
        iptc.get_string("Iptc.Application2.Copyright"),
        Err(Error::KeyNotFound)
    );
}

#[test]
fn webp_chunks_hold_large_values() {
    logger();
    let image = Container::Webp.open();
    let huge = "a".repeat(70_000);

    image.set_exif_string("Exif.Image.ImageDescription", &huge).unwrap();
    image.read_metadata().unwrap();
    assert_eq!(
        image.exif_data().get_string("Exif.Image.ImageDescription").unwrap(),
        huge
    );
}
