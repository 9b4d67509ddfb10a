use imgmeta::{Datum, Image, Namespace};

mod common;
use common::*;

fn populated() -> Image {
    let image = Image::open_bytes(populated_jpeg()).unwrap();
    image.read_metadata().unwrap();
    image
}

fn collect<N: Namespace>(iter: impl Iterator<Item = Datum<N>>) -> Vec<(String, String)> {
    iter.map(|datum| (datum.key().to_string(), datum.to_string()))
        .collect()
}

#[test]
fn iterating_each_namespace() {
    logger();
    let image = populated();

    let exif = collect(image.exif_data().iter());
    assert_eq!(exif.len(), EXIF_TAGS.len() + 1, "plus the Exif IFD pointer");
    for (key, value) in EXIF_TAGS {
        assert!(
            exif.contains(&(key.to_string(), value.to_string())),
            "missing `{key}`"
        );
    }

    let iptc = collect(image.iptc_data().iter());
    let expected: Vec<(String, String)> = IPTC_TAGS
        .iter()
        .map(|(k, _, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(iptc, expected, "datasets keep their order");

    let mut xmp = collect(image.xmp_data().iter());
    xmp.sort();
    let mut expected: Vec<(String, String)> = XMP_TAGS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    expected.sort();
    assert_eq!(xmp, expected);
}

#[test]
fn has_next_agrees_with_next() {
    logger();
    let image = populated();
    let mut iter = image.iptc_data().iter();

    let mut seen = 0;
    while iter.has_next() {
        assert!(iter.next().is_some());
        seen += 1;
    }
    assert_eq!(seen, IPTC_TAGS.len());
    assert!(iter.next().is_none());
    assert!(!iter.has_next());
}

#[test]
fn iterating_before_reading_gives_nothing() {
    logger();
    let image = Image::open_bytes(populated_jpeg()).unwrap();

    let mut iter = image.exif_data().iter();
    assert!(!iter.has_next());
    assert!(iter.next().is_none());
}

#[test]
fn changes_stop_running_iterators() {
    logger();
    let image = populated();
    let mut iter = image.xmp_data().iter();
    assert!(iter.next().is_some());

    image.set_xmp_string("Xmp.dc.format", "image/jpeg").unwrap();
    assert!(!iter.has_next());
    assert!(iter.next().is_none());

    // a new one sees the change
    assert_eq!(image.xmp_data().iter().count(), XMP_TAGS.len() + 1);
}

#[test]
fn datums_outlive_changes() {
    logger();
    let image = populated();
    let datum = image
        .iptc_data()
        .find_key("Iptc.Application2.CountryName")
        .ok()
        .unwrap();

    image.iptc_strip_key("Iptc.Application2.CountryName").unwrap();
    drop(image);

    assert_eq!(datum.key().to_string(), "Iptc.Application2.CountryName");
    assert_eq!(datum.to_string(), "Lancre");
    assert!(datum.image().iptc_data().find_key("Iptc.Application2.CountryName").is_absent());
}

#[test]
fn containers_iterate_by_reference() {
    logger();
    let image = populated();
    let exif = image.exif_data();

    let mut count = 0;
    for datum in &exif {
        assert!(datum.key().to_string().starts_with("Exif."));
        count += 1;
    }
    assert_eq!(count, exif.len());
}
