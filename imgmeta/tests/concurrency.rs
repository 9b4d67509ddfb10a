use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use imgmeta::Image;

mod common;
use common::*;

/// Many threads, each with its own image.
#[test]
fn independent_images() {
    logger();
    let bytes = Arc::new(populated_jpeg());

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let bytes = Arc::clone(&bytes);
            thread::spawn(move || {
                let image = Image::open_bytes(bytes.as_slice()).unwrap();
                image.read_metadata().unwrap();
                image
                    .set_exif_string("Exif.Image.ImageDescription", &format!("thread {i}"))
                    .unwrap();

                let out = image.get_bytes().unwrap();
                let reopened = Image::open_bytes(&out).unwrap();
                reopened.read_metadata().unwrap();
                assert_eq!(
                    reopened
                        .exif_data()
                        .get_string("Exif.Image.ImageDescription")
                        .unwrap(),
                    format!("thread {i}")
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

/// Many threads, all sharing one image.
#[test]
fn shared_image() {
    logger();
    let image = Image::open_bytes(pixel_jpeg()).unwrap();

    thread::scope(|s| {
        for i in 0..16 {
            let image = image.clone();
            s.spawn(move || {
                image
                    .set_iptc_string("Iptc.Application2.Keywords", &format!("keyword {i}"))
                    .unwrap();
                image.get_bytes().unwrap();

                // readers may see any state, but always a whole one
                let tags = image.iptc_data().all_tags();
                assert!(tags.contains_key("Iptc.Application2.Keywords"));
                for datum in image.iptc_data().iter() {
                    assert!(datum.to_string().starts_with("keyword "));
                }
            });
        }
    });

    image.read_metadata().unwrap();
    assert!(
        image
            .iptc_data()
            .get_string("Iptc.Application2.Keywords")
            .unwrap()
            .starts_with("keyword ")
    );
}

/// Whole-namespace reads see every entry, even while another handle
/// keeps changing the namespace.
#[test]
fn listings_are_never_cut_short() {
    logger();
    let image = Image::open_bytes(pixel_jpeg()).unwrap();
    image.set_iptc_string("Iptc.Application2.City", "Lancre").unwrap();
    image.set_iptc_string("Iptc.Application2.Keywords", "start").unwrap();

    let done = AtomicBool::new(false);
    thread::scope(|s| {
        let writer = image.clone();
        let done = &done;
        s.spawn(move || {
            let mut i = 0_u64;
            while !done.load(Ordering::Relaxed) {
                writer
                    .set_iptc_string("Iptc.Application2.Keywords", &format!("keyword {i}"))
                    .unwrap();
                i += 1;
            }
        });

        for _ in 0..20_000 {
            assert_eq!(image.iptc_data().all_tags().len(), 2);
            assert_eq!(image.iptc_data().keys().len(), 2);
        }
        done.store(true, Ordering::Relaxed);
    });
}

#[test]
fn handles_are_send_and_sync() {
    fn check<T: Send + Sync>() {}
    check::<Image>();
    check::<imgmeta::ExifData>();
    check::<imgmeta::IptcDatum>();
    check::<imgmeta::DatumIter<imgmeta::XmpNs>>();
}
