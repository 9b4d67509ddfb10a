//! One metadata entry.

use crate::{
    Image, MetadataFormat,
    container::{ExifNs, IptcNs, Namespace, XmpNs},
};

/// A key and a snapshot of its value.
///
/// The datum keeps its image alive, but doesn't change with it: mutating the
/// image afterwards leaves this value as it was.
#[derive(Clone)]
pub struct Datum<N: Namespace> {
    image: Image,
    key: N::Key,
    value: N::Value,
}

pub type ExifDatum = Datum<ExifNs>;
pub type IptcDatum = Datum<IptcNs>;
pub type XmpDatum = Datum<XmpNs>;

impl<N: Namespace> Datum<N> {
    pub(crate) fn new(image: Image, key: N::Key, value: N::Value) -> Self {
        Self { image, key, value }
    }

    /// The parsed key. Its `Display` form is the full key, like
    /// `Exif.Image.Make`.
    pub fn key(&self) -> &N::Key {
        &self.key
    }

    pub fn value(&self) -> &N::Value {
        &self.value
    }

    pub fn format(&self) -> MetadataFormat {
        N::FORMAT
    }

    /// The image this came from.
    pub fn image(&self) -> &Image {
        &self.image
    }
}

impl<N: Namespace> core::fmt::Display for Datum<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.value, f)
    }
}

impl<N: Namespace> core::fmt::Debug for Datum<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Datum")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Image, providers::jpeg::tests::jpeg, util::logger};

    #[test]
    fn datums_are_snapshots() {
        logger();
        let image = Image::open_bytes(jpeg(&[])).unwrap();
        image.set_exif_string("Exif.Image.Artist", "John Doe").unwrap();

        let datum = image.exif_data().find_key("Exif.Image.Artist").ok().unwrap();
        image.set_exif_string("Exif.Image.Artist", "Jane Doe").unwrap();

        assert_eq!(datum.key().to_string(), "Exif.Image.Artist");
        assert_eq!(datum.to_string(), "John Doe");
        assert_eq!(datum.value().type_name(), "Ascii");
        assert!(datum.image().ptr_eq(&image));
    }

    #[test]
    fn datums_keep_the_image_alive() {
        logger();
        let datum = {
            let image = Image::open_bytes(jpeg(&[])).unwrap();
            image.set_xmp_string("Xmp.dc.format", "image/jpeg").unwrap();
            image.xmp_data().find_key("Xmp.dc.format").ok().unwrap()
        };

        assert_eq!(datum.image().xmp_data().len(), 1);
        assert_eq!(datum.to_string(), "image/jpeg");
    }
}
