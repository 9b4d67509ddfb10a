//! Changing an image's metadata.
//!
//! Changes are made to the parsed metadata right away, then written into the
//! image's bytes on the next [`Image::get_bytes`], [`Image::read_metadata`]
//! or [`Image::save`].

use std::collections::BTreeSet;

use super::Image;
use crate::{
    MetadataFormat,
    container::{ExifNs, IptcNs, Namespace, XmpNs, entries_of},
    error::{CodecError, CodecErrorKind, Error, Result},
};

impl Image {
    /// Sets a key to a value given as a string.
    ///
    /// The string is parsed according to the key's type, like `72/1` for a
    /// rational or `2012-10-13` for an IPTC date. Metadata is loaded first if
    /// it hasn't been yet.
    ///
    /// # Errors
    ///
    /// Invalid keys and values give their codec errors, and the namespace is
    /// left untouched. Setting IPTC in a container that can't hold it gives
    /// `Unsupported`, and a value that would make the metadata too large for
    /// the container gives `ValueTooLarge`.
    pub fn set_metadata_string(&self, format: MetadataFormat, key: &str, value: &str) -> Result<()> {
        log::trace!("Setting `{key}` to `{value}`.");
        match format {
            MetadataFormat::Exif => self.set_string::<ExifNs>(key, value),
            MetadataFormat::Iptc => self.set_string::<IptcNs>(key, value),
            MetadataFormat::Xmp => self.set_string::<XmpNs>(key, value),
        }
    }

    /// Sets a key to a single unsigned short, given as a decimal string.
    ///
    /// # Errors
    ///
    /// XMP has no shorts, so it gives [`Error::InvalidMetadataFormat`].
    /// Otherwise, this fails like [`Image::set_metadata_string`].
    pub fn set_metadata_short(&self, format: MetadataFormat, key: &str, value: &str) -> Result<()> {
        log::trace!("Setting `{key}` to short `{value}`.");
        match format {
            MetadataFormat::Exif => self
                .state_mut()
                .mutate(format, |m| m.exif.set_short(key, value)),

            MetadataFormat::Iptc => {
                self.check_iptc_support()?;
                self.state_mut()
                    .mutate(format, |m| m.iptc.set_short(key, value))
            }

            MetadataFormat::Xmp => {
                log::error!("XMP can't store `{key}` as a short.");
                Err(Error::InvalidMetadataFormat)
            }
        }
    }

    /// Removes every entry with the key.
    ///
    /// A valid key that isn't present is fine.
    pub fn strip_key(&self, format: MetadataFormat, key: &str) -> Result<()> {
        match format {
            MetadataFormat::Exif => self.strip::<ExifNs>(key),
            MetadataFormat::Iptc => self.strip::<IptcNs>(key),
            MetadataFormat::Xmp => self.strip::<XmpNs>(key),
        }
    }

    /// Removes all metadata, except the given keys.
    ///
    /// EXIF is stripped first, then IPTC, then XMP. This stops at the first
    /// failure.
    pub fn strip_metadata<S: AsRef<str>>(&self, except: &[S]) -> Result<()> {
        self.exif_strip_metadata(except)?;
        self.iptc_strip_metadata(except)?;
        self.xmp_strip_metadata(except)
    }

    pub fn set_exif_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_metadata_string(MetadataFormat::Exif, key, value)
    }

    pub fn set_iptc_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_metadata_string(MetadataFormat::Iptc, key, value)
    }

    pub fn set_xmp_string(&self, key: &str, value: &str) -> Result<()> {
        self.set_metadata_string(MetadataFormat::Xmp, key, value)
    }

    pub fn set_exif_short(&self, key: &str, value: &str) -> Result<()> {
        self.set_metadata_short(MetadataFormat::Exif, key, value)
    }

    pub fn set_iptc_short(&self, key: &str, value: &str) -> Result<()> {
        self.set_metadata_short(MetadataFormat::Iptc, key, value)
    }

    pub fn exif_strip_key(&self, key: &str) -> Result<()> {
        self.strip_key(MetadataFormat::Exif, key)
    }

    pub fn iptc_strip_key(&self, key: &str) -> Result<()> {
        self.strip_key(MetadataFormat::Iptc, key)
    }

    pub fn xmp_strip_key(&self, key: &str) -> Result<()> {
        self.strip_key(MetadataFormat::Xmp, key)
    }

    /// Removes all EXIF, except the given keys.
    pub fn exif_strip_metadata<S: AsRef<str>>(&self, except: &[S]) -> Result<()> {
        self.strip_all::<ExifNs, S>(except)
    }

    /// Removes all IPTC, except the given keys.
    pub fn iptc_strip_metadata<S: AsRef<str>>(&self, except: &[S]) -> Result<()> {
        self.strip_all::<IptcNs, S>(except)
    }

    /// Removes all XMP, except the given keys.
    pub fn xmp_strip_metadata<S: AsRef<str>>(&self, except: &[S]) -> Result<()> {
        self.strip_all::<XmpNs, S>(except)
    }

    fn set_string<N: Namespace>(&self, key: &str, value: &str) -> Result<()> {
        if N::FORMAT == MetadataFormat::Iptc {
            self.check_iptc_support()?;
        }

        self.state_mut()
            .mutate(N::FORMAT, |m| N::set_string(m, key, value))
    }

    fn strip<N: Namespace>(&self, key: &str) -> Result<()> {
        log::trace!("Stripping `{key}`.");
        self.state_mut().mutate(N::FORMAT, |m| N::strip_key(m, key))
    }

    fn strip_all<N: Namespace, S: AsRef<str>>(&self, except: &[S]) -> Result<()> {
        // one guard from listing to stripping, so no other handle can add
        // keys in between
        let mut state = self.state_mut();

        // existing entries must be loaded, or there'd be nothing to list
        let metadata = state.ensure_loaded()?;

        let keep: BTreeSet<&str> = except.iter().map(|key| key.as_ref()).collect();
        let doomed: BTreeSet<String> = entries_of::<N>(metadata)
            .into_iter()
            .map(|(key, _)| key.to_string())
            .filter(|key| !keep.contains(key.as_str()))
            .collect();

        if doomed.is_empty() {
            return Ok(());
        }

        log::debug!("Stripping `{}` keys from `{}`.", doomed.len(), N::FORMAT);
        state.mutate(N::FORMAT, |m| {
            doomed.iter().try_for_each(|key| N::strip_key(m, key))
        })
    }

    fn check_iptc_support(&self) -> Result<()> {
        let state = self.state();
        let provider = state.provider();
        if provider.supports_iptc() {
            return Ok(());
        }

        log::error!("`{}` images can't hold IPTC.", provider.magic_number());
        Err(CodecError::new(
            CodecErrorKind::Unsupported,
            format!(
                "Setting IPTC in {} images is not supported",
                provider.magic_number()
            ),
        )
        .into())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error, Image, MetadataFormat,
        error::CodecErrorKind,
        providers::{
            jpeg::tests::jpeg,
            webp::tests::{VP8L_1X1, make_webp_sample},
        },
        util::logger,
    };

    fn jpeg_image() -> Image {
        Image::open_bytes(jpeg(&[])).unwrap()
    }

    #[test]
    fn xmp_has_no_shorts() {
        logger();
        let image = jpeg_image();
        let err = image
            .set_metadata_short(MetadataFormat::Xmp, "Xmp.iptc.JobId", "1")
            .unwrap_err();
        assert_eq!(err, Error::InvalidMetadataFormat);
        assert_eq!(err.to_string(), "invalid metadata type");
    }

    #[test]
    fn failed_changes_leave_metadata_alone() {
        logger();
        let image = jpeg_image();
        image.set_exif_string("Exif.Image.Make", "FakeMake").unwrap();
        let before = image.get_bytes().unwrap();

        let err = image.set_exif_string("Exif.Invalid.Key", "x").unwrap_err();
        assert!(err.to_string().contains("Invalid key"));
        let err = image.set_exif_string("Exif.Image.XResolution", "not a number").unwrap_err();
        assert_eq!(err.kind(), Some(CodecErrorKind::InvalidValue));

        assert_eq!(image.exif_data().len(), 1);
        assert_eq!(image.get_bytes().unwrap(), before);
    }

    #[test]
    fn values_too_large_for_the_container_are_refused() {
        logger();
        let image = jpeg_image();
        image.set_exif_string("Exif.Image.Make", "FakeMake").unwrap();
        let before = image.get_bytes().unwrap();

        let mut iter = image.exif_data().iter();
        let huge = "a".repeat(70_000);
        let err = image
            .set_exif_string("Exif.Image.ImageDescription", &huge)
            .unwrap_err();
        assert_eq!(err.kind(), Some(CodecErrorKind::ValueTooLarge));

        // nothing changed, so a running iterator keeps going
        assert!(iter.next().is_some());
        assert_eq!(image.exif_data().keys(), ["Exif.Image.Make"]);
        assert!(!image.state().is_dirty());
        assert_eq!(image.get_bytes().unwrap(), before);
    }

    #[test]
    fn key_errors_stay_distinct() {
        logger();
        let image = jpeg_image();

        let cases = [
            (MetadataFormat::Iptc, "Exif.Invalid.Key", "Invalid key"),
            (MetadataFormat::Iptc, "Iptc.Invalid.Key", "Invalid record name"),
            (MetadataFormat::Iptc, "Iptc.Application2.Nonsense", "Invalid dataset name"),
            (
                MetadataFormat::Xmp,
                "Xmp.Invalid.Key",
                "No namespace info available for XMP prefix",
            ),
        ];
        for (format, key, expected) in cases {
            let err = image.set_metadata_string(format, key, "x").unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "`{key}` gave `{err}`, expected `{expected}`"
            );
        }
    }

    #[test]
    fn webp_rejects_iptc() {
        logger();
        let image = Image::open_bytes(make_webp_sample(vec![(b"VP8L", VP8L_1X1)])).unwrap();

        let err = image
            .set_iptc_string("Iptc.Application2.City", "Lancre")
            .unwrap_err();
        assert_eq!(err.kind(), Some(CodecErrorKind::Unsupported));
        let err = image.set_iptc_short("Iptc.Envelope.ModelVersion", "4").unwrap_err();
        assert_eq!(err.kind(), Some(CodecErrorKind::Unsupported));

        // stripping has nothing to do, so it's fine
        image.iptc_strip_key("Iptc.Application2.City").unwrap();
        image.get_bytes().unwrap();
    }

    #[test]
    fn stripping_keeps_listed_keys() {
        logger();
        let image = jpeg_image();
        image.set_exif_string("Exif.Image.Make", "FakeMake").unwrap();
        image.set_exif_string("Exif.Image.Model", "FakeModel").unwrap();
        image.set_iptc_string("Iptc.Application2.City", "Lancre").unwrap();
        image.set_xmp_string("Xmp.dc.format", "image/jpeg").unwrap();

        image.strip_metadata(&["Exif.Image.Model"]).unwrap();
        assert_eq!(image.exif_data().keys(), ["Exif.Image.Model"]);
        assert!(image.iptc_data().is_empty());
        assert!(image.xmp_data().is_empty());

        image.read_metadata().unwrap();
        assert_eq!(image.exif_data().keys(), ["Exif.Image.Model"]);
        assert!(image.iptc_data().is_empty());
    }

    #[test]
    fn mutations_load_existing_metadata_first() {
        logger();
        let image = jpeg_image();
        image.set_exif_string("Exif.Image.Make", "FakeMake").unwrap();
        let bytes = image.get_bytes().unwrap();

        // without calling `read_metadata`
        let reopened = Image::open_bytes(bytes).unwrap();
        reopened.set_exif_string("Exif.Image.Model", "FakeModel").unwrap();
        assert_eq!(reopened.exif_data().len(), 2);
        assert_eq!(reopened.exif_data().get_string("Exif.Image.Make").unwrap(), "FakeMake");
    }
}
