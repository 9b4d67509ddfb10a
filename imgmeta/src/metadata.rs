//! The parsed metadata of one image.

use crate::{
    MetadataFormat,
    error::CodecError,
    exif::Exif,
    iptc::Iptc,
    magic_number::AnyProvider,
    providers::{Replacement, Rewrite},
    xmp::Xmp,
};

/// All three metadata namespaces, parsed from a container.
///
/// Blobs the container doesn't have are left empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub exif: Exif,
    pub iptc: Iptc,
    pub xmp: Xmp,
}

impl Metadata {
    /// Parses every metadata blob the provider found.
    ///
    /// # Errors
    ///
    /// A blob that's present but malformed gives a `CorruptedMetadata` error.
    pub fn load(provider: &AnyProvider) -> Result<Self, CodecError> {
        let exif = match provider.exif_raw() {
            Some(mut raw) if !raw.is_empty() => {
                log::trace!("Parsing `{}` bytes of Exif...", raw.len());
                Exif::new(&mut raw).map_err(|e| {
                    log::error!("Image has corrupted Exif. err: {e}");
                    CodecError::from(e)
                })?
            }
            _ => Exif::default(),
        };

        let iptc = match provider.iptc_raw() {
            Some(raw) => {
                log::trace!("Parsing `{}` bytes of IPTC...", raw.len());
                Iptc::new(raw).map_err(|e| {
                    log::error!("Image has corrupted IPTC. err: {e}");
                    CodecError::from(e)
                })?
            }
            None => Iptc::default(),
        };

        let xmp = match provider.xmp_raw() {
            Some(raw) => {
                log::trace!("Parsing `{}` bytes of XMP...", raw.len());
                Xmp::new(raw).map_err(|e| {
                    log::error!("Image has corrupted XMP. err: {e}");
                    CodecError::from(e)
                })?
            }
            None => Xmp::default(),
        };

        log::debug!(
            "Loaded metadata: `{}` Exif, `{}` IPTC, and `{}` XMP entries.",
            exif.len(),
            iptc.len(),
            xmp.len()
        );
        Ok(Self { exif, iptc, xmp })
    }

    /// Encodes the namespaces marked in `dirty`.
    pub(crate) fn encode(&self, dirty: Dirty) -> Encoded {
        Encoded {
            exif: dirty.exif.then(|| self.exif.to_bytes()),
            iptc: dirty.iptc.then(|| self.iptc.to_bytes()),
            xmp: dirty.xmp.then(|| self.xmp.to_bytes()),
        }
    }
}

/// Which namespaces have changed since the buffer was last written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Dirty {
    pub exif: bool,
    pub iptc: bool,
    pub xmp: bool,
}

impl Dirty {
    pub fn any(&self) -> bool {
        self.exif || self.iptc || self.xmp
    }

    pub fn mark(&mut self, format: MetadataFormat) {
        match format {
            MetadataFormat::Exif => self.exif = true,
            MetadataFormat::Iptc => self.iptc = true,
            MetadataFormat::Xmp => self.xmp = true,
        }
    }
}

/// Freshly encoded blobs.
///
/// Outer `None`: keep what's stored. Inner `None`: remove it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Encoded {
    exif: Option<Option<Vec<u8>>>,
    iptc: Option<Option<Vec<u8>>>,
    xmp: Option<Option<Vec<u8>>>,
}

impl Encoded {
    pub fn rewrite(&self) -> Rewrite<'_> {
        fn replacement(blob: &Option<Option<Vec<u8>>>) -> Replacement<'_> {
            match blob {
                None => Replacement::Keep,
                Some(None) => Replacement::Remove,
                Some(Some(bytes)) => Replacement::Set(bytes),
            }
        }

        Rewrite {
            exif: replacement(&self.exif),
            iptc: replacement(&self.iptc),
            xmp: replacement(&self.xmp),
        }
    }
}
