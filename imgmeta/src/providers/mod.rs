//! # Providers
//!
//! Providers represent a source of metadata: an image container format, like
//! JPEG or WebP.
//!
//! Each provider implements [`Provider`]. That gives the rest of the crate
//! one way to find a container's metadata blobs and to rebuild the file
//! with some of them replaced.

use crate::error::CodecError;

pub mod jpeg;
pub mod webp;

/// What to do with one metadata blob when rebuilding a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Replacement<'a> {
    /// Leave the stored blob alone.
    Keep,

    /// Remove the blob entirely.
    Remove,

    /// Store these bytes instead.
    Set(&'a [u8]),
}

/// Replacements for each kind of metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rewrite<'a> {
    pub exif: Replacement<'a>,
    pub iptc: Replacement<'a>,
    pub xmp: Replacement<'a>,
}

impl Rewrite<'_> {
    /// A rewrite that changes nothing.
    pub const KEEP: Rewrite<'static> = Rewrite {
        exif: Replacement::Keep,
        iptc: Replacement::Keep,
        xmp: Replacement::Keep,
    };
}

/// An image container holding metadata.
pub trait Provider: Clone + core::fmt::Debug + Sized + Send + Sync {
    /// An error that can occur when calling [`Provider::new`].
    type ConstructionError: Clone + core::fmt::Debug + core::error::Error + Send + Sync;

    /// Checks whether the input starts like this container.
    ///
    /// This doesn't parse anything else.
    fn magic_number(input: &[u8]) -> bool;

    /// Parses the container's layout.
    ///
    /// Metadata blobs are found, but not parsed.
    fn new(input: &[u8]) -> Result<Self, Self::ConstructionError>;

    /// `(width, height)` in pixels, if the container says.
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// The embedded ICC color profile.
    fn icc_profile(&self) -> Option<Vec<u8>>;

    /// The TIFF-structured EXIF blob, without any container signature.
    fn exif_raw(&self) -> Option<&[u8]>;

    /// The IPTC-IIM datasets.
    fn iptc_raw(&self) -> Option<&[u8]>;

    /// The XMP packet.
    fn xmp_raw(&self) -> Option<&[u8]>;

    /// Whether this container can store IPTC.
    fn supports_iptc(&self) -> bool;

    /// Serializes the container with the given metadata changes.
    fn rebuild(&self, rewrite: &Rewrite<'_>) -> Result<Vec<u8>, CodecError>;
}
