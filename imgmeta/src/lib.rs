//! # `imgmeta`
//!
//! A library to read and edit the EXIF, IPTC and XMP metadata embedded in
//! images.
//!
//! ## Usage
//!
//! Open an [`Image`], load its metadata, then read it through one of the
//! containers ([`ExifData`], [`IptcData`], [`XmpData`]) or change it through
//! the mutation methods on [`Image`]. [`Image::get_bytes`] gives back the
//! file with every change applied.
//!
//! ```no_run
//! use imgmeta::{Image, MetadataFormat};
//!
//! # fn main() -> imgmeta::Result<()> {
//! let image = Image::open("photo.jpg")?;
//! image.read_metadata()?;
//!
//! let make = image.exif_data().get_string("Exif.Image.Make")?;
//! println!("taken with a {make}");
//!
//! image.set_metadata_string(MetadataFormat::Iptc, "Iptc.Application2.City", "Lancre")?;
//! image.save()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Handles
//!
//! An [`Image`] is a cheap, cloneable handle. Containers, datums and
//! iterators each hold one, so the image stays alive for as long as any of
//! them exist. Every handle to the same image sees the same state.
//!
//! ## Supported containers
//!
//! JPEG and WebP. WebP files can't hold IPTC, so setting IPTC on them fails.
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the MIT License at your option.

#![forbid(unsafe_code)]

pub mod container;
pub mod datum;
pub mod error;
pub mod exif;
pub mod image;
pub mod iptc;
pub mod iter;
pub mod magic_number;
pub mod metadata;
pub mod providers;
pub mod xmp;

pub use container::{
    Container, ExifData, ExifNs, IptcData, IptcNs, Lookup, MetadataProvider, Namespace, XmpData,
    XmpNs,
};
pub use datum::{Datum, ExifDatum, IptcDatum, XmpDatum};
pub use error::{CodecError, CodecErrorKind, Error, Result};
pub use image::{Image, Origin};
pub use iter::DatumIter;
pub use magic_number::{AnyProvider, MagicNumber};

/// Finds the format of a file from its first few bytes.
///
/// This doesn't parse the rest of the file.
pub fn get(input: &impl AsRef<[u8]>) -> Option<MagicNumber> {
    magic_number::get(input)
}

/// Finds the format of a file, then parses its layout.
///
/// Returns `None` if the format isn't supported.
pub fn parse(
    input: &impl AsRef<[u8]>,
) -> Option<core::result::Result<AnyProvider, magic_number::AnyConstructionError>> {
    magic_number::parse(input)
}

/// One of the three metadata namespaces.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataFormat {
    Exif = 0,
    Iptc = 1,
    Xmp = 2,
}

impl MetadataFormat {
    /// Maps a raw integer onto a format.
    ///
    /// # Errors
    ///
    /// Unknown values give [`Error::InvalidMetadataFormat`].
    pub fn from_raw(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(Self::Exif),
            1 => Ok(Self::Iptc),
            2 => Ok(Self::Xmp),
            other => {
                log::error!("`{other}` isn't a metadata format.");
                Err(Error::InvalidMetadataFormat)
            }
        }
    }

    /// The family name that starts each key, like `Exif`.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Exif => "Exif",
            Self::Iptc => "Iptc",
            Self::Xmp => "Xmp",
        }
    }
}

impl TryFrom<i32> for MetadataFormat {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::from_raw(value)
    }
}

impl core::fmt::Display for MetadataFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// How much this crate logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Mute = 4,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Mute => log::LevelFilter::Off,
        }
    }
}

/// Sets the most verbose level of log messages that will be emitted.
///
/// Messages still go through whichever `log` implementation the application
/// installed. This only raises or lowers the global filter.
pub fn set_log_level(level: LogLevel) {
    log::set_max_level(level.into());
}

/// Internal utility methods.
pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_from_raw_values() {
        assert_eq!(MetadataFormat::from_raw(0), Ok(MetadataFormat::Exif));
        assert_eq!(MetadataFormat::from_raw(1), Ok(MetadataFormat::Iptc));
        assert_eq!(MetadataFormat::try_from(2), Ok(MetadataFormat::Xmp));
        assert_eq!(MetadataFormat::from_raw(3), Err(Error::InvalidMetadataFormat));
        assert_eq!(MetadataFormat::from_raw(-1), Err(Error::InvalidMetadataFormat));
    }

    #[test]
    fn log_levels_map_onto_filters() {
        assert_eq!(log::LevelFilter::from(LogLevel::Mute), log::LevelFilter::Off);
        assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
    }
}
