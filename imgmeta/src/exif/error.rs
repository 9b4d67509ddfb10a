use imgmeta_types::exif::primitives::PrimitiveTy;

use crate::error::CodecError;

/// The blob as a whole couldn't be read, so none of it is used.
pub type ExifFatalResult<T> = Result<T, ExifFatalError>;

/// One field couldn't be read. It's skipped and the rest of its IFD is kept.
pub type ExifFieldResult<T> = Result<T, ExifFieldError>;

#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum ExifFatalError {
    /// Fewer than two bytes, so no `II` or `MM`.
    NoByteOrderMarker { len: u8 },

    /// Neither `II` nor `MM`.
    WeirdByteOrderMarker { found: [u8; 2] },

    NoTiffMagicNumber,

    /// Not `42`.
    MagicNumberWasntTiff { found: u16 },

    NoTiffHeaderOffset,

    /// The first IFD would start inside the 8-byte header.
    HeaderOffsetBeforeHeader,

    IfdOffsetOutOfBounds { offset: u32 },

    IfdNoEntryCount,

    /// Zero entries.
    IfdHadZeroFields,

    /// Cut short before the next-IFD offset.
    IfdNoPointer,
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum ExifFieldError {
    FieldNoTag,
    FieldNoTy,
    FieldUnknownType { got: u16 },
    FieldNoCount,
    FieldNoOffsetOrValue,

    /// The value's offset is past the end of the blob.
    OffsetTooFar { offset: u32 },

    /// The value is longer than what's left of the blob.
    OuttaData { ty: PrimitiveTy },
}

impl core::fmt::Display for ExifFatalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoByteOrderMarker { len } => {
                write!(f, "blob of `{len}` bytes is too short for a byte order")
            }
            Self::WeirdByteOrderMarker { found } => {
                write!(f, "unknown byte order `{}`", found.escape_ascii())
            }
            Self::NoTiffMagicNumber => f.write_str("blob ended before the TIFF magic number"),
            Self::MagicNumberWasntTiff { found } => {
                write!(f, "TIFF magic number should be `42`, found `{found}`")
            }
            Self::NoTiffHeaderOffset => f.write_str("blob ended before the first IFD offset"),
            Self::HeaderOffsetBeforeHeader => f.write_str("first IFD offset points into the header"),
            Self::IfdOffsetOutOfBounds { offset } => {
                write!(f, "IFD offset `{offset}` is past the end of the blob")
            }
            Self::IfdNoEntryCount => f.write_str("IFD ended before its entry count"),
            Self::IfdHadZeroFields => f.write_str("IFD has no entries"),
            Self::IfdNoPointer => f.write_str("IFD ended before its next-IFD offset"),
        }
    }
}

impl core::fmt::Display for ExifFieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FieldNoTag => f.write_str("field ended before its tag"),
            Self::FieldNoTy => f.write_str("field ended before its type"),
            Self::FieldUnknownType { got } => write!(f, "field has unknown type `{got}`"),
            Self::FieldNoCount => f.write_str("field ended before its count"),
            Self::FieldNoOffsetOrValue => f.write_str("field ended before its value or offset"),
            Self::OffsetTooFar { offset } => {
                write!(f, "field value offset `{offset}` is past the end of the blob")
            }
            Self::OuttaData { ty } => write!(f, "blob ended inside a `{ty:?}` value"),
        }
    }
}

impl core::error::Error for ExifFatalError {}
impl core::error::Error for ExifFieldError {}

impl From<ExifFatalError> for CodecError {
    fn from(value: ExifFatalError) -> Self {
        CodecError::corrupted(format_args!("Exif: {value}"))
    }
}
