/// A JPEG file's segment list couldn't be read.
///
/// Offsets count from the start of the file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JpegConstructionError {
    /// The file didn't open with `SOI`.
    MissingSoi { found: u8 },

    /// A segment didn't start with `0xFF`.
    ExpectedMarker { at: usize, found: u8 },

    /// `0x00` and `0xFF` aren't marker codes.
    BadMarkerCode { at: usize, code: u8 },

    /// The file ended inside a marker or its length.
    UnexpectedEnd { at: usize },

    /// A segment's length was shorter than its own length field.
    LengthTooSmall { at: usize, code: u8, len: u16 },

    /// A segment's payload ran past the end of the file.
    PayloadOverrun {
        at: usize,
        code: u8,
        len: u16,
        remaining: usize,
    },
}

impl core::fmt::Display for JpegConstructionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingSoi { found } => {
                write!(f, "expected an SOI marker first, found `0x{found:02X}`")
            }
            Self::ExpectedMarker { at, found } => {
                write!(f, "expected a marker at byte `{at}`, found `0x{found:02X}`")
            }
            Self::BadMarkerCode { at, code } => {
                write!(f, "marker at byte `{at}` has the reserved code `0x{code:02X}`")
            }
            Self::UnexpectedEnd { at } => {
                write!(f, "file ended in the middle of a marker at byte `{at}`")
            }
            Self::LengthTooSmall { at, code, len } => write!(
                f,
                "segment `0x{code:02X}` at byte `{at}` claims a length of `{len}`, \
                which can't hold its own length field"
            ),
            Self::PayloadOverrun {
                at,
                code,
                len,
                remaining,
            } => write!(
                f,
                "segment `0x{code:02X}` at byte `{at}` needs `{len}` bytes, \
                but only `{remaining}` are left"
            ),
        }
    }
}

impl core::error::Error for JpegConstructionError {}

/// A Photoshop image resource block list couldn't be read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrbError {
    /// A block didn't start with a known resource signature.
    BadSignature { at: usize },

    /// A block's header or data ran past the end of the segment.
    Truncated { at: usize },
}

impl core::fmt::Display for IrbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadSignature { at } => {
                write!(f, "Image resource block at byte `{at}` had no `8BIM` signature.")
            }
            Self::Truncated { at } => {
                write!(f, "Image resource block at byte `{at}` was cut short.")
            }
        }
    }
}

impl core::error::Error for IrbError {}
