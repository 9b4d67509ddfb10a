//! Errors surfaced by every fallible operation on an [`Image`](crate::Image).
//!
//! Each error carries a numeric code and a message. Codec errors keep the
//! code of the failure that produced them, so callers can match on either
//! the [`CodecErrorKind`] or the message text.

/// A result with this crate's [`Error`] as its default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Something went wrong while handling an image or its metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// [`Image::open_bytes`](crate::Image::open_bytes) was given zero bytes.
    ///
    /// No decoding was attempted.
    EmptyInput,

    /// The metadata format isn't known, or doesn't support the requested
    /// operation (e.g. storing a short in XMP).
    InvalidMetadataFormat,

    /// The key is well-formed, but isn't present.
    KeyNotFound,

    /// The codec reported a failure.
    Codec(CodecError),
}

impl Error {
    /// The numeric code of this error.
    ///
    /// Codec errors pass their code through. [`Error::EmptyInput`] is `0`,
    /// and the other non-codec errors are `-1`.
    pub fn code(&self) -> i32 {
        match self {
            Error::EmptyInput => 0,
            Error::InvalidMetadataFormat | Error::KeyNotFound => -1,
            Error::Codec(e) => e.code(),
        }
    }

    /// The codec error kind, if this came from the codec.
    pub fn kind(&self) -> Option<CodecErrorKind> {
        match self {
            Error::Codec(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::EmptyInput => f.write_str("input is empty"),
            Error::InvalidMetadataFormat => f.write_str("invalid metadata type"),
            Error::KeyNotFound => f.write_str("key not found"),
            Error::Codec(e) => core::fmt::Display::fmt(e, f),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for Error {
    fn from(value: CodecError) -> Self {
        Error::Codec(value)
    }
}

/// The kinds of failure the codec reports.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecErrorKind {
    /// A file couldn't be opened or read.
    OpenFailed,

    /// A file's contents aren't a supported image container.
    UnknownImageType,

    /// In-memory bytes aren't a supported image container.
    InputDataReadFailed,

    /// The container was recognized, but is malformed.
    FailedToReadImageData,

    /// A key didn't follow the `Family.Group.Name` grammar, or named an
    /// unknown group or tag.
    InvalidKey,

    /// An IPTC key named an unknown record.
    InvalidRecordName,

    /// An IPTC key named an unknown dataset.
    InvalidDatasetName,

    /// An XMP key used a prefix with no known namespace.
    InvalidNamespacePrefix,

    /// A value couldn't be parsed for its tag's type.
    InvalidValue,

    /// Embedded metadata was malformed.
    CorruptedMetadata,

    /// The container doesn't support this kind of metadata.
    Unsupported,

    /// A value or segment is too large for its container.
    ValueTooLarge,

    /// Writing the image failed.
    WriteFailed,
}

impl CodecErrorKind {
    /// The numeric code reported for this kind.
    pub const fn code(&self) -> i32 {
        match self {
            CodecErrorKind::InvalidDatasetName => 4,
            CodecErrorKind::InvalidRecordName => 5,
            CodecErrorKind::InvalidKey => 6,
            CodecErrorKind::OpenFailed => 9,
            CodecErrorKind::UnknownImageType => 11,
            CodecErrorKind::FailedToReadImageData => 14,
            CodecErrorKind::InputDataReadFailed => 20,
            CodecErrorKind::WriteFailed => 21,
            CodecErrorKind::ValueTooLarge => 24,
            CodecErrorKind::Unsupported => 32,
            CodecErrorKind::InvalidNamespacePrefix => 35,
            CodecErrorKind::InvalidValue => 56,
            CodecErrorKind::CorruptedMetadata => 59,
        }
    }
}

/// An error reported by the codec, with its code and message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecError {
    kind: CodecErrorKind,
    message: String,
}

impl CodecError {
    /// Creates a new codec error.
    pub fn new(kind: CodecErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> CodecErrorKind {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn invalid_key(key: &str) -> Self {
        Self::new(CodecErrorKind::InvalidKey, format!("Invalid key '{key}'"))
    }

    pub(crate) fn invalid_value(key: &str, value: &str) -> Self {
        Self::new(
            CodecErrorKind::InvalidValue,
            format!("Invalid value '{value}' for key '{key}'"),
        )
    }

    pub(crate) fn corrupted(what: impl core::fmt::Display) -> Self {
        Self::new(
            CodecErrorKind::CorruptedMetadata,
            format!("corrupted image metadata: {what}"),
        )
    }
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_pass_through() {
        assert_eq!(Error::EmptyInput.code(), 0);
        assert_eq!(Error::KeyNotFound.code(), -1);
        assert_eq!(Error::InvalidMetadataFormat.code(), -1);

        let e: Error = CodecError::new(CodecErrorKind::OpenFailed, "nope").into();
        assert_eq!(e.code(), 9);
        assert_eq!(e.kind(), Some(CodecErrorKind::OpenFailed));
        assert_eq!(e.to_string(), "nope");
    }

    #[test]
    fn key_errors_keep_their_text() {
        assert_eq!(
            CodecError::invalid_key("Exif.Invalid.Key").to_string(),
            "Invalid key 'Exif.Invalid.Key'"
        );
        assert_eq!(Error::InvalidMetadataFormat.to_string(), "invalid metadata type");
        assert_eq!(Error::EmptyInput.to_string(), "input is empty");
    }
}
