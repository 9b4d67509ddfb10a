use crate::error::CodecError;

/// An error that occurred while parsing IPTC datasets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IptcError {
    /// A dataset header ended before its record, number, or length.
    TruncatedHeader { at: usize },

    /// An extended length used an impossible number of length bytes.
    BadExtendedLength { length_of_length: u16 },

    /// The dataset claimed more data than is left in the blob.
    TruncatedData {
        record: u8,
        number: u8,
        expected: usize,
        available: usize,
    },
}

impl core::fmt::Display for IptcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IptcError::TruncatedHeader { at } => {
                write!(f, "A dataset header was cut short at byte `{at}`.")
            }
            IptcError::BadExtendedLength { length_of_length } => write!(
                f,
                "Dataset used an extended length made of `{length_of_length}` bytes."
            ),
            IptcError::TruncatedData {
                record,
                number,
                expected,
                available,
            } => write!(
                f,
                "Dataset `{record}:{number}` wanted `{expected}` bytes, \
                but only `{available}` were left."
            ),
        }
    }
}

impl core::error::Error for IptcError {}

impl From<IptcError> for CodecError {
    fn from(value: IptcError) -> Self {
        CodecError::corrupted(format_args!("IPTC: {value}"))
    }
}
