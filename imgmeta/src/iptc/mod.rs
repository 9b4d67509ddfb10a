//! IPTC-IIM: a list of tagged datasets, each belonging to a record.
//!
//! Every dataset starts with the `0x1C` tag marker, then its record number,
//! dataset number, and a big-endian length. Lengths with the high bit set
//! are "extended": the low bits say how many of the following bytes hold
//! the real length.
//!
//! In JPEG, these datasets live inside a Photoshop resource block. That
//! wrapper is handled by the JPEG provider.

use winnow::{
    Parser as _,
    binary::{be_u16, u8},
    error::EmptyError,
    token::take,
};

use self::error::IptcError;
use crate::error::{CodecError, CodecErrorKind};
use imgmeta_types::iptc::IptcRecord;

pub mod error;
mod key;
mod value;

pub use key::IptcKey;
pub use value::IptcValue;

/// The tag marker starting each dataset.
const TAG_MARKER: u8 = 0x1c;

/// Longest value a standard (non-extended) dataset can hold.
pub const MAX_DATASET_LEN: usize = 0x7fff;

/// One dataset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IptcEntry {
    pub record: IptcRecord,
    pub number: u8,
    pub data: Vec<u8>,
}

impl IptcEntry {
    pub fn key(&self) -> IptcKey {
        IptcKey {
            record: self.record,
            number: self.number,
        }
    }

    pub fn value(&self) -> IptcValue {
        IptcValue::new(self.key().ty(), self.data.clone())
    }
}

/// Parsed IPTC.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Iptc {
    /// Datasets, in the order they were found or added.
    pub entries: Vec<IptcEntry>,
}

impl Iptc {
    /// Parses a run of IIM datasets.
    ///
    /// Stray bytes between datasets (often padding) are skipped. Datasets
    /// from records we don't know are dropped.
    pub fn new(mut input: &[u8]) -> Result<Self, IptcError> {
        let total = input.len();
        let mut entries = Vec::new();
        let mut skipped: usize = 0;

        while let Some(&first) = input.first() {
            if first != TAG_MARKER {
                skipped += 1;
                input = &input[1..];
                continue;
            }

            let at = total - input.len();
            let (record, number, data) = parse_dataset(&mut input, at)?;

            match IptcRecord::try_from(record) {
                Ok(record) => entries.push(IptcEntry {
                    record,
                    number,
                    data: data.to_vec(),
                }),
                Err(()) => log::debug!("Dropping dataset `{record}:{number}` from unknown record."),
            }
        }

        if skipped > 0 {
            log::warn!("Skipped `{skipped}` stray bytes between IPTC datasets.");
        }

        log::trace!("Parsed `{}` IPTC datasets.", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<(IptcKey, IptcValue)> {
        self.entries.get(index).map(|e| (e.key(), e.value()))
    }

    /// Finds the first dataset with the key.
    pub fn find(&self, key: &IptcKey) -> Option<(IptcKey, IptcValue)> {
        self.entries
            .iter()
            .find(|e| e.key() == *key)
            .map(|e| (e.key(), e.value()))
    }

    /// Sets a dataset from its string form.
    ///
    /// The first dataset with this key is replaced. If there isn't one, a
    /// new dataset is appended.
    pub fn set_string(&mut self, key: &str, value: &str) -> Result<(), CodecError> {
        let parsed_key = IptcKey::parse(key)?;
        let data = value::parse_text(parsed_key.ty(), value).ok_or_else(|| {
            log::error!("Couldn't parse `{value}` as `{:?}` for `{key}`.", parsed_key.ty());
            CodecError::invalid_value(key, value)
        })?;

        self.upsert(key, parsed_key, data)
    }

    /// Sets a dataset to a big-endian short.
    pub fn set_short(&mut self, key: &str, value: &str) -> Result<(), CodecError> {
        let parsed_key = IptcKey::parse(key)?;
        let short: u16 = value.trim().parse().map_err(|_| {
            log::error!("`{value}` isn't a valid short for `{key}`.");
            CodecError::invalid_value(key, value)
        })?;

        self.upsert(key, parsed_key, short.to_be_bytes().to_vec())
    }

    /// Removes every dataset with the key.
    pub fn strip_key(&mut self, key: &str) -> Result<(), CodecError> {
        let parsed_key = IptcKey::parse(key)?;
        self.entries.retain(|e| e.key() != parsed_key);
        Ok(())
    }

    fn upsert(&mut self, raw_key: &str, key: IptcKey, data: Vec<u8>) -> Result<(), CodecError> {
        if data.len() > MAX_DATASET_LEN {
            log::error!("Value for `{raw_key}` is `{}` bytes long.", data.len());
            return Err(CodecError::new(
                CodecErrorKind::ValueTooLarge,
                format!("Value for '{raw_key}' is too large"),
            ));
        }

        match self.entries.iter_mut().find(|e| e.key() == key) {
            Some(entry) => entry.data = data,
            None => self.entries.push(IptcEntry {
                record: key.record,
                number: key.number,
                data,
            }),
        }
        Ok(())
    }

    /// Encodes the datasets, envelope record first.
    ///
    /// Returns `None` when there are no datasets.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        if self.entries.is_empty() {
            return None;
        }

        let mut sorted: Vec<&IptcEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.record.id());

        let mut out = Vec::new();
        for entry in sorted {
            out.extend_from_slice(&[TAG_MARKER, entry.record.id(), entry.number]);

            let len = entry.data.len();
            if len <= MAX_DATASET_LEN {
                out.extend_from_slice(&(len as u16).to_be_bytes());
            } else {
                out.extend_from_slice(&0x8004_u16.to_be_bytes());
                out.extend_from_slice(&(len as u32).to_be_bytes());
            }
            out.extend_from_slice(&entry.data);
        }

        Some(out)
    }
}

/// Parses one dataset, starting at its tag marker.
fn parse_dataset<'i>(input: &mut &'i [u8], at: usize) -> Result<(u8, u8, &'i [u8]), IptcError> {
    let (_marker, record, number, raw_len) = (u8, u8, u8, be_u16)
        .parse_next(input)
        .map_err(|_: EmptyError| IptcError::TruncatedHeader { at })?;

    let len: usize = if raw_len & 0x8000 != 0 {
        let length_of_length = raw_len & 0x7fff;
        if !(1..=4).contains(&length_of_length) {
            return Err(IptcError::BadExtendedLength { length_of_length });
        }

        let len_bytes: &[u8] = take(length_of_length as usize)
            .parse_next(input)
            .map_err(|_: EmptyError| IptcError::TruncatedHeader { at })?;
        len_bytes
            .iter()
            .fold(0_usize, |acc, b| (acc << 8) | *b as usize)
    } else {
        raw_len as usize
    };

    let available = input.len();
    let data: &[u8] = take(len)
        .parse_next(input)
        .map_err(|_: EmptyError| IptcError::TruncatedData {
            record,
            number,
            expected: len,
            available,
        })?;

    Ok((record, number, data))
}

#[cfg(test)]
mod tests {
    use super::{Iptc, error::IptcError};
    use crate::{error::CodecErrorKind, util::logger};
    use imgmeta_types::iptc::IptcRecord;

    fn dataset(record: u8, number: u8, data: &[u8]) -> Vec<u8> {
        let mut v = vec![0x1c, record, number];
        v.extend_from_slice(&(data.len() as u16).to_be_bytes());
        v.extend_from_slice(data);
        v
    }

    #[test]
    fn parses_datasets_and_skips_padding() {
        logger();

        let mut bytes = dataset(1, 0, &[0, 4]);
        bytes.extend(dataset(2, 25, b"cat"));
        bytes.extend(dataset(2, 25, b"dog"));
        bytes.extend(dataset(7, 10, b"??")); // unknown record
        bytes.extend([0, 0]);

        let iptc = Iptc::new(&bytes).unwrap();
        assert_eq!(iptc.len(), 3);
        assert_eq!(iptc.entries[0].record, IptcRecord::Envelope);

        let (key, value) = iptc.entry(0).unwrap();
        assert_eq!(key.to_string(), "Iptc.Envelope.ModelVersion");
        assert_eq!(value.to_string(), "4");

        let (key, value) = iptc.entry(2).unwrap();
        assert_eq!(key.to_string(), "Iptc.Application2.Keywords");
        assert_eq!(value.to_string(), "dog");
    }

    #[test]
    fn extended_lengths() {
        logger();

        let mut bytes = vec![0x1c, 2, 202, 0x80, 0x02, 0x00, 0x03];
        bytes.extend_from_slice(b"abc");
        let iptc = Iptc::new(&bytes).unwrap();
        assert_eq!(iptc.entries[0].data, b"abc");

        assert_eq!(
            Iptc::new(&[0x1c, 2, 202, 0x80, 0x09]),
            Err(IptcError::BadExtendedLength {
                length_of_length: 9
            })
        );
    }

    #[test]
    fn truncated_data_is_an_error() {
        logger();

        let mut bytes = vec![0x1c, 2, 116, 0, 10];
        bytes.extend_from_slice(b"short");
        assert_eq!(
            Iptc::new(&bytes),
            Err(IptcError::TruncatedData {
                record: 2,
                number: 116,
                expected: 10,
                available: 5,
            })
        );
    }

    #[test]
    fn set_strip_and_encode() {
        logger();

        let mut iptc = Iptc::default();
        iptc.set_string("Iptc.Application2.Copyright", "this is the copy, right?")
            .unwrap();
        iptc.set_string("Iptc.Application2.CountryName", "Lancre")
            .unwrap();
        iptc.set_short("Iptc.Envelope.ModelVersion", "3").unwrap();

        // re-setting replaces instead of appending
        iptc.set_string("Iptc.Application2.CountryName", "Lancre")
            .unwrap();
        assert_eq!(iptc.len(), 3);

        let encoded = iptc.to_bytes().unwrap();
        let parsed = Iptc::new(&encoded).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(
            parsed.entry(0).unwrap().0.to_string(),
            "Iptc.Envelope.ModelVersion",
            "envelope comes first"
        );

        let err = iptc
            .set_string("Iptc.Application2.DateCreated", "yesterday")
            .unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::InvalidValue);

        let err = iptc
            .set_string("Iptc.Application2.Caption", &"a".repeat(40_000))
            .unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::ValueTooLarge);
        assert_eq!(iptc.len(), 3);

        iptc.strip_key("Iptc.Application2.CountryName").unwrap();
        iptc.strip_key("Iptc.Application2.Keywords").unwrap();
        assert_eq!(iptc.len(), 2);

        iptc.strip_key("Iptc.Application2.Copyright").unwrap();
        iptc.strip_key("Iptc.Envelope.ModelVersion").unwrap();
        assert_eq!(iptc.to_bytes(), None);
    }
}
