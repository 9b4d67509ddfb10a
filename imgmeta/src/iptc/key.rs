use imgmeta_types::iptc::{IptcDataset, IptcRecord, IptcTy};

use crate::error::{CodecError, CodecErrorKind};

/// A parsed `Iptc.<Record>.<Dataset>` key.
///
/// Datasets missing from the dictionary are named by their number in hex,
/// like `Iptc.Application2.0x00c8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IptcKey {
    pub record: IptcRecord,
    pub number: u8,
}

impl IptcKey {
    pub const FAMILY: &'static str = "Iptc";

    /// Parses a key.
    ///
    /// Each part fails with its own error: a bad family or shape is an
    /// invalid key, then the record name, then the dataset name.
    pub fn parse(key: &str) -> Result<Self, CodecError> {
        let mut parts = key.split('.');
        let (Some(family), Some(record), Some(dataset), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            log::debug!("Rejecting IPTC key `{key}`.");
            return Err(CodecError::invalid_key(key));
        };

        if family != Self::FAMILY {
            log::debug!("IPTC key `{key}` has the wrong family.");
            return Err(CodecError::invalid_key(key));
        }

        let Some(record_id) = IptcRecord::from_key_name(record) else {
            return Err(CodecError::new(
                CodecErrorKind::InvalidRecordName,
                format!("Invalid record name '{record}'"),
            ));
        };

        let number = match IptcDataset::from_name(record_id, dataset) {
            Some(known) => known.number,
            None => parse_hex_number(dataset).ok_or_else(|| {
                CodecError::new(
                    CodecErrorKind::InvalidDatasetName,
                    format!("Invalid dataset name '{dataset}'"),
                )
            })?,
        };

        Ok(Self {
            record: record_id,
            number,
        })
    }

    /// The dictionary entry for this dataset, if it's known.
    pub fn dataset(&self) -> Option<&'static IptcDataset> {
        IptcDataset::from_number(self.record, self.number)
    }

    /// How values for this dataset are typed.
    ///
    /// Unknown datasets hold strings.
    pub fn ty(&self) -> IptcTy {
        self.dataset().map(|d| d.ty).unwrap_or(IptcTy::String)
    }
}

impl core::fmt::Display for IptcKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.", Self::FAMILY, self.record.key_name())?;
        match self.dataset() {
            Some(known) => f.write_str(known.name),
            None => write!(f, "0x{:04x}", self.number),
        }
    }
}

fn parse_hex_number(name: &str) -> Option<u8> {
    let digits = name.strip_prefix("0x")?;
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16)
        .ok()
        .and_then(|n| u8::try_from(n).ok())
}
