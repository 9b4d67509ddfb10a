//! IPTC IIM records and datasets.
//!
//! Keys look like `Iptc.<Record>.<Dataset>`, e.g.
//! `Iptc.Application2.Copyright`. Each dataset has a number within its
//! record and a value type that decides how its bytes are shown.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// An IIM record.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum IptcRecord {
    /// Record 1, describing the transmission envelope.
    Envelope = 1,

    /// Record 2, the editorial data about the object itself.
    Application2 = 2,
}

impl IptcRecord {
    /// Every supported record.
    pub const ALL: [IptcRecord; 2] = [IptcRecord::Envelope, IptcRecord::Application2];

    /// The record's number.
    pub const fn id(&self) -> u8 {
        *self as u8
    }

    /// The record's name as used in keys.
    pub const fn key_name(&self) -> &'static str {
        match self {
            IptcRecord::Envelope => "Envelope",
            IptcRecord::Application2 => "Application2",
        }
    }

    /// Finds a record by its key name.
    pub fn from_key_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key_name() == name)
    }
}

impl TryFrom<u8> for IptcRecord {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Envelope),
            2 => Ok(Self::Application2),
            _ => Err(()),
        }
    }
}

/// How a dataset's bytes are interpreted.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum IptcTy {
    /// Text.
    String,

    /// A big-endian unsigned 16-bit number.
    Short,

    /// `CCYYMMDD`.
    Date,

    /// `HHMMSS±HHMM`.
    Time,

    /// Opaque bytes.
    Undefined,
}

impl IptcTy {
    /// The type's name as IPTC tools print it.
    pub const fn name(&self) -> &'static str {
        match self {
            IptcTy::String => "String",
            IptcTy::Short => "Short",
            IptcTy::Date => "Date",
            IptcTy::Time => "Time",
            IptcTy::Undefined => "Undefined",
        }
    }
}

/// One known dataset.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct IptcDataset {
    pub record: IptcRecord,
    pub number: u8,
    pub name: &'static str,
    pub ty: IptcTy,
    pub repeatable: bool,
}

impl IptcDataset {
    /// Finds a dataset by record and name.
    ///
    /// ```
    /// use imgmeta_types::iptc::{IptcDataset, IptcRecord};
    ///
    /// let ds = IptcDataset::from_name(IptcRecord::Application2, "Copyright").unwrap();
    /// assert_eq!(ds.number, 116);
    /// ```
    pub fn from_name(record: IptcRecord, name: &str) -> Option<&'static IptcDataset> {
        BY_NAME
            .get(name)
            .and_then(|candidates| candidates.iter().find(|d| d.record == record))
            .copied()
    }

    /// Finds a dataset by record and number.
    pub fn from_number(record: IptcRecord, number: u8) -> Option<&'static IptcDataset> {
        BY_NUMBER.get(&(record, number)).copied()
    }
}

static BY_NAME: LazyLock<FxHashMap<&'static str, Vec<&'static IptcDataset>>> =
    LazyLock::new(|| {
        let mut by_name: FxHashMap<&'static str, Vec<&'static IptcDataset>> = FxHashMap::default();
        for dataset in DATASETS {
            by_name.entry(dataset.name).or_default().push(dataset);
        }
        by_name
    });

static BY_NUMBER: LazyLock<FxHashMap<(IptcRecord, u8), &'static IptcDataset>> =
    LazyLock::new(|| DATASETS.iter().map(|d| ((d.record, d.number), d)).collect());

macro_rules! datasets {
    ($( $record:ident $number:literal $name:literal $ty:ident $($rep:ident)?; )+) => {
        /// Every known dataset.
        pub const DATASETS: &[IptcDataset] = &[
            $( IptcDataset {
                record: IptcRecord::$record,
                number: $number,
                name: $name,
                ty: IptcTy::$ty,
                repeatable: datasets!(@rep $($rep)?),
            }, )+
        ];
    };
    (@rep repeatable) => { true };
    (@rep) => { false };
}

datasets! {
    Envelope 0 "ModelVersion" Short;
    Envelope 5 "Destination" String repeatable;
    Envelope 20 "FileFormat" Short;
    Envelope 22 "FileVersion" Short;
    Envelope 30 "ServiceId" String;
    Envelope 40 "EnvelopeNumber" String;
    Envelope 50 "ProductId" String repeatable;
    Envelope 60 "EnvelopePriority" String;
    Envelope 70 "DateSent" Date;
    Envelope 80 "TimeSent" Time;
    Envelope 90 "CharacterSet" Undefined;
    Envelope 100 "UNO" String;
    Envelope 120 "ARMId" Short;
    Envelope 122 "ARMVersion" Short;
    Application2 0 "RecordVersion" Short;
    Application2 3 "ObjectType" String;
    Application2 4 "ObjectAttribute" String repeatable;
    Application2 5 "ObjectName" String;
    Application2 7 "EditStatus" String;
    Application2 8 "EditorialUpdate" String;
    Application2 10 "Urgency" String;
    Application2 12 "Subject" String repeatable;
    Application2 15 "Category" String;
    Application2 20 "SuppCategory" String repeatable;
    Application2 22 "FixtureId" String;
    Application2 25 "Keywords" String repeatable;
    Application2 26 "LocationCode" String repeatable;
    Application2 27 "LocationName" String repeatable;
    Application2 30 "ReleaseDate" Date;
    Application2 35 "ReleaseTime" Time;
    Application2 37 "ExpirationDate" Date;
    Application2 38 "ExpirationTime" Time;
    Application2 40 "SpecialInstructions" String;
    Application2 42 "ActionAdvised" String;
    Application2 45 "ReferenceService" String repeatable;
    Application2 47 "ReferenceDate" Date repeatable;
    Application2 50 "ReferenceNumber" String repeatable;
    Application2 55 "DateCreated" Date;
    Application2 60 "TimeCreated" Time;
    Application2 62 "DigitizationDate" Date;
    Application2 63 "DigitizationTime" Time;
    Application2 65 "Program" String;
    Application2 70 "ProgramVersion" String;
    Application2 75 "ObjectCycle" String;
    Application2 80 "Byline" String repeatable;
    Application2 85 "BylineTitle" String repeatable;
    Application2 90 "City" String;
    Application2 92 "SubLocation" String;
    Application2 95 "ProvinceState" String;
    Application2 100 "CountryCode" String;
    Application2 101 "CountryName" String;
    Application2 103 "TransmissionReference" String;
    Application2 105 "Headline" String;
    Application2 110 "Credit" String;
    Application2 115 "Source" String;
    Application2 116 "Copyright" String;
    Application2 118 "Contact" String repeatable;
    Application2 120 "Caption" String;
    Application2 122 "Writer" String repeatable;
    Application2 125 "RasterizedCaption" Undefined;
    Application2 130 "ImageType" String;
    Application2 131 "ImageOrientation" String;
    Application2 135 "Language" String;
    Application2 150 "AudioType" String;
    Application2 151 "AudioRate" String;
    Application2 152 "AudioResolution" String;
    Application2 153 "AudioDuration" String;
    Application2 154 "AudioOutcue" String;
    Application2 200 "PreviewFormat" Short;
    Application2 201 "PreviewVersion" Short;
    Application2 202 "Preview" Undefined;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_numbers_are_unique_per_record() {
        assert_eq!(BY_NUMBER.len(), DATASETS.len());
        assert_eq!(BY_NAME.values().map(Vec::len).sum::<usize>(), DATASETS.len());
    }

    #[test]
    fn lookups_agree() {
        let by_name = IptcDataset::from_name(IptcRecord::Envelope, "ModelVersion").unwrap();
        let by_number = IptcDataset::from_number(IptcRecord::Envelope, 0).unwrap();
        assert_eq!(by_name, by_number);
        assert_eq!(by_name.ty, IptcTy::Short);
        assert!(IptcDataset::from_name(IptcRecord::Envelope, "Copyright").is_none());
    }
}
