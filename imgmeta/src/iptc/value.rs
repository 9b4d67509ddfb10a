//! String forms of IPTC values.
//!
//! Dates are stored as `CCYYMMDD` and shown as `CCYY-MM-DD`. Times are
//! stored as `HHMMSS±HHMM` and shown as `HH:MM:SS±HH:MM`.

use imgmeta_types::iptc::IptcTy;

/// The value of one IPTC dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IptcValue {
    ty: IptcTy,
    data: Vec<u8>,
}

impl IptcValue {
    pub(crate) fn new(ty: IptcTy, data: Vec<u8>) -> Self {
        Self { ty, data }
    }

    /// The raw dataset bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn ty(&self) -> IptcTy {
        self.ty
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }
}

fn write_bytes(data: &[u8], f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for (i, b) in data.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{b}")?;
    }
    Ok(())
}

fn is_digits(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_digit)
}

/// `HHMMSS±HHMM` as its ASCII parts.
fn split_time(data: &[u8]) -> Option<(&str, &str, &str, char, &str, &str)> {
    let text = core::str::from_utf8(data).ok()?;
    if text.len() != 11 || !is_digits(&data[..6]) || !is_digits(&data[7..]) {
        return None;
    }
    let sign = match data[6] {
        b'+' => '+',
        b'-' => '-',
        _ => return None,
    };
    Some((
        &text[0..2],
        &text[2..4],
        &text[4..6],
        sign,
        &text[7..9],
        &text[9..11],
    ))
}

impl core::fmt::Display for IptcValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let data = self.data.as_slice();
        match self.ty {
            IptcTy::String => f.write_str(&String::from_utf8_lossy(data)),

            IptcTy::Short => match data {
                [hi, lo] => write!(f, "{}", u16::from_be_bytes([*hi, *lo])),
                _ => write_bytes(data, f),
            },

            IptcTy::Date if data.len() == 8 && is_digits(data) => {
                let text = String::from_utf8_lossy(data);
                write!(f, "{}-{}-{}", &text[0..4], &text[4..6], &text[6..8])
            }

            IptcTy::Time => match split_time(data) {
                Some((h, m, s, sign, zh, zm)) => write!(f, "{h}:{m}:{s}{sign}{zh}:{zm}"),
                None => f.write_str(&String::from_utf8_lossy(data)),
            },

            IptcTy::Date => f.write_str(&String::from_utf8_lossy(data)),

            IptcTy::Undefined => write_bytes(data, f),
        }
    }
}

fn parse_date(text: &str) -> Option<Vec<u8>> {
    if !text.is_ascii() {
        return None;
    }

    let compact: String = match text.len() {
        8 => text.to_owned(),
        10 if text.as_bytes()[4] == b'-' && text.as_bytes()[7] == b'-' => {
            [&text[0..4], &text[5..7], &text[8..10]].concat()
        }
        _ => return None,
    };

    if !is_digits(compact.as_bytes()) {
        return None;
    }
    let month: u8 = compact[4..6].parse().ok()?;
    let day: u8 = compact[6..8].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(compact.into_bytes())
}

fn parse_time(text: &str) -> Option<Vec<u8>> {
    if !text.is_ascii() {
        return None;
    }

    let (clock, zone) = match text.len() {
        // HHMMSS±HHMM
        11 => (text.get(0..6)?.to_owned(), text.get(6..11)?.to_owned()),
        // HHMMSS
        6 => (text.to_owned(), "+0000".to_owned()),
        // HH:MM:SS±HH:MM
        14 => {
            let b = text.as_bytes();
            if b[2] != b':' || b[5] != b':' || b[11] != b':' {
                return None;
            }
            (
                [&text[0..2], &text[3..5], &text[6..8]].concat(),
                [&text[8..9], &text[9..11], &text[12..14]].concat(),
            )
        }
        // HH:MM:SS
        8 => {
            let b = text.as_bytes();
            if b[2] != b':' || b[5] != b':' {
                return None;
            }
            (
                [&text[0..2], &text[3..5], &text[6..8]].concat(),
                "+0000".to_owned(),
            )
        }
        _ => return None,
    };

    // a colon where the sign belongs means `+`
    let sign = match zone.as_bytes().first()? {
        b'+' | b':' => '+',
        b'-' => '-',
        _ => return None,
    };

    let zone_digits = zone.get(1..)?;
    if !is_digits(clock.as_bytes()) || zone_digits.len() != 4 || !is_digits(zone_digits.as_bytes()) {
        return None;
    }

    let hours: u8 = clock[0..2].parse().ok()?;
    let minutes: u8 = clock[2..4].parse().ok()?;
    let seconds: u8 = clock[4..6].parse().ok()?;
    if hours > 23 || minutes > 59 || seconds > 60 {
        return None;
    }

    Some(format!("{clock}{sign}{zone_digits}").into_bytes())
}

/// Parses a string into dataset bytes of the given type.
pub(super) fn parse_text(ty: IptcTy, text: &str) -> Option<Vec<u8>> {
    match ty {
        IptcTy::String => Some(text.as_bytes().to_vec()),
        IptcTy::Short => text
            .trim()
            .parse::<u16>()
            .ok()
            .map(|v| v.to_be_bytes().to_vec()),
        IptcTy::Date => parse_date(text.trim()),
        IptcTy::Time => parse_time(text.trim()),
        IptcTy::Undefined => text
            .split_whitespace()
            .map(|word| word.parse::<u8>().ok())
            .collect(),
    }
}
