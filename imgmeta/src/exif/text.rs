//! Converts Exif values to and from their string forms.
//!
//! - ASCII is read up to its first NUL.
//! - Numbers are space-separated; rationals are written `n/d`.
//! - `Undefined` bytes are written as decimal numbers.
//! - Comment tags (like `UserComment`) start with an 8-byte character code,
//!   written as a `charset=<name> ` prefix unless it's undefined.

use imgmeta_types::exif::{
    Endianness, FieldData,
    primitives::{Primitive, PrimitiveTy, Rational, SRational},
};

/// The value of one Exif entry.
///
/// Its string form is rendered on demand through [`Display`](core::fmt::Display).
#[derive(Clone, Debug, PartialEq)]
pub struct ExifValue {
    data: FieldData,
    comment: bool,
    endianness: Endianness,
}

impl ExifValue {
    pub(crate) fn new(data: FieldData, comment: bool, endianness: Endianness) -> Self {
        Self {
            data,
            comment,
            endianness,
        }
    }

    /// The raw primitives.
    pub fn data(&self) -> &FieldData {
        &self.data
    }

    pub fn ty(&self) -> PrimitiveTy {
        self.data.ty()
    }

    /// The value's type name, like `Ascii` or `Rational`.
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }
}

impl core::fmt::Display for ExifValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let primitives = self.data.primitives();

        if self.comment {
            return render_comment(&bytes_of(primitives), self.endianness, f);
        }

        if self.ty() == PrimitiveTy::Ascii {
            let bytes = bytes_of(primitives);
            let text = bytes.split(|b| *b == 0).next().unwrap_or_default();
            return f.write_str(&String::from_utf8_lossy(text));
        }

        for (i, primitive) in primitives.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match primitive {
                Primitive::Byte(v) | Primitive::Ascii(v) | Primitive::Undefined(v) => {
                    write!(f, "{v}")?
                }
                Primitive::SByte(v) => write!(f, "{v}")?,
                Primitive::Short(v) => write!(f, "{v}")?,
                Primitive::SShort(v) => write!(f, "{v}")?,
                Primitive::Long(v) => write!(f, "{v}")?,
                Primitive::SLong(v) => write!(f, "{v}")?,
                Primitive::Rational(r) => write!(f, "{}/{}", r.numerator, r.denominator)?,
                Primitive::SRational(r) => write!(f, "{}/{}", r.numerator, r.denominator)?,
                Primitive::Float(v) => write!(f, "{v}")?,
                Primitive::Double(v) => write!(f, "{v}")?,
            }
        }

        Ok(())
    }
}

/// Character codes that prefix comment values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Charset {
    Ascii,
    Jis,
    Unicode,
    Undefined,
}

impl Charset {
    const ALL: [Charset; 4] = [
        Charset::Ascii,
        Charset::Jis,
        Charset::Unicode,
        Charset::Undefined,
    ];

    const fn code(&self) -> &'static [u8; 8] {
        match self {
            Charset::Ascii => b"ASCII\0\0\0",
            Charset::Jis => b"JIS\0\0\0\0\0",
            Charset::Unicode => b"UNICODE\0",
            Charset::Undefined => &[0_u8; 8],
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Charset::Ascii => "Ascii",
            Charset::Jis => "Jis",
            Charset::Unicode => "Unicode",
            Charset::Undefined => "Undefined",
        }
    }

    fn from_code(code: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code().as_slice() == code)
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

fn bytes_of(primitives: &[Primitive]) -> Vec<u8> {
    primitives
        .iter()
        .filter_map(|p| match *p {
            Primitive::Byte(v) | Primitive::Ascii(v) | Primitive::Undefined(v) => Some(v),
            Primitive::SByte(v) => Some(v as u8),
            _ => None,
        })
        .collect()
}

fn render_comment(
    bytes: &[u8],
    endianness: Endianness,
    f: &mut core::fmt::Formatter<'_>,
) -> core::fmt::Result {
    let Some((code, body)) = bytes.split_at_checked(8) else {
        return f.write_str(String::from_utf8_lossy(bytes).trim_end_matches('\0'));
    };

    match Charset::from_code(code) {
        Some(Charset::Unicode) => {
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| match endianness {
                    Endianness::Little => u16::from_le_bytes([pair[0], pair[1]]),
                    Endianness::Big => u16::from_be_bytes([pair[0], pair[1]]),
                })
                .collect();
            write!(
                f,
                "charset=Unicode {}",
                String::from_utf16_lossy(&units).trim_end_matches('\0')
            )
        }
        Some(charset @ (Charset::Ascii | Charset::Jis)) => write!(
            f,
            "charset={} {}",
            charset.name(),
            String::from_utf8_lossy(body).trim_end_matches('\0')
        ),
        Some(Charset::Undefined) | None => {
            f.write_str(String::from_utf8_lossy(body).trim_end_matches('\0'))
        }
    }
}

/// Parses a comment's string form, with an optional `charset=` prefix.
fn parse_comment(text: &str, endianness: Endianness) -> Option<Vec<u8>> {
    let (charset, body) = match text.strip_prefix("charset=") {
        Some(rest) => {
            let (name, body) = rest.split_once(' ').unwrap_or((rest, ""));
            (Charset::from_name(name.trim_matches('"'))?, body)
        }
        None => (Charset::Undefined, text),
    };

    let mut out = charset.code().to_vec();
    match charset {
        Charset::Unicode => {
            for unit in body.encode_utf16() {
                out.extend_from_slice(&match endianness {
                    Endianness::Little => unit.to_le_bytes(),
                    Endianness::Big => unit.to_be_bytes(),
                });
            }
        }
        _ => out.extend_from_slice(body.as_bytes()),
    }

    Some(out)
}

fn parse_rational(word: &str) -> Option<Rational> {
    Some(match word.split_once('/') {
        Some((n, d)) => Rational {
            numerator: n.parse().ok()?,
            denominator: d.parse().ok()?,
        },
        None => Rational {
            numerator: word.parse().ok()?,
            denominator: 1,
        },
    })
}

fn parse_srational(word: &str) -> Option<SRational> {
    Some(match word.split_once('/') {
        Some((n, d)) => SRational {
            numerator: n.parse().ok()?,
            denominator: d.parse().ok()?,
        },
        None => SRational {
            numerator: word.parse().ok()?,
            denominator: 1,
        },
    })
}

/// Parses a string into field data of the given type.
///
/// Returns `None` when the text isn't valid for the type.
pub(super) fn parse_text(
    ty: PrimitiveTy,
    comment: bool,
    endianness: Endianness,
    text: &str,
) -> Option<FieldData> {
    if comment {
        let bytes = parse_comment(text, endianness)?;
        return Some(FieldData::from_list(
            PrimitiveTy::Undefined,
            bytes.into_iter().map(Primitive::Undefined).collect(),
        ));
    }

    if ty == PrimitiveTy::Ascii {
        let list = text
            .bytes()
            .chain(core::iter::once(0_u8))
            .map(Primitive::Ascii)
            .collect();
        return Some(FieldData::from_list(ty, list));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let list = words
        .into_iter()
        .map(|word| {
            Some(match ty {
                PrimitiveTy::Byte => Primitive::Byte(word.parse().ok()?),
                PrimitiveTy::Undefined => Primitive::Undefined(word.parse().ok()?),
                PrimitiveTy::SByte => Primitive::SByte(word.parse().ok()?),
                PrimitiveTy::Short => Primitive::Short(word.parse().ok()?),
                PrimitiveTy::SShort => Primitive::SShort(word.parse().ok()?),
                PrimitiveTy::Long => Primitive::Long(word.parse().ok()?),
                PrimitiveTy::SLong => Primitive::SLong(word.parse().ok()?),
                PrimitiveTy::Rational => Primitive::Rational(parse_rational(word)?),
                PrimitiveTy::SRational => Primitive::SRational(parse_srational(word)?),
                PrimitiveTy::Float => Primitive::Float(word.parse().ok()?),
                PrimitiveTy::Double => Primitive::Double(word.parse().ok()?),
                PrimitiveTy::Ascii => Primitive::Ascii(word.parse().ok()?),
            })
        })
        .collect::<Option<Vec<Primitive>>>()?;

    Some(FieldData::from_list(ty, list))
}
