//! Exif is a media metadata format primarily used by cameras.
//!
//! Unlike XMP, it's a structured binary format, so, while it's not as
//! "extensible," Exif does allow for proprietary extensions that are just
//! blobs of bytes.
//!
//! However, it's somewhat self-describing! Each field on an IFD
//! (Image File Directory) contains a tag ID, primitive data type, and count
//! saying how many primitives are stored. That means we can carry unknown
//! fields through a rewrite without knowing how they're structured.
//!
//! The parsed blob is flattened into an ordered list of [`ExifEntry`]s, each
//! keyed as `Exif.<Group>.<Tag>`. Writing it back out produces a fresh TIFF
//! structure in the same byte order.

pub use imgmeta_types::exif::{
    Endianness, Field, FieldData, FieldTag, ifd::IfdGroup, primitives::*, tags::KnownTag,
};

use std::collections::{BTreeSet, VecDeque};

use winnow::{
    Parser as _, Stateful,
    binary::{Endianness as WinnowEndianness, u16, u32},
    error::EmptyError,
    token::take,
};

use self::{
    error::{ExifFatalError, ExifFatalResult},
    ifd::{Ifd, parse_ifd},
};
use crate::error::CodecError;
use imgmeta_types::exif::tags::{ExifIfdTag, Ifd0Tag};

pub mod error;
mod ifd;
mod key;
mod text;
mod value;
mod write;

pub use key::ExifKey;
pub use text::ExifValue;

/// One field, along with the IFD it was found in.
#[derive(Clone, Debug, PartialEq)]
pub struct ExifEntry {
    pub group: IfdGroup,
    pub field: Field,
}

impl ExifEntry {
    /// The entry's key, like `Exif.Photo.UserComment`.
    pub fn key(&self) -> ExifKey {
        ExifKey {
            group: self.group,
            tag: self.field.tag,
        }
    }
}

/// Extracted information from an Exif metadata block.
#[derive(Clone, Debug, PartialEq)]
pub struct Exif {
    /// The endianness of the Exif block.
    pub endianness: Endianness,

    /// Every field found, in IFD order.
    pub entries: Vec<ExifEntry>,

    /// The JPEG thumbnail referenced by IFD 1, if any.
    pub thumbnail: Option<Vec<u8>>,
}

impl Default for Exif {
    fn default() -> Self {
        Self {
            endianness: Endianness::Little,
            entries: Vec::new(),
            thumbnail: None,
        }
    }
}

impl Exif {
    /// Parses the given Exif blob into our `Exif` structure.
    ///
    /// The blob starts at the TIFF header; any `Exif\0\0` prefix must
    /// already be removed.
    pub fn new(input: &mut &[u8]) -> ExifFatalResult<Self> {
        let blob: &[u8] = *input; // the original input, for absolute offsets

        let endianness: Endianness = parse_blob_endianness(input)?;
        let winnow_endianness = winnow_endianness(endianness);

        let stateful_input = &mut Stream {
            input: *input,
            state: State {
                endianness: winnow_endianness,
                blob,
                current_ifd: IfdGroup::_0,
            },
        };

        parse_tiff_magic_number(stateful_input)?;
        let ifd0_offset: u32 = parse_tiff_header_offset(stateful_input)?;

        let mut exif = Self {
            endianness,
            ..Default::default()
        };

        if ifd0_offset as usize >= blob.len() {
            log::trace!("There's no more input. Assuming there are zero IFDs.");
            return Ok(exif);
        }

        let mut queue: VecDeque<(IfdGroup, u32)> = VecDeque::from([(IfdGroup::_0, ifd0_offset)]);
        let mut visited: BTreeSet<u32> = BTreeSet::new();

        while let Some((group, offset)) = queue.pop_front() {
            if !visited.insert(offset) {
                log::warn!("IFD at `{offset}` was already parsed. Skipping the loop.");
                continue;
            }

            let (ifd, next) = match parse_ifd_at(blob, winnow_endianness, group, offset) {
                Ok(parsed) => parsed,
                Err(e) if group == IfdGroup::_0 => {
                    log::error!("Failed to parse Exif! The first IFD failed to parse! err: {e}");
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("Skipping IFD `{}` - it failed to parse. err: {e}", group.key_name());
                    continue;
                }
            };

            let fields: Vec<Field> = ifd
                .fields
                .into_iter()
                .filter_map(|f| {
                    f.inspect_err(|e| log::warn!("Skipping a field in `{}`. err: {e}", group.key_name()))
                        .ok()
                })
                .collect();

            for field in &fields {
                if let Some(sub_ifd) = sub_ifd_of(group, field) {
                    log::trace!("Found sub-IFD pointer: {sub_ifd:?}");
                    queue.push_back(sub_ifd);
                }
            }

            match group {
                IfdGroup::_0 => {
                    if let Some(next) = next {
                        queue.push_back((IfdGroup::_1, next));
                    }
                }
                IfdGroup::_1 => exif.thumbnail = thumbnail_of(blob, &fields),
                _ => (),
            }

            exif.entries
                .extend(fields.into_iter().map(|field| ExifEntry { group, field }));
        }

        log::trace!("Parsed `{}` Exif entries.", exif.entries.len());
        Ok(exif)
    }

    /// How many entries are stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grabs the key and value of the entry at `index`.
    pub fn entry(&self, index: usize) -> Option<(ExifKey, ExifValue)> {
        self.entries
            .get(index)
            .map(|entry| (entry.key(), self.value_of(entry)))
    }

    /// Finds the first entry matching the key.
    pub fn find(&self, key: &ExifKey) -> Option<(ExifKey, ExifValue)> {
        self.entries
            .iter()
            .find(|entry| key.matches(entry))
            .map(|entry| (entry.key(), self.value_of(entry)))
    }

    fn value_of(&self, entry: &ExifEntry) -> ExifValue {
        ExifValue::new(entry.field.data.clone(), entry.key().is_comment(), self.endianness)
    }

    /// Sets a tag from its string form, typed by the existing entry or the
    /// tag dictionary.
    pub fn set_string(&mut self, key: &str, value: &str) -> Result<(), CodecError> {
        let parsed_key = ExifKey::parse(key)?;

        let ty = self
            .entries
            .iter()
            .find(|entry| parsed_key.matches(entry))
            .map(|entry| entry.field.ty())
            .unwrap_or_else(|| parsed_key.default_ty());

        let data = text::parse_text(ty, parsed_key.is_comment(), self.endianness, value)
            .ok_or_else(|| {
                log::error!("Couldn't parse `{value}` as `{ty:?}` for `{key}`.");
                CodecError::invalid_value(key, value)
            })?;

        self.upsert(parsed_key, data);
        Ok(())
    }

    /// Sets a tag to a single `Short`.
    pub fn set_short(&mut self, key: &str, value: &str) -> Result<(), CodecError> {
        let parsed_key = ExifKey::parse(key)?;
        let short: u16 = value.trim().parse().map_err(|_| {
            log::error!("`{value}` isn't a valid short for `{key}`.");
            CodecError::invalid_value(key, value)
        })?;

        self.upsert(parsed_key, FieldData::Primitive(Primitive::Short(short)));
        Ok(())
    }

    /// Removes every entry matching the key.
    ///
    /// Removing a well-formed key that isn't present does nothing.
    pub fn strip_key(&mut self, key: &str) -> Result<(), CodecError> {
        let parsed_key = ExifKey::parse(key)?;
        self.entries.retain(|entry| !parsed_key.matches(entry));
        Ok(())
    }

    fn upsert(&mut self, key: ExifKey, data: FieldData) {
        match self.entries.iter_mut().find(|entry| key.matches(entry)) {
            Some(entry) => entry.field.data = data,
            None => self.entries.push(ExifEntry {
                group: key.group,
                field: Field { tag: key.tag, data },
            }),
        }
    }
}

/*
*
  all parsers from here on out generally require knowing the endianness. so,
  it's stored inside a custom state struct + a stream wrapper.
*
*/

#[derive(Clone, Debug)]
struct State<'a> {
    current_ifd: IfdGroup,
    endianness: WinnowEndianness,
    blob: &'a [u8],
}

/// A stream of the blob wrapped with our endianness.
type Stream<'s> = Stateful<&'s [u8], State<'s>>;

/// A pointer in the blob specifying the next IFD, if any.
type NextIfdPointer = Option<u32>;

fn winnow_endianness(endianness: Endianness) -> WinnowEndianness {
    match endianness {
        Endianness::Little => WinnowEndianness::Little,
        Endianness::Big => WinnowEndianness::Big,
    }
}

/// Finds the endianness of the Exif blob.
fn parse_blob_endianness(input: &mut &[u8]) -> ExifFatalResult<Endianness> {
    let input_len = input.len();

    let two_ascii_bytes: &[u8] = take(2_usize)
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find endianness marker!");
            ExifFatalError::NoByteOrderMarker {
                len: input_len as u8,
            }
        })?;

    match two_ascii_bytes {
        b"II" => Ok(Endianness::Little),
        b"MM" => Ok(Endianness::Big),
        found => {
            let e = ExifFatalError::WeirdByteOrderMarker {
                found: [found[0], found[1]],
            };
            log::error!("Couldn't parse out Exif! err: {e}");
            Err(e)
        }
    }
}

/// Ensures we're working with the correct kind of file.
fn parse_tiff_magic_number(input: &mut Stream) -> ExifFatalResult<()> {
    let endianness = input.state.endianness;

    let magic_number: u16 = u16(endianness)
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find TIFF magic number!");
            ExifFatalError::NoTiffMagicNumber
        })?;

    if magic_number != 42 {
        log::error!("Magic number wasn't for TIFF. got: `{magic_number}`");
        return Err(ExifFatalError::MagicNumberWasntTiff {
            found: magic_number,
        });
    }

    Ok(())
}

/// Grabs the absolute offset of IFD 0.
///
/// It can't point back inside the eight-byte header.
fn parse_tiff_header_offset(input: &mut Stream) -> ExifFatalResult<u32> {
    let endianness = input.state.endianness;

    let offset = u32(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| {
            log::error!("Didn't find a TIFF header offset!");
            ExifFatalError::NoTiffHeaderOffset
        })?;

    if offset < 8 {
        log::error!("Exif blob placed offset inside the header! offset: `{offset}`");
        return Err(ExifFatalError::HeaderOffsetBeforeHeader);
    }

    Ok(offset)
}

fn parse_ifd_at(
    blob: &[u8],
    endianness: WinnowEndianness,
    group: IfdGroup,
    offset: u32,
) -> ExifFatalResult<(Ifd, NextIfdPointer)> {
    let input = blob
        .get(offset as usize..)
        .ok_or(ExifFatalError::IfdOffsetOutOfBounds { offset })?;

    parse_ifd(&mut Stream {
        input,
        state: State {
            current_ifd: group,
            endianness,
            blob,
        },
    })
}

/// Reads a pointer-like value out of a field.
fn field_as_u32(field: &Field) -> Option<u32> {
    match field.data {
        FieldData::Primitive(Primitive::Long(v)) => Some(v),
        FieldData::Primitive(Primitive::Short(v)) => Some(v as u32),
        _ => None,
    }
}

/// If the field points at a sub-IFD, returns that IFD's group and offset.
fn sub_ifd_of(group: IfdGroup, field: &Field) -> Option<(IfdGroup, u32)> {
    let FieldTag::Known(tag) = field.tag else {
        return None;
    };

    let sub_group = match (group, tag) {
        (IfdGroup::_0, KnownTag::Ifd0Tag(Ifd0Tag::ExifTag)) => IfdGroup::Exif,
        (IfdGroup::_0, KnownTag::Ifd0Tag(Ifd0Tag::GPSTag)) => IfdGroup::Gps,
        (IfdGroup::Exif, KnownTag::ExifIfdTag(ExifIfdTag::InteroperabilityTag)) => {
            IfdGroup::Interop
        }
        _ => return None,
    };

    field_as_u32(field).map(|offset| (sub_group, offset))
}

/// Copies out the thumbnail described by IFD 1's fields.
fn thumbnail_of(blob: &[u8], fields: &[Field]) -> Option<Vec<u8>> {
    let find = |wanted: Ifd0Tag| {
        fields
            .iter()
            .find(|f| f.tag == FieldTag::Known(KnownTag::Ifd0Tag(wanted)))
            .and_then(field_as_u32)
    };

    let offset = find(Ifd0Tag::JPEGInterchangeFormat)? as usize;
    let len = find(Ifd0Tag::JPEGInterchangeFormatLength)? as usize;

    blob.get(offset..offset.saturating_add(len))
        .map(<[u8]>::to_vec)
        .or_else(|| {
            log::warn!("Thumbnail lies outside the Exif blob. offset: `{offset}`, len: `{len}`");
            None
        })
}
