//! Serializes an [`Exif`] back into a TIFF structure.
//!
//! Output is deterministic: IFDs are written in [`IfdGroup::ALL`] order,
//! each with its fields sorted by tag ID. Sub-IFD pointers and the
//! thumbnail's offset are regenerated, so any stored values for them are
//! ignored.

use imgmeta_types::exif::{
    Endianness, Field, FieldTag,
    ifd::IfdGroup,
    primitives::{Primitive, PrimitiveTy},
    tags::{ExifIfdTag, Ifd0Tag, KnownTag, SUB_IFD_POINTER_TAGS},
};

use super::Exif;

const IFD0: usize = 0;
const EXIF: usize = 1;
const GPS: usize = 2;
const INTEROP: usize = 3;
const IFD1: usize = 4;

/// A field that's ready to be written.
#[derive(Clone, Debug, PartialEq)]
struct RawEntry {
    tag: u16,
    ty: PrimitiveTy,
    count: u32,
    bytes: Vec<u8>,
}

impl RawEntry {
    fn new(field: &Field, endianness: Endianness) -> Self {
        let mut bytes = Vec::new();
        for primitive in field.data.primitives() {
            push_primitive(&mut bytes, primitive, endianness);
        }

        Self {
            tag: field.tag.tag_id(),
            ty: field.ty(),
            count: field.count(),
            bytes,
        }
    }

    /// A `Long` whose value is filled in once the layout is known.
    fn long(tag: u16, value: u32, endianness: Endianness) -> Self {
        Self {
            tag,
            ty: PrimitiveTy::Long,
            count: 1,
            bytes: u32_bytes(value, endianness).to_vec(),
        }
    }

    /// How many bytes this entry's value takes outside the IFD table.
    fn out_of_line_len(&self) -> u32 {
        if self.bytes.len() > 4 {
            (self.bytes.len() as u32).next_multiple_of(2)
        } else {
            0
        }
    }
}

fn u16_bytes(v: u16, endianness: Endianness) -> [u8; 2] {
    match endianness {
        Endianness::Little => v.to_le_bytes(),
        Endianness::Big => v.to_be_bytes(),
    }
}

fn u32_bytes(v: u32, endianness: Endianness) -> [u8; 4] {
    match endianness {
        Endianness::Little => v.to_le_bytes(),
        Endianness::Big => v.to_be_bytes(),
    }
}

fn push_primitive(out: &mut Vec<u8>, primitive: &Primitive, e: Endianness) {
    match *primitive {
        Primitive::Byte(v) | Primitive::Ascii(v) | Primitive::Undefined(v) => out.push(v),
        Primitive::SByte(v) => out.push(v as u8),
        Primitive::Short(v) => out.extend_from_slice(&u16_bytes(v, e)),
        Primitive::SShort(v) => out.extend_from_slice(&u16_bytes(v as u16, e)),
        Primitive::Long(v) => out.extend_from_slice(&u32_bytes(v, e)),
        Primitive::SLong(v) => out.extend_from_slice(&u32_bytes(v as u32, e)),
        Primitive::Rational(r) => {
            out.extend_from_slice(&u32_bytes(r.numerator, e));
            out.extend_from_slice(&u32_bytes(r.denominator, e));
        }
        Primitive::SRational(r) => {
            out.extend_from_slice(&u32_bytes(r.numerator as u32, e));
            out.extend_from_slice(&u32_bytes(r.denominator as u32, e));
        }
        Primitive::Float(v) => out.extend_from_slice(&u32_bytes(v.to_bits(), e)),
        Primitive::Double(v) => out.extend_from_slice(&match e {
            Endianness::Little => v.to_bits().to_le_bytes(),
            Endianness::Big => v.to_bits().to_be_bytes(),
        }),
    }
}

fn slot(group: IfdGroup) -> usize {
    match group {
        IfdGroup::_0 => IFD0,
        IfdGroup::Exif => EXIF,
        IfdGroup::Gps => GPS,
        IfdGroup::Interop => INTEROP,
        IfdGroup::_1 => IFD1,
    }
}

fn thumbnail_tag(tag: Ifd0Tag) -> FieldTag {
    FieldTag::Known(KnownTag::Ifd0Tag(tag))
}

/// Fields we always rewrite ourselves.
fn is_regenerated(group: IfdGroup, tag: &FieldTag) -> bool {
    SUB_IFD_POINTER_TAGS.contains(tag)
        || (group == IfdGroup::_1
            && (*tag == thumbnail_tag(Ifd0Tag::JPEGInterchangeFormat)
                || *tag == thumbnail_tag(Ifd0Tag::JPEGInterchangeFormatLength)))
}

fn ifd_len(entries: &[RawEntry]) -> u32 {
    2 + 12 * entries.len() as u32 + 4 + entries.iter().map(RawEntry::out_of_line_len).sum::<u32>()
}

fn set_long(entries: &mut [RawEntry], tag: u16, value: u32, endianness: Endianness) {
    if let Some(entry) = entries.iter_mut().find(|e| e.tag == tag) {
        entry.bytes = u32_bytes(value, endianness).to_vec();
    }
}

fn write_ifd(out: &mut Vec<u8>, entries: &[RawEntry], offset: u32, next: u32, e: Endianness) {
    let mut data_offset = offset + 2 + 12 * entries.len() as u32 + 4;
    let mut data: Vec<u8> = Vec::new();

    out.extend_from_slice(&u16_bytes(entries.len() as u16, e));
    for entry in entries {
        out.extend_from_slice(&u16_bytes(entry.tag, e));
        out.extend_from_slice(&u16_bytes(entry.ty as u16, e));
        out.extend_from_slice(&u32_bytes(entry.count, e));

        if entry.bytes.len() > 4 {
            out.extend_from_slice(&u32_bytes(data_offset, e));
            data.extend_from_slice(&entry.bytes);
            if entry.bytes.len() % 2 == 1 {
                data.push(0);
            }
            data_offset += entry.out_of_line_len();
        } else {
            let mut inline = [0_u8; 4];
            inline[..entry.bytes.len()].copy_from_slice(&entry.bytes);
            out.extend_from_slice(&inline);
        }
    }
    out.extend_from_slice(&u32_bytes(next, e));
    out.extend_from_slice(&data);
}

impl Exif {
    /// Serializes this Exif into a TIFF blob.
    ///
    /// Returns `None` when there's nothing left to write, meaning the Exif
    /// block should be removed from the image.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        let e = self.endianness;

        let mut groups: [Vec<RawEntry>; 5] = Default::default();
        for entry in &self.entries {
            if is_regenerated(entry.group, &entry.field.tag) {
                continue;
            }
            groups[slot(entry.group)].push(RawEntry::new(&entry.field, e));
        }

        let has_interop = !groups[INTEROP].is_empty();
        let has_exif = !groups[EXIF].is_empty() || has_interop;
        let has_gps = !groups[GPS].is_empty();
        let mut has_ifd1 = !groups[IFD1].is_empty() || self.thumbnail.is_some();

        if groups[IFD0].is_empty() && !has_exif && !has_gps {
            if has_ifd1 {
                log::warn!("IFD 0 is empty, so the thumbnail IFD can't be written either.");
            }
            log::debug!("No Exif left to write.");
            return None;
        }

        if has_exif {
            groups[IFD0].push(RawEntry::long(Ifd0Tag::ExifTag.tag_id(), 0, e));
        }
        if has_gps {
            groups[IFD0].push(RawEntry::long(Ifd0Tag::GPSTag.tag_id(), 0, e));
        }
        if has_interop {
            groups[EXIF].push(RawEntry::long(ExifIfdTag::InteroperabilityTag.tag_id(), 0, e));
        }
        if let Some(ref thumbnail) = self.thumbnail {
            groups[IFD1].push(RawEntry::long(Ifd0Tag::JPEGInterchangeFormat.tag_id(), 0, e));
            groups[IFD1].push(RawEntry::long(
                Ifd0Tag::JPEGInterchangeFormatLength.tag_id(),
                thumbnail.len() as u32,
                e,
            ));
        }
        has_ifd1 = has_ifd1 && !groups[IFD1].is_empty();

        for entries in groups.iter_mut() {
            entries.sort_by_key(|entry| entry.tag);
        }

        // lay out each IFD, then the thumbnail
        let present = [true, has_exif, has_gps, has_interop, has_ifd1];
        let mut offsets = [0_u32; 5];
        let mut cursor = 8_u32;
        for (i, entries) in groups.iter().enumerate() {
            if present[i] {
                offsets[i] = cursor;
                cursor += ifd_len(entries);
            }
        }
        let thumbnail_offset = cursor;

        set_long(&mut groups[IFD0], Ifd0Tag::ExifTag.tag_id(), offsets[EXIF], e);
        set_long(&mut groups[IFD0], Ifd0Tag::GPSTag.tag_id(), offsets[GPS], e);
        set_long(
            &mut groups[EXIF],
            ExifIfdTag::InteroperabilityTag.tag_id(),
            offsets[INTEROP],
            e,
        );
        set_long(
            &mut groups[IFD1],
            Ifd0Tag::JPEGInterchangeFormat.tag_id(),
            thumbnail_offset,
            e,
        );

        let mut out: Vec<u8> = Vec::with_capacity(cursor as usize);
        out.extend_from_slice(match e {
            Endianness::Little => b"II",
            Endianness::Big => b"MM",
        });
        out.extend_from_slice(&u16_bytes(42, e));
        out.extend_from_slice(&u32_bytes(8, e));

        for (i, entries) in groups.iter().enumerate() {
            if !present[i] {
                continue;
            }
            let next = if i == IFD0 && has_ifd1 { offsets[IFD1] } else { 0 };
            write_ifd(&mut out, entries, offsets[i], next, e);
        }

        if has_ifd1 {
            if let Some(ref thumbnail) = self.thumbnail {
                out.extend_from_slice(thumbnail);
            }
        }

        log::trace!("Wrote `{}` bytes of Exif.", out.len());
        Some(out)
    }
}
