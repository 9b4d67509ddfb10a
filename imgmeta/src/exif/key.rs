use imgmeta_types::exif::{FieldTag, ifd::IfdGroup, primitives::PrimitiveTy, tags::KnownTag};

use super::ExifEntry;
use crate::error::CodecError;

/// A parsed `Exif.<Group>.<Tag>` key.
///
/// The tag is either a dictionary name, like `Exif.Photo.FNumber`, or a raw
/// hex ID, like `Exif.Image.0xc4a5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExifKey {
    pub group: IfdGroup,
    pub tag: FieldTag,
}

impl ExifKey {
    pub const FAMILY: &'static str = "Exif";

    /// Parses a key, rejecting anything that isn't exactly three
    /// dot-separated parts with a known group.
    pub fn parse(key: &str) -> Result<Self, CodecError> {
        let invalid = || {
            log::debug!("Rejecting Exif key `{key}`.");
            CodecError::invalid_key(key)
        };

        let mut parts = key.split('.');
        let (Some(family), Some(group), Some(name), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if family != Self::FAMILY {
            return Err(invalid());
        }

        let group = IfdGroup::from_key_name(group).ok_or_else(invalid)?;

        let tag = match KnownTag::from_name(group, name) {
            Some(known) => FieldTag::Known(known),
            None => parse_hex_tag(name)
                .map(|id| FieldTag::new(group, id))
                .ok_or_else(invalid)?,
        };

        Ok(Self { group, tag })
    }

    /// Whether the entry has this key's group and tag ID.
    pub fn matches(&self, entry: &ExifEntry) -> bool {
        entry.group == self.group && entry.field.tag.tag_id() == self.tag.tag_id()
    }

    /// The type new values for this key are written with.
    ///
    /// Unknown tags are written as ASCII.
    pub fn default_ty(&self) -> PrimitiveTy {
        match self.tag {
            FieldTag::Known(known) => known.default_ty(),
            FieldTag::Unknown(_) => PrimitiveTy::Ascii,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.tag, FieldTag::Known(known) if known.is_comment())
    }
}

impl core::fmt::Display for ExifKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", Self::FAMILY, self.group.key_name(), self.tag)
    }
}

fn parse_hex_tag(name: &str) -> Option<u16> {
    let digits = name.strip_prefix("0x")?;
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}
