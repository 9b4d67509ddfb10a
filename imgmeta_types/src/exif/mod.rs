//! Exif types: primitives, IFD groups, and the tag dictionary.

use crate::exif::{
    ifd::IfdGroup,
    primitives::{Primitive, PrimitiveTy},
    tags::KnownTag,
};

pub mod ifd;
pub mod primitives;
pub mod tags;

/// One entry found within an IFD.
///
/// These provide both a field and its value(s).
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct Field {
    /// A number to identify the field we're talking about.
    pub tag: FieldTag,

    /// Data stored with this tag.
    ///
    /// The data also specifies the type of primitive used, and how many we're
    /// storing.
    pub data: FieldData,
}

impl Field {
    /// How many primitives are present in the field.
    pub fn count(&self) -> u32 {
        match self.data {
            FieldData::None(_) => 0_u32,
            FieldData::Primitive(_) => 1_u32,
            FieldData::List { ref list, .. } => list.len() as u32,
        }
    }

    /// Describes which primitive is stored inside.
    pub fn ty(&self) -> PrimitiveTy {
        self.data.ty()
    }
}

/// Data associated with a field.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum FieldData {
    /// There's no primitive stored here.
    None(PrimitiveTy),

    /// Stores one primitive.
    Primitive(Primitive),

    /// Stores a number of primitives.
    List {
        /// The actual list of primitives.
        list: Vec<Primitive>,

        /// The type of primitive we're storing.
        ty: PrimitiveTy,
    },
}

impl FieldData {
    /// Describes which primitive is stored inside.
    pub fn ty(&self) -> PrimitiveTy {
        match self {
            FieldData::None(primitive_ty) => *primitive_ty,
            FieldData::Primitive(primitive) => primitive.ty(),
            FieldData::List { ty, .. } => *ty,
        }
    }

    /// Builds field data from a list, collapsing short lists.
    pub fn from_list(ty: PrimitiveTy, mut list: Vec<Primitive>) -> Self {
        match list.len() {
            0 => FieldData::None(ty),
            1 => match list.pop() {
                Some(p) => FieldData::Primitive(p),
                None => FieldData::None(ty),
            },
            _ => FieldData::List { list, ty },
        }
    }

    /// Borrows every primitive stored here, in order.
    pub fn primitives(&self) -> &[Primitive] {
        match self {
            FieldData::None(_) => &[],
            FieldData::Primitive(p) => core::slice::from_ref(p),
            FieldData::List { list, .. } => list,
        }
    }
}

/// Each blob of Exif will start with a byte order marker - its endianness.
///
/// It's either `II` (Intel, for little-endian) or `MM` (Motorola, for
/// big-endian).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Endianness {
    /// `II` for Intel, little-endian.
    Little,

    /// `MM` for Motorola. Big-endian.
    Big,
}

/// A tag might be known by the dictionary, but others may not be.
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum FieldTag {
    Known(KnownTag),
    Unknown(u16),
}

impl FieldTag {
    /// Resolves a raw tag ID within the given group.
    pub fn new(group: IfdGroup, tag_id: u16) -> Self {
        KnownTag::try_from((group, tag_id))
            .map(FieldTag::Known)
            .unwrap_or(FieldTag::Unknown(tag_id))
    }

    /// The raw tag ID.
    pub fn tag_id(&self) -> u16 {
        match self {
            FieldTag::Known(known) => known.tag_id(),
            FieldTag::Unknown(raw) => *raw,
        }
    }
}

impl core::fmt::Display for FieldTag {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            FieldTag::Known(known) => f.write_str(known.tag_name()),
            FieldTag::Unknown(raw_tag) => write!(f, "0x{raw_tag:04x}"),
        }
    }
}
