/// An enumeration of the possible values of a primitive.
///
/// Used in each IFD descriptor.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveTy {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
}

impl PrimitiveTy {
    /// Grabs the primitive type's size in bytes.
    ///
    /// ```
    /// use imgmeta_types::exif::primitives::PrimitiveTy;
    ///
    /// let slong: PrimitiveTy = PrimitiveTy::SLong;
    /// assert_eq!(slong.size_bytes(), 4_u8);
    /// ```
    pub const fn size_bytes(&self) -> u8 {
        match self {
            PrimitiveTy::Byte | PrimitiveTy::Ascii | PrimitiveTy::SByte | PrimitiveTy::Undefined => {
                1_u8
            }
            PrimitiveTy::Short | PrimitiveTy::SShort => 2_u8,
            PrimitiveTy::Long | PrimitiveTy::SLong | PrimitiveTy::Float => 4_u8,
            PrimitiveTy::Rational | PrimitiveTy::SRational | PrimitiveTy::Double => 8_u8,
        }
    }

    /// The type's name as Exif tools print it.
    pub const fn name(&self) -> &'static str {
        match self {
            PrimitiveTy::Byte => "Byte",
            PrimitiveTy::Ascii => "Ascii",
            PrimitiveTy::Short => "Short",
            PrimitiveTy::Long => "Long",
            PrimitiveTy::Rational => "Rational",
            PrimitiveTy::SByte => "SByte",
            PrimitiveTy::Undefined => "Undefined",
            PrimitiveTy::SShort => "SShort",
            PrimitiveTy::SLong => "SLong",
            PrimitiveTy::SRational => "SRational",
            PrimitiveTy::Float => "Float",
            PrimitiveTy::Double => "Double",
        }
    }
}

impl TryFrom<u16> for PrimitiveTy {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Ascii),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Rational),
            6 => Ok(Self::SByte),
            7 => Ok(Self::Undefined),
            8 => Ok(Self::SShort),
            9 => Ok(Self::SLong),
            10 => Ok(Self::SRational),
            11 => Ok(Self::Float),
            12 => Ok(Self::Double),

            _ => Err(()),
        }
    }
}

/// How many primitives a tag's value is expected to hold.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveCount {
    /// Exactly this many.
    Known(u32),

    /// Any number.
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum Primitive {
    Byte(Byte),
    Ascii(Ascii),
    Short(Short),
    Long(Long),
    Rational(Rational),
    SByte(SByte),
    Undefined(Undefined),
    SShort(SShort),
    SLong(SLong),
    SRational(SRational),
    Float(f32),
    Double(f64),
}

impl Primitive {
    /// Grabs the type describing this primitive.
    pub fn ty(&self) -> PrimitiveTy {
        match self {
            Primitive::Byte(_) => PrimitiveTy::Byte,
            Primitive::Ascii(_) => PrimitiveTy::Ascii,
            Primitive::Short(_) => PrimitiveTy::Short,
            Primitive::Long(_) => PrimitiveTy::Long,
            Primitive::Rational(_) => PrimitiveTy::Rational,
            Primitive::SByte(_) => PrimitiveTy::SByte,
            Primitive::Undefined(_) => PrimitiveTy::Undefined,
            Primitive::SShort(_) => PrimitiveTy::SShort,
            Primitive::SLong(_) => PrimitiveTy::SLong,
            Primitive::SRational(_) => PrimitiveTy::SRational,
            Primitive::Float(_) => PrimitiveTy::Float,
            Primitive::Double(_) => PrimitiveTy::Double,
        }
    }
}

/// A `u8` to represent a byte.
pub type Byte = u8;

/// A single ASCII code.
pub type Ascii = u8;

/// A `u16`.
pub type Short = u16;

/// A `u32`.
pub type Long = u32;

/// A fraction that can't be negative.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

/// A signed byte.
pub type SByte = i8;

/// A byte with no defined meaning.
pub type Undefined = u8;

/// A signed short.
pub type SShort = i16;

/// A signed long - just a `i32`.
pub type SLong = i32;

/// A signed fraction.
///
/// Both the numerator (top number) and denominator (bottom number) can be
/// negative.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}
