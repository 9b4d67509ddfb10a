//! Definitions for tags in an IFD group.
//!
//! Contains the tags stored in each [`IfdGroup`], with the names used in
//! `Exif.<Group>.<Tag>` keys, the primitive type(s) a value may have, and
//! how many primitives it holds.
//!
//! ## Adding new tags
//!
//! Under the `make_key_list_for_group` macro for the group, add a new
//! listing. The identifier doubles as the tag's key name, and the first type
//! listed is the one new values are written with:
//!
//! ```no_compile
//! make_key_list_for_group!(enum NotRealTag => IfdGroup::NotReal,
//!     YourNewKey = 0x03e8 => {
//!         types: &[Pt::Ascii],
//!         count: Pc::Any,
//!     },
//! );
//! ```

use crate::exif::{
    FieldTag,
    ifd::IfdGroup,
    primitives::{PrimitiveCount, PrimitiveTy},
};

/// Creates a "key list" for an IFD group.
///
/// These may include duplicate tag IDs from other groups.
macro_rules! make_key_list_for_group {
    (enum $enum_name:ident => $ifd_group:expr,
        $( $key_ident:ident = $key_tag:literal => {
            types: $types:expr,
            count: $count:expr,
        },
    )+) => {
        #[doc = "A list of all keys present in the matching `IfdGroup` variant."]
        #[repr(u16)]
        #[non_exhaustive]
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub enum $enum_name {
            $(
              $key_ident = $key_tag,
            )+
        }

        impl $enum_name {
            /// Every key in this list.
            pub const ALL: &'static [Self] = &[ $( Self::$key_ident, )+ ];

            /// Returns the number of primitives this key's value may store.
            pub const fn count(&self) -> PrimitiveCount {
                match self {
                    $( Self::$key_ident => $count, )+
                }
            }

            /// Returns the `IfdGroup` that this enum represents.
            pub const fn ifd_group() -> IfdGroup {
                $ifd_group
            }

            /// Returns this key's tag ID.
            pub const fn tag_id(&self) -> u16 {
                *self as u16
            }

            /// Grabs the key's tag name, as used in `Exif.*` keys.
            pub const fn tag_name(&self) -> &'static str {
                match self {
                    $( Self::$key_ident => stringify!($key_ident), )+
                }
            }

            /// Returns the type(s) this key's value may have.
            pub const fn types(&self) -> &'static [PrimitiveTy] {
                match self {
                    $( Self::$key_ident => $types, )+
                }
            }

            /// Finds a key by its tag name.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|k| k.tag_name() == name)
            }
        }

        impl TryFrom<u16> for $enum_name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $key_tag => Ok(Self::$key_ident), )+
                    _ => Err(()),
                }
            }
        }
    };
}

/// A known tag from any group.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum KnownTag {
    Ifd0Tag(Ifd0Tag),
    ExifIfdTag(ExifIfdTag),
    GpsIfdTag(GpsIfdTag),
    InteropIfdTag(InteropIfdTag),
}

impl KnownTag {
    /// Returns this tag's ID.
    pub const fn tag_id(&self) -> u16 {
        match self {
            KnownTag::Ifd0Tag(t) => t.tag_id(),
            KnownTag::ExifIfdTag(t) => t.tag_id(),
            KnownTag::GpsIfdTag(t) => t.tag_id(),
            KnownTag::InteropIfdTag(t) => t.tag_id(),
        }
    }

    /// Returns this tag's key name.
    pub const fn tag_name(&self) -> &'static str {
        match self {
            KnownTag::Ifd0Tag(t) => t.tag_name(),
            KnownTag::ExifIfdTag(t) => t.tag_name(),
            KnownTag::GpsIfdTag(t) => t.tag_name(),
            KnownTag::InteropIfdTag(t) => t.tag_name(),
        }
    }

    /// Returns the type(s) this tag's value may have.
    pub const fn types(&self) -> &'static [PrimitiveTy] {
        match self {
            KnownTag::Ifd0Tag(t) => t.types(),
            KnownTag::ExifIfdTag(t) => t.types(),
            KnownTag::GpsIfdTag(t) => t.types(),
            KnownTag::InteropIfdTag(t) => t.types(),
        }
    }

    /// Returns how many primitives this tag's value may store.
    pub const fn count(&self) -> PrimitiveCount {
        match self {
            KnownTag::Ifd0Tag(t) => t.count(),
            KnownTag::ExifIfdTag(t) => t.count(),
            KnownTag::GpsIfdTag(t) => t.count(),
            KnownTag::InteropIfdTag(t) => t.count(),
        }
    }

    /// The type new values of this tag are written with.
    pub const fn default_ty(&self) -> PrimitiveTy {
        match self.types() {
            [first, ..] => *first,
            [] => PrimitiveTy::Undefined,
        }
    }

    /// Whether the value starts with an 8-byte character code, like
    /// `UserComment` does.
    pub const fn is_comment(&self) -> bool {
        matches!(
            self,
            KnownTag::ExifIfdTag(ExifIfdTag::UserComment)
                | KnownTag::GpsIfdTag(GpsIfdTag::GPSProcessingMethod)
                | KnownTag::GpsIfdTag(GpsIfdTag::GPSAreaInformation)
        )
    }

    /// Finds a tag by group and name.
    ///
    /// IFD 1 shares its table with IFD 0.
    ///
    /// ```
    /// use imgmeta_types::exif::{ifd::IfdGroup, tags::KnownTag};
    ///
    /// let tag = KnownTag::from_name(IfdGroup::Exif, "FNumber").unwrap();
    /// assert_eq!(tag.tag_id(), 0x829d);
    /// ```
    pub fn from_name(group: IfdGroup, name: &str) -> Option<Self> {
        match group {
            IfdGroup::_0 | IfdGroup::_1 => Ifd0Tag::from_name(name).map(KnownTag::Ifd0Tag),
            IfdGroup::Exif => ExifIfdTag::from_name(name).map(KnownTag::ExifIfdTag),
            IfdGroup::Gps => GpsIfdTag::from_name(name).map(KnownTag::GpsIfdTag),
            IfdGroup::Interop => InteropIfdTag::from_name(name).map(KnownTag::InteropIfdTag),
        }
    }
}

impl TryFrom<(IfdGroup, u16)> for KnownTag {
    type Error = ();

    fn try_from(value: (IfdGroup, u16)) -> Result<Self, Self::Error> {
        let (ifd_group, tag_id): (IfdGroup, u16) = value;

        match ifd_group {
            IfdGroup::_0 | IfdGroup::_1 => Ifd0Tag::try_from(tag_id).map(KnownTag::Ifd0Tag),
            IfdGroup::Exif => ExifIfdTag::try_from(tag_id).map(KnownTag::ExifIfdTag),
            IfdGroup::Gps => GpsIfdTag::try_from(tag_id).map(KnownTag::GpsIfdTag),
            IfdGroup::Interop => InteropIfdTag::try_from(tag_id).map(KnownTag::InteropIfdTag),
        }
    }
}

/// A list of all the "pointer tags" used to indicate other IFDs.
pub const SUB_IFD_POINTER_TAGS: &[FieldTag] = &[
    FieldTag::Known(KnownTag::Ifd0Tag(Ifd0Tag::ExifTag)),
    FieldTag::Known(KnownTag::Ifd0Tag(Ifd0Tag::GPSTag)),
    FieldTag::Known(KnownTag::ExifIfdTag(ExifIfdTag::InteroperabilityTag)),
];

use crate::exif::primitives::{PrimitiveCount as Pc, PrimitiveTy as Pt};

make_key_list_for_group!(enum Ifd0Tag => IfdGroup::_0,
    // image data structure
    ImageWidth = 0x0100 => {
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    ImageLength = 0x0101 => {
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    BitsPerSample = 0x0102 => {
        types: &[Pt::Short],
        count: Pc::Known(3),
    },
    Compression = 0x0103 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    PhotometricInterpretation = 0x0106 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    DocumentName = 0x010d => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    ImageDescription = 0x010e => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    Make = 0x010f => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    Model = 0x0110 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    StripOffsets = 0x0111 => {
        types: &[Pt::Long, Pt::Short],
        count: Pc::Any,
    },
    Orientation = 0x0112 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SamplesPerPixel = 0x0115 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    RowsPerStrip = 0x0116 => {
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    StripByteCounts = 0x0117 => {
        types: &[Pt::Long, Pt::Short],
        count: Pc::Any,
    },
    XResolution = 0x011a => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    YResolution = 0x011b => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    PlanarConfiguration = 0x011c => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    PageName = 0x011d => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    ResolutionUnit = 0x0128 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    TransferFunction = 0x012d => {
        types: &[Pt::Short],
        count: Pc::Any,
    },
    Software = 0x0131 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    DateTime = 0x0132 => {
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    Artist = 0x013b => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    HostComputer = 0x013c => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    WhitePoint = 0x013e => {
        types: &[Pt::Rational],
        count: Pc::Known(2),
    },
    PrimaryChromaticities = 0x013f => {
        types: &[Pt::Rational],
        count: Pc::Known(6),
    },

    // thumbnail location
    JPEGInterchangeFormat = 0x0201 => {
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    JPEGInterchangeFormatLength = 0x0202 => {
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    YCbCrCoefficients = 0x0211 => {
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    YCbCrSubSampling = 0x0212 => {
        types: &[Pt::Short],
        count: Pc::Known(2),
    },
    YCbCrPositioning = 0x0213 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ReferenceBlackWhite = 0x0214 => {
        types: &[Pt::Rational],
        count: Pc::Known(6),
    },
    Rating = 0x4746 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    RatingPercent = 0x4749 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Copyright = 0x8298 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },

    // sub-IFD pointers
    ExifTag = 0x8769 => {
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    InterColorProfile = 0x8773 => {
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    GPSTag = 0x8825 => {
        types: &[Pt::Long],
        count: Pc::Known(1),
    },

    // Windows Explorer fields, stored as UCS-2 bytes
    XPTitle = 0x9c9b => {
        types: &[Pt::Byte],
        count: Pc::Any,
    },
    XPComment = 0x9c9c => {
        types: &[Pt::Byte],
        count: Pc::Any,
    },
    XPAuthor = 0x9c9d => {
        types: &[Pt::Byte],
        count: Pc::Any,
    },
    XPKeywords = 0x9c9e => {
        types: &[Pt::Byte],
        count: Pc::Any,
    },
    XPSubject = 0x9c9f => {
        types: &[Pt::Byte],
        count: Pc::Any,
    },
);

make_key_list_for_group!(enum ExifIfdTag => IfdGroup::Exif,
    ExposureTime = 0x829a => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FNumber = 0x829d => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ExposureProgram = 0x8822 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SpectralSensitivity = 0x8824 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    ISOSpeedRatings = 0x8827 => {
        types: &[Pt::Short],
        count: Pc::Any,
    },
    OECF = 0x8828 => {
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    SensitivityType = 0x8830 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ExifVersion = 0x9000 => {
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    DateTimeOriginal = 0x9003 => {
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    DateTimeDigitized = 0x9004 => {
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    OffsetTime = 0x9010 => {
        types: &[Pt::Ascii],
        count: Pc::Known(7),
    },
    OffsetTimeOriginal = 0x9011 => {
        types: &[Pt::Ascii],
        count: Pc::Known(7),
    },
    OffsetTimeDigitized = 0x9012 => {
        types: &[Pt::Ascii],
        count: Pc::Known(7),
    },
    ComponentsConfiguration = 0x9101 => {
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    CompressedBitsPerPixel = 0x9102 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ShutterSpeedValue = 0x9201 => {
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    ApertureValue = 0x9202 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    BrightnessValue = 0x9203 => {
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    ExposureBiasValue = 0x9204 => {
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    MaxApertureValue = 0x9205 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    SubjectDistance = 0x9206 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    MeteringMode = 0x9207 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    LightSource = 0x9208 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Flash = 0x9209 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    FocalLength = 0x920a => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    SubjectArea = 0x9214 => {
        types: &[Pt::Short],
        count: Pc::Any,
    },
    MakerNote = 0x927c => {
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    UserComment = 0x9286 => {
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    SubSecTime = 0x9290 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    SubSecTimeOriginal = 0x9291 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    SubSecTimeDigitized = 0x9292 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    Temperature = 0x9400 => {
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    Humidity = 0x9401 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FlashpixVersion = 0xa000 => {
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    ColorSpace = 0xa001 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    PixelXDimension = 0xa002 => {
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    PixelYDimension = 0xa003 => {
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    RelatedSoundFile = 0xa004 => {
        types: &[Pt::Ascii],
        count: Pc::Known(13),
    },
    InteroperabilityTag = 0xa005 => {
        types: &[Pt::Long],
        count: Pc::Known(1),
    },
    FocalPlaneXResolution = 0xa20e => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FocalPlaneYResolution = 0xa20f => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FocalPlaneResolutionUnit = 0xa210 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SensingMethod = 0xa217 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    FileSource = 0xa300 => {
        types: &[Pt::Undefined],
        count: Pc::Known(1),
    },
    SceneType = 0xa301 => {
        types: &[Pt::Undefined],
        count: Pc::Known(1),
    },
    CFAPattern = 0xa302 => {
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    CustomRendered = 0xa401 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ExposureMode = 0xa402 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    WhiteBalance = 0xa403 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    DigitalZoomRatio = 0xa404 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FocalLengthIn35mmFilm = 0xa405 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SceneCaptureType = 0xa406 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    GainControl = 0xa407 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Contrast = 0xa408 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Saturation = 0xa409 => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Sharpness = 0xa40a => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    SubjectDistanceRange = 0xa40c => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    ImageUniqueID = 0xa420 => {
        types: &[Pt::Ascii],
        count: Pc::Known(33),
    },
    CameraOwnerName = 0xa430 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    BodySerialNumber = 0xa431 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    LensSpecification = 0xa432 => {
        types: &[Pt::Rational],
        count: Pc::Known(4),
    },
    LensMake = 0xa433 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    LensModel = 0xa434 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    LensSerialNumber = 0xa435 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    Gamma = 0xa500 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
);

make_key_list_for_group!(enum GpsIfdTag => IfdGroup::Gps,
    GPSVersionID = 0x0000 => {
        types: &[Pt::Byte],
        count: Pc::Known(4),
    },
    GPSLatitudeRef = 0x0001 => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSLatitude = 0x0002 => {
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSLongitudeRef = 0x0003 => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSLongitude = 0x0004 => {
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSAltitudeRef = 0x0005 => {
        types: &[Pt::Byte],
        count: Pc::Known(1),
    },
    GPSAltitude = 0x0006 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSTimeStamp = 0x0007 => {
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSSatellites = 0x0008 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    GPSStatus = 0x0009 => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSMeasureMode = 0x000a => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDOP = 0x000b => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSSpeedRef = 0x000c => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSSpeed = 0x000d => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSTrackRef = 0x000e => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSTrack = 0x000f => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSImgDirectionRef = 0x0010 => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSImgDirection = 0x0011 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSMapDatum = 0x0012 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    GPSDestLatitudeRef = 0x0013 => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDestLatitude = 0x0014 => {
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSDestLongitudeRef = 0x0015 => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDestLongitude = 0x0016 => {
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSDestBearingRef = 0x0017 => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDestBearing = 0x0018 => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSDestDistanceRef = 0x0019 => {
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSDestDistance = 0x001a => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSProcessingMethod = 0x001b => {
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    GPSAreaInformation = 0x001c => {
        types: &[Pt::Undefined],
        count: Pc::Any,
    },
    GPSDateStamp = 0x001d => {
        types: &[Pt::Ascii],
        count: Pc::Known(11),
    },
    GPSDifferential = 0x001e => {
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    GPSHPositioningError = 0x001f => {
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
);

make_key_list_for_group!(enum InteropIfdTag => IfdGroup::Interop,
    InteroperabilityIndex = 0x0001 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    InteroperabilityVersion = 0x0002 => {
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    RelatedImageFileFormat = 0x1000 => {
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    RelatedImageWidth = 0x1001 => {
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
    RelatedImageLength = 0x1002 => {
        types: &[Pt::Long, Pt::Short],
        count: Pc::Known(1),
    },
);
