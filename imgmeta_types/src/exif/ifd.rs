//! Contains stuff related to IFDs.
//!
//! For more info, see the [`IfdGroup`] enumeration.

/// An IFD is a set of keys found within a media file's Exif metadata.
///
/// IFD 0 will (optionally) contain keys indicating the locations of
/// sub-IFDs within the metadata slice. These are like pointers, not direct
/// embeds. IFD 1 follows IFD 0 in the chain and describes the thumbnail.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum IfdGroup {
    /// Refers to "IFD 0", keyed as `Exif.Image.*`.
    #[doc(alias = "IFD0")]
    #[doc(alias = "TIFF")]
    _0,

    /// The "Exif" IFD provides camera-based metadata, keyed as
    /// `Exif.Photo.*`.
    #[doc(alias = "ExifIFD")]
    Exif,

    /// The GPS IFD contains location metadata, keyed as `Exif.GPSInfo.*`.
    #[doc(alias = "GPSIFD")]
    Gps,

    /// The interoperability IFD, keyed as `Exif.Iop.*`.
    #[doc(alias = "InteropIFD")]
    Interop,

    /// "IFD 1", describing the embedded thumbnail. Keyed as
    /// `Exif.Thumbnail.*` and sharing its tag table with IFD 0.
    #[doc(alias = "IFD1")]
    _1,
}

impl IfdGroup {
    /// Every group, in the order they're written.
    pub const ALL: [IfdGroup; 5] = [
        IfdGroup::_0,
        IfdGroup::Exif,
        IfdGroup::Gps,
        IfdGroup::Interop,
        IfdGroup::_1,
    ];

    /// Checks whether this IFD group is optional.
    ///
    /// As of writing, IFD 0 is the only required group.
    pub fn optional(&self) -> bool {
        !matches!(self, Self::_0)
    }

    /// The group's name as used in keys like `Exif.Photo.FNumber`.
    ///
    /// ```
    /// use imgmeta_types::exif::ifd::IfdGroup;
    ///
    /// assert_eq!(IfdGroup::Gps.key_name(), "GPSInfo");
    /// ```
    pub const fn key_name(&self) -> &'static str {
        match self {
            IfdGroup::_0 => "Image",
            IfdGroup::Exif => "Photo",
            IfdGroup::Gps => "GPSInfo",
            IfdGroup::Interop => "Iop",
            IfdGroup::_1 => "Thumbnail",
        }
    }

    /// Finds the group named by a key segment.
    pub fn from_key_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.key_name() == name)
    }
}
