//! Views over one metadata namespace of an [`Image`].
//!
//! A container doesn't copy anything. Each call reads the image's current
//! state, so a container made before [`Image::read_metadata`] sees what was
//! loaded afterwards.

use std::collections::BTreeMap;

use crate::{
    Image, MetadataFormat,
    datum::Datum,
    error::{CodecError, Error, Result},
    exif::{ExifKey, ExifValue},
    iptc::{IptcKey, IptcValue},
    iter::DatumIter,
    metadata::Metadata,
    xmp::{XmpKey, XmpValue},
};

mod sealed {
    pub trait Sealed {}
}

/// One of the three metadata namespaces.
///
/// This is sealed: the only implementors are [`ExifNs`], [`IptcNs`] and
/// [`XmpNs`].
pub trait Namespace:
    sealed::Sealed + Clone + Copy + core::fmt::Debug + Send + Sync + 'static
{
    /// The format this namespace stands for.
    const FORMAT: MetadataFormat;

    /// A parsed key, displayed as `Family.Group.Name`.
    type Key: Clone + core::fmt::Debug + core::fmt::Display + PartialEq + Send + Sync + 'static;

    /// A value, displayed as its string form.
    type Value: Clone + core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    #[doc(hidden)]
    fn count(metadata: &Metadata) -> usize;

    #[doc(hidden)]
    fn entry(metadata: &Metadata, index: usize) -> Option<(Self::Key, Self::Value)>;

    /// Finds the first entry with the key.
    ///
    /// Fails only when the key itself is invalid.
    #[doc(hidden)]
    fn lookup(
        metadata: &Metadata,
        key: &str,
    ) -> core::result::Result<Option<(Self::Key, Self::Value)>, CodecError>;

    #[doc(hidden)]
    fn set_string(metadata: &mut Metadata, key: &str, value: &str) -> core::result::Result<(), CodecError>;

    #[doc(hidden)]
    fn strip_key(metadata: &mut Metadata, key: &str) -> core::result::Result<(), CodecError>;
}

/// Marks EXIF.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExifNs;

/// Marks IPTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IptcNs;

/// Marks XMP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct XmpNs;

impl sealed::Sealed for ExifNs {}
impl sealed::Sealed for IptcNs {}
impl sealed::Sealed for XmpNs {}

impl Namespace for ExifNs {
    const FORMAT: MetadataFormat = MetadataFormat::Exif;
    type Key = ExifKey;
    type Value = ExifValue;

    fn count(metadata: &Metadata) -> usize {
        metadata.exif.len()
    }

    fn entry(metadata: &Metadata, index: usize) -> Option<(ExifKey, ExifValue)> {
        metadata.exif.entry(index)
    }

    fn lookup(
        metadata: &Metadata,
        key: &str,
    ) -> core::result::Result<Option<(ExifKey, ExifValue)>, CodecError> {
        let key = ExifKey::parse(key)?;
        Ok(metadata.exif.find(&key))
    }

    fn set_string(metadata: &mut Metadata, key: &str, value: &str) -> core::result::Result<(), CodecError> {
        metadata.exif.set_string(key, value)
    }

    fn strip_key(metadata: &mut Metadata, key: &str) -> core::result::Result<(), CodecError> {
        metadata.exif.strip_key(key)
    }
}

impl Namespace for IptcNs {
    const FORMAT: MetadataFormat = MetadataFormat::Iptc;
    type Key = IptcKey;
    type Value = IptcValue;

    fn count(metadata: &Metadata) -> usize {
        metadata.iptc.len()
    }

    fn entry(metadata: &Metadata, index: usize) -> Option<(IptcKey, IptcValue)> {
        metadata.iptc.entry(index)
    }

    fn lookup(
        metadata: &Metadata,
        key: &str,
    ) -> core::result::Result<Option<(IptcKey, IptcValue)>, CodecError> {
        let key = IptcKey::parse(key)?;
        Ok(metadata.iptc.find(&key))
    }

    fn set_string(metadata: &mut Metadata, key: &str, value: &str) -> core::result::Result<(), CodecError> {
        metadata.iptc.set_string(key, value)
    }

    fn strip_key(metadata: &mut Metadata, key: &str) -> core::result::Result<(), CodecError> {
        metadata.iptc.strip_key(key)
    }
}

impl Namespace for XmpNs {
    const FORMAT: MetadataFormat = MetadataFormat::Xmp;
    type Key = XmpKey;
    type Value = XmpValue;

    fn count(metadata: &Metadata) -> usize {
        metadata.xmp.len()
    }

    fn entry(metadata: &Metadata, index: usize) -> Option<(XmpKey, XmpValue)> {
        metadata.xmp.entry(index)
    }

    // prefixes resolve against the document's own namespaces too
    fn lookup(
        metadata: &Metadata,
        key: &str,
    ) -> core::result::Result<Option<(XmpKey, XmpValue)>, CodecError> {
        let key = metadata.xmp.parse_key(key)?;
        Ok(metadata.xmp.find(&key))
    }

    fn set_string(metadata: &mut Metadata, key: &str, value: &str) -> core::result::Result<(), CodecError> {
        metadata.xmp.set_string(key, value)
    }

    fn strip_key(metadata: &mut Metadata, key: &str) -> core::result::Result<(), CodecError> {
        metadata.xmp.strip_key(key)
    }
}

/// The result of looking up a key.
#[must_use]
#[derive(Clone, Debug)]
pub enum Lookup<T> {
    /// An entry with the key exists.
    Found(T),

    /// The key is valid, but nothing has it.
    Absent,

    /// The key isn't valid for this namespace.
    Invalid(Error),
}

impl<T> Lookup<T> {
    /// Converts into a `Result`, so `?` can be used.
    ///
    /// ```
    /// # fn example(image: &imgmeta::Image) -> imgmeta::Result<()> {
    /// if let Some(datum) = image.exif_data().find_key("Exif.Image.Make").into_result()? {
    ///     println!("made by {datum}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            Lookup::Found(t) => Ok(Some(t)),
            Lookup::Absent => Ok(None),
            Lookup::Invalid(e) => Err(e),
        }
    }

    /// The found value, if any. Errors are discarded.
    pub fn ok(self) -> Option<T> {
        match self {
            Lookup::Found(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Lookup::Invalid(_))
    }

    /// The error, for an invalid key.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Lookup::Invalid(e) => Some(e),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(t) => Lookup::Found(f(t)),
            Lookup::Absent => Lookup::Absent,
            Lookup::Invalid(e) => Lookup::Invalid(e),
        }
    }
}

/// Read access shared by every container.
///
/// This is object safe, so containers of different namespaces can be held
/// as `&dyn MetadataProvider`.
pub trait MetadataProvider {
    /// Which namespace this reads.
    fn format(&self) -> MetadataFormat;

    /// The string form of the first entry with the key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when nothing has the key. Invalid keys give
    /// their codec error.
    fn get_string(&self, key: &str) -> Result<String>;

    /// Every key with its string value.
    ///
    /// When a key repeats, the last occurrence wins.
    fn all_tags(&self) -> BTreeMap<String, String>;
}

/// A live view of one namespace of an [`Image`].
pub struct Container<N: Namespace> {
    image: Image,
    _namespace: core::marker::PhantomData<N>,
}

/// The EXIF of an image.
pub type ExifData = Container<ExifNs>;

/// The IPTC of an image.
pub type IptcData = Container<IptcNs>;

/// The XMP of an image.
pub type XmpData = Container<XmpNs>;

impl<N: Namespace> Container<N> {
    pub(crate) fn new(image: Image) -> Self {
        Self {
            image,
            _namespace: core::marker::PhantomData,
        }
    }

    /// The image this reads from.
    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn format(&self) -> MetadataFormat {
        N::FORMAT
    }

    /// Looks up the first entry with the key.
    pub fn find_key(&self, key: &str) -> Lookup<Datum<N>> {
        let state = self.image.state();
        let found = match state.metadata() {
            Some(metadata) => N::lookup(metadata, key),
            // nothing loaded yet, but the key still has to be valid
            None => N::lookup(&Metadata::default(), key),
        };
        drop(state);

        match found {
            Ok(Some((key, value))) => Lookup::Found(Datum::new(self.image.clone(), key, value)),
            Ok(None) => {
                log::trace!("No `{}` entry has key `{key}`.", N::FORMAT);
                Lookup::Absent
            }
            Err(e) => {
                log::debug!("Lookup of `{key}` failed. err: {e}");
                Lookup::Invalid(e.into())
            }
        }
    }

    /// The string form of the first entry with the key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when nothing has the key. Invalid keys give
    /// their codec error.
    pub fn get_string(&self, key: &str) -> Result<String> {
        match self.find_key(key) {
            Lookup::Found(datum) => Ok(datum.to_string()),
            Lookup::Absent => Err(Error::KeyNotFound),
            Lookup::Invalid(e) => Err(e),
        }
    }

    /// Every key with its string value.
    ///
    /// When a key repeats, the last occurrence wins.
    pub fn all_tags(&self) -> BTreeMap<String, String> {
        self.entries()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// Iterates over the entries, in order.
    pub fn iter(&self) -> DatumIter<N> {
        DatumIter::new(self.image.clone())
    }

    /// Every entry's key, in order. Repeated keys appear more than once.
    pub fn keys(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Every entry, read under one lock so concurrent changes can't cut it
    /// short.
    fn entries(&self) -> Vec<(N::Key, N::Value)> {
        let state = self.image.state();
        state.metadata().map_or_else(Vec::new, entries_of::<N>)
    }

    /// How many entries there are.
    pub fn len(&self) -> usize {
        self.image.state().metadata().map_or(0, N::count)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every entry of one namespace, in order.
pub(crate) fn entries_of<N: Namespace>(metadata: &Metadata) -> Vec<(N::Key, N::Value)> {
    (0..N::count(metadata))
        .filter_map(|i| N::entry(metadata, i))
        .collect()
}

impl<N: Namespace> MetadataProvider for Container<N> {
    fn format(&self) -> MetadataFormat {
        N::FORMAT
    }

    fn get_string(&self, key: &str) -> Result<String> {
        Container::get_string(self, key)
    }

    fn all_tags(&self) -> BTreeMap<String, String> {
        Container::all_tags(self)
    }
}

impl<N: Namespace> Clone for Container<N> {
    fn clone(&self) -> Self {
        Self::new(self.image.clone())
    }
}

impl<N: Namespace> core::fmt::Debug for Container<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Container")
            .field("format", &N::FORMAT)
            .field("image", &self.image)
            .finish()
    }
}

impl<N: Namespace> IntoIterator for &Container<N> {
    type Item = Datum<N>;
    type IntoIter = DatumIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
