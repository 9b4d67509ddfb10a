//! XMP namespaces and property kinds.
//!
//! Keys look like `Xmp.<prefix>.<property>`, e.g. `Xmp.dc.subject`. The
//! prefix in a key is always the canonical one listed here, no matter which
//! prefix a document happened to bind the namespace to.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// A namespace known to the library.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct XmpNamespace {
    pub prefix: &'static str,
    pub uri: &'static str,
}

/// Every known namespace.
pub const NAMESPACES: &[XmpNamespace] = &[
    ns("dc", "http://purl.org/dc/elements/1.1/"),
    ns("xmp", "http://ns.adobe.com/xap/1.0/"),
    ns("xmpRights", "http://ns.adobe.com/xap/1.0/rights/"),
    ns("xmpMM", "http://ns.adobe.com/xap/1.0/mm/"),
    ns("xmpBJ", "http://ns.adobe.com/xap/1.0/bj/"),
    ns("xmpTPg", "http://ns.adobe.com/xap/1.0/t/pg/"),
    ns("xmpDM", "http://ns.adobe.com/xmp/1.0/DynamicMedia/"),
    ns("xmpNote", "http://ns.adobe.com/xmp/note/"),
    ns("pdf", "http://ns.adobe.com/pdf/1.3/"),
    ns("photoshop", "http://ns.adobe.com/photoshop/1.0/"),
    ns("crs", "http://ns.adobe.com/camera-raw-settings/1.0/"),
    ns("tiff", "http://ns.adobe.com/tiff/1.0/"),
    ns("exif", "http://ns.adobe.com/exif/1.0/"),
    ns("exifEX", "http://cipa.jp/exif/1.0/"),
    ns("aux", "http://ns.adobe.com/exif/1.0/aux/"),
    ns("iptc", "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"),
    ns("iptcExt", "http://iptc.org/std/Iptc4xmpExt/2008-02-29/"),
    ns("plus", "http://ns.useplus.org/ldf/xmp/1.0/"),
    ns("lr", "http://ns.adobe.com/lightroom/1.0/"),
    ns("GPano", "http://ns.google.com/photos/1.0/panorama/"),
    ns("GCamera", "http://ns.google.com/photos/1.0/camera/"),
    ns("digiKam", "http://www.digikam.org/ns/1.0/"),
    ns("MicrosoftPhoto", "http://ns.microsoft.com/photo/1.0/"),
    ns("mwg-rs", "http://www.metadataworkinggroup.com/schemas/regions/"),
];

const fn ns(prefix: &'static str, uri: &'static str) -> XmpNamespace {
    XmpNamespace { prefix, uri }
}

/// The RDF namespace.
pub const RDF_URI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// The `x:xmpmeta` wrapper's namespace.
pub const X_URI: &str = "adobe:ns:meta/";

/// The `xml:lang` namespace.
pub const XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

static BY_PREFIX: LazyLock<FxHashMap<&'static str, &'static XmpNamespace>> =
    LazyLock::new(|| NAMESPACES.iter().map(|n| (n.prefix, n)).collect());

static BY_URI: LazyLock<FxHashMap<&'static str, &'static XmpNamespace>> =
    LazyLock::new(|| NAMESPACES.iter().map(|n| (n.uri, n)).collect());

impl XmpNamespace {
    /// Finds a namespace by its canonical prefix.
    ///
    /// ```
    /// use imgmeta_types::xmp::XmpNamespace;
    ///
    /// let iptc = XmpNamespace::from_prefix("iptc").unwrap();
    /// assert_eq!(iptc.uri, "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/");
    /// ```
    pub fn from_prefix(prefix: &str) -> Option<&'static XmpNamespace> {
        BY_PREFIX.get(prefix).copied()
    }

    /// Finds a namespace by its URI.
    pub fn from_uri(uri: &str) -> Option<&'static XmpNamespace> {
        BY_URI.get(uri).copied()
    }
}

/// The shape of a property's value.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum XmpKind {
    /// A simple text value.
    Text,

    /// An unordered array, `rdf:Bag`.
    Bag,

    /// An ordered array, `rdf:Seq`.
    Seq,

    /// Language alternatives, `rdf:Alt` with `xml:lang` qualifiers.
    LangAlt,
}

impl XmpKind {
    /// The type's name as XMP tools print it.
    pub const fn name(&self) -> &'static str {
        match self {
            XmpKind::Text => "XmpText",
            XmpKind::Bag => "XmpBag",
            XmpKind::Seq => "XmpSeq",
            XmpKind::LangAlt => "LangAlt",
        }
    }
}

/// Well-known properties whose values aren't simple text.
const PROPERTY_KINDS: &[(&str, &str, XmpKind)] = &[
    ("dc", "contributor", XmpKind::Bag),
    ("dc", "creator", XmpKind::Seq),
    ("dc", "date", XmpKind::Seq),
    ("dc", "description", XmpKind::LangAlt),
    ("dc", "language", XmpKind::Bag),
    ("dc", "publisher", XmpKind::Bag),
    ("dc", "relation", XmpKind::Bag),
    ("dc", "rights", XmpKind::LangAlt),
    ("dc", "subject", XmpKind::Bag),
    ("dc", "title", XmpKind::LangAlt),
    ("dc", "type", XmpKind::Bag),
    ("xmp", "Identifier", XmpKind::Bag),
    ("xmpRights", "Owner", XmpKind::Bag),
    ("xmpRights", "UsageTerms", XmpKind::LangAlt),
    ("photoshop", "SupplementalCategories", XmpKind::Bag),
    ("iptc", "Scene", XmpKind::Bag),
    ("iptc", "SubjectCode", XmpKind::Bag),
    ("lr", "hierarchicalSubject", XmpKind::Bag),
    ("MicrosoftPhoto", "LastKeywordXMP", XmpKind::Bag),
];

static KINDS: LazyLock<FxHashMap<&'static str, FxHashMap<&'static str, XmpKind>>> =
    LazyLock::new(|| {
        let mut kinds: FxHashMap<&'static str, FxHashMap<&'static str, XmpKind>> =
            FxHashMap::default();
        for (prefix, name, kind) in PROPERTY_KINDS {
            kinds.entry(*prefix).or_default().insert(*name, *kind);
        }
        kinds
    });

/// The kind new values of a property are written as.
///
/// ```
/// use imgmeta_types::xmp::{XmpKind, property_kind};
///
/// assert_eq!(property_kind("dc", "subject"), XmpKind::Bag);
/// assert_eq!(property_kind("iptc", "CreditLine"), XmpKind::Text);
/// ```
pub fn property_kind(prefix: &str, name: &str) -> XmpKind {
    KINDS
        .get(prefix)
        .and_then(|props| props.get(name))
        .copied()
        .unwrap_or(XmpKind::Text)
}
