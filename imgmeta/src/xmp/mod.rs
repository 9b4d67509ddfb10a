//! Implements an XMP parser and model.
//!
//! XMP is RDF serialized as XML. We flatten each `rdf:Description` into a
//! list of properties, one per key:
//!
//! - simple values (elements or attributes) become text,
//! - `rdf:Bag` and `rdf:Seq` become arrays,
//! - `rdf:Alt` becomes language alternatives,
//! - struct properties become one property per field.
//!
//! Anything nested deeper than that is skipped.

use xmltree::Element;

use self::{
    error::XmpError,
    heuristics::{CollectionKind, XmpElementHeuristicsExt as _},
};
use crate::error::{CodecError, CodecErrorKind};
use imgmeta_types::xmp::{X_URI, XmpKind, XmpNamespace, property_kind};

pub mod error;
mod heuristics;
mod key;
mod write;

pub use key::{XmpFieldKey, XmpKey};

/// The language used when a value doesn't name one.
pub const DEFAULT_LANG: &str = "x-default";

/// The value of an XMP property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum XmpValue {
    Text(String),

    /// A `rdf:Bag` or `rdf:Seq`.
    Array { kind: XmpKind, items: Vec<String> },

    /// `(language, text)` pairs.
    LangAlt(Vec<(String, String)>),
}

impl XmpValue {
    pub fn kind(&self) -> XmpKind {
        match self {
            XmpValue::Text(_) => XmpKind::Text,
            XmpValue::Array { kind, .. } => *kind,
            XmpValue::LangAlt(_) => XmpKind::LangAlt,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }
}

impl core::fmt::Display for XmpValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            XmpValue::Text(text) => f.write_str(text),

            XmpValue::Array { items, .. } => f.write_str(&items.join(", ")),

            XmpValue::LangAlt(alts) => match alts.as_slice() {
                [(lang, text)] if lang == DEFAULT_LANG => f.write_str(text),
                _ => {
                    for (i, (lang, text)) in alts.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "lang=\"{lang}\" {text}")?;
                    }
                    Ok(())
                }
            },
        }
    }
}

/// Where a struct field's name comes from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct XmpField {
    pub namespace: String,
    pub prefix: String,
    pub name: String,
}

/// One property, or one field of a struct property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct XmpProperty {
    /// The namespace URI.
    pub namespace: String,

    /// The prefix used in keys. For known namespaces, that's the canonical
    /// one, whatever the document said.
    pub prefix: String,

    pub name: String,
    pub field: Option<XmpField>,
    pub value: XmpValue,
}

impl XmpProperty {
    pub fn key(&self) -> XmpKey {
        XmpKey {
            prefix: self.prefix.clone(),
            name: self.name.clone(),
            field: self.field.as_ref().map(|f| XmpFieldKey {
                prefix: f.prefix.clone(),
                name: f.name.clone(),
            }),
        }
    }
}

/// A parsed XMP packet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Xmp {
    /// Properties, in the order they were found or added.
    pub properties: Vec<XmpProperty>,

    /// `(prefix, uri)` for namespaces this document brought along.
    namespaces: Vec<(String, String)>,
}

impl Xmp {
    /// Parses an XMP packet.
    pub fn new(raw: &[u8]) -> Result<Self, XmpError> {
        // packets are often padded with NULs
        let end = raw.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        let document = Element::parse(&raw[..end])?;

        let mut xmp = Self::default();
        for description in descriptions(&document)? {
            xmp.parse_description(description);
        }

        log::trace!("Parsed `{}` XMP properties.", xmp.properties.len());
        Ok(xmp)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<(XmpKey, XmpValue)> {
        self.properties
            .get(index)
            .map(|p| (p.key(), p.value.clone()))
    }

    pub fn find(&self, key: &XmpKey) -> Option<(XmpKey, XmpValue)> {
        self.properties
            .iter()
            .find(|p| p.key() == *key)
            .map(|p| (p.key(), p.value.clone()))
    }

    /// Parses a key, checking that its prefixes name a namespace.
    pub fn parse_key(&self, key: &str) -> Result<XmpKey, CodecError> {
        let parsed = XmpKey::parse(key)?;

        let prefixes = core::iter::once(parsed.prefix.as_str())
            .chain(parsed.field.as_ref().map(|f| f.prefix.as_str()));
        for prefix in prefixes {
            if self.namespace_uri(prefix).is_none() {
                log::debug!("No namespace for prefix `{prefix}` in key `{key}`.");
                return Err(CodecError::new(
                    CodecErrorKind::InvalidNamespacePrefix,
                    format!("No namespace info available for XMP prefix '{prefix}'"),
                ));
            }
        }

        Ok(parsed)
    }

    /// The URI bound to a key prefix.
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        XmpNamespace::from_prefix(prefix)
            .map(|ns| ns.uri)
            .or_else(|| {
                self.namespaces
                    .iter()
                    .find(|(p, _)| p == prefix)
                    .map(|(_, uri)| uri.as_str())
            })
    }

    /// Sets a property from its string form.
    ///
    /// Text replaces the value. Arrays are replaced by a single item. Language
    /// alternatives update only the language named by a `lang="..."` prefix,
    /// or `x-default` without one.
    pub fn set_string(&mut self, key: &str, value: &str) -> Result<(), CodecError> {
        let parsed = self.parse_key(key)?;
        let existing = self.properties.iter().position(|p| p.key() == parsed);

        let kind = match existing {
            Some(i) => self.properties[i].value.kind(),
            None if parsed.field.is_some() => XmpKind::Text,
            None => property_kind(&parsed.prefix, &parsed.name),
        };

        let new_value = match kind {
            XmpKind::Text => XmpValue::Text(value.into()),
            XmpKind::Bag | XmpKind::Seq => XmpValue::Array {
                kind,
                items: vec![value.into()],
            },
            XmpKind::LangAlt => {
                let (lang, text) = split_lang(value);
                let mut alts = match existing.map(|i| &self.properties[i].value) {
                    Some(XmpValue::LangAlt(alts)) => alts.clone(),
                    _ => Vec::new(),
                };
                match alts.iter_mut().find(|(l, _)| *l == lang) {
                    Some(alt) => alt.1 = text,
                    None => alts.push((lang, text)),
                }
                XmpValue::LangAlt(alts)
            }
        };

        match existing {
            Some(i) => self.properties[i].value = new_value,
            None => {
                let property = self.property_for(parsed, new_value)?;
                self.properties.push(property);
            }
        }
        Ok(())
    }

    /// Removes every property with the key.
    pub fn strip_key(&mut self, key: &str) -> Result<(), CodecError> {
        let parsed = self.parse_key(key)?;
        self.properties.retain(|p| p.key() != parsed);
        Ok(())
    }

    fn property_for(&self, key: XmpKey, value: XmpValue) -> Result<XmpProperty, CodecError> {
        let uri = |prefix: &str| {
            self.namespace_uri(prefix).map(String::from).ok_or_else(|| {
                CodecError::new(
                    CodecErrorKind::InvalidNamespacePrefix,
                    format!("No namespace info available for XMP prefix '{prefix}'"),
                )
            })
        };

        let field = match key.field {
            Some(f) => Some(XmpField {
                namespace: uri(&f.prefix)?,
                prefix: f.prefix,
                name: f.name,
            }),
            None => None,
        };

        Ok(XmpProperty {
            namespace: uri(&key.prefix)?,
            prefix: key.prefix,
            name: key.name,
            field,
            value,
        })
    }

    /// Picks the key prefix for a namespace URI.
    ///
    /// Unknown namespaces keep the document's prefix, unless it clashes with
    /// a known or already-bound one.
    fn prefix_for(&mut self, uri: &str, document_prefix: Option<&str>) -> Option<String> {
        if let Some(known) = XmpNamespace::from_uri(uri) {
            return Some(known.prefix.into());
        }

        let Some(prefix) = document_prefix else {
            log::warn!("Namespace `{uri}` has no prefix. Skipping its properties.");
            return None;
        };

        if XmpNamespace::from_prefix(prefix).is_some() {
            log::warn!("Prefix `{prefix}` is bound to unknown namespace `{uri}`. Skipping it.");
            return None;
        }

        match self.namespaces.iter().find(|(p, _)| p == prefix) {
            Some((_, bound)) if bound != uri => {
                log::warn!("Prefix `{prefix}` is bound to both `{bound}` and `{uri}`. Skipping.");
                None
            }
            Some(_) => Some(prefix.into()),
            None => {
                log::debug!("Registering document namespace `{prefix}` = `{uri}`.");
                self.namespaces.push((prefix.into(), uri.into()));
                Some(prefix.into())
            }
        }
    }

    fn parse_description(&mut self, description: &Element) {
        // attributes are simple, unqualified properties.
        //
        // `rdf:about` and friends are filtered out here
        for (key, value) in description.property_attributes() {
            let Some(ref namespace) = key.namespace else {
                continue;
            };
            let Some(prefix) = self.prefix_for(namespace, key.prefix.as_deref()) else {
                continue;
            };

            self.properties.push(XmpProperty {
                namespace: namespace.clone(),
                prefix,
                name: key.local_name.clone(),
                field: None,
                value: XmpValue::Text(value.clone()),
            });
        }

        for element in description.elements() {
            self.parse_element(element);
        }
    }

    fn parse_element(&mut self, element: &Element) {
        log::trace!("Parsing element `{}`.", element.name);

        let Some(ref namespace) = element.namespace else {
            log::warn!(
                "Element `{name}` has no namespace. Cannot continue parsing as an element.",
                name = element.name
            );
            return;
        };
        let Some(prefix) = self.prefix_for(namespace, element.prefix.as_deref()) else {
            return;
        };

        if element.has_collection().is_none() && element.is_struct() {
            self.parse_struct(namespace, prefix, element);
            return;
        }

        let Some(value) = simple_value(element) else {
            log::debug!("Skipping `{prefix}:{}`, which nests too deeply.", element.name);
            return;
        };

        self.properties.push(XmpProperty {
            namespace: namespace.clone(),
            prefix,
            name: element.name.clone(),
            field: None,
            value,
        });
    }

    /// Flattens a struct into one property per field.
    fn parse_struct(&mut self, namespace: &str, prefix: String, element: &Element) {
        // fields live either on the element itself, or on a nested
        // `rdf:Description`
        let holder = element
            .elements()
            .find(|c| c.is_rdf("Description"))
            .unwrap_or(element);

        let mut fields: Vec<(String, Option<String>, String, XmpValue)> = holder
            .property_attributes()
            .into_iter()
            .filter_map(|(key, value)| {
                Some((
                    key.namespace.clone()?,
                    key.prefix.clone(),
                    key.local_name.clone(),
                    XmpValue::Text(value.clone()),
                ))
            })
            .collect();

        for child in holder.elements() {
            let Some(ref field_ns) = child.namespace else {
                continue;
            };
            if child.is_struct() && child.has_collection().is_none() {
                log::debug!(
                    "Skipping nested struct `{}` in `{prefix}:{}`.",
                    child.name,
                    element.name
                );
                continue;
            }
            match simple_value(child) {
                Some(value) => {
                    fields.push((field_ns.clone(), child.prefix.clone(), child.name.clone(), value))
                }
                None => log::debug!("Skipping field `{}`, which nests too deeply.", child.name),
            }
        }

        for (field_ns, field_prefix, field_name, value) in fields {
            let Some(field_prefix) = self.prefix_for(&field_ns, field_prefix.as_deref()) else {
                continue;
            };

            self.properties.push(XmpProperty {
                namespace: namespace.into(),
                prefix: prefix.clone(),
                name: element.name.clone(),
                field: Some(XmpField {
                    namespace: field_ns,
                    prefix: field_prefix,
                    name: field_name,
                }),
                value,
            });
        }
    }
}

/// Finds the `rdf:Description` elements of a document.
fn descriptions(document: &Element) -> Result<Vec<&Element>, XmpError> {
    // the first one is optional: `x:xmpmeta`
    let parent = if document.name == "xmpmeta" && document.namespace.as_deref() == Some(X_URI) {
        log::debug!("Found an `x:xmpmeta` element.");
        document
    } else {
        document
            .elements()
            .find(|c| c.name == "xmpmeta" && c.namespace.as_deref() == Some(X_URI))
            .unwrap_or(document)
    };

    // note: sometimes, the document's "root" is the `rdf:RDF` element, so
    // we've gotta check first
    let rdf = if parent.is_rdf("RDF") {
        Some(parent)
    } else {
        parent.elements().find(|c| c.is_rdf("RDF"))
    }
    .ok_or_else(|| {
        log::error!("Couldn't find an `rdf:RDF` element in the document.");
        XmpError::NoRdfElement
    })?;

    let descriptions = rdf
        .elements()
        .filter(|c| c.is_rdf("Description"))
        .collect::<Vec<_>>();

    if descriptions.is_empty() {
        log::warn!("No `rdf:Description` elements found in the `rdf:RDF` element.");
    }
    Ok(descriptions)
}

/// Reads text, an array, or language alternatives from an element.
///
/// Returns `None` for structs and arrays of structs.
fn simple_value(element: &Element) -> Option<XmpValue> {
    if let Some((kind, collection)) = element.has_collection() {
        let items = collection.elements().filter(|li| li.is_rdf("li"));

        return Some(match kind {
            CollectionKind::Alternatives => XmpValue::LangAlt(
                items
                    .map(|li| {
                        let lang = li.lang().unwrap_or(DEFAULT_LANG).to_owned();
                        item_text(li).map(|text| (lang, text))
                    })
                    .collect::<Option<_>>()?,
            ),
            CollectionKind::Unordered | CollectionKind::Ordered => XmpValue::Array {
                kind: if kind == CollectionKind::Ordered {
                    XmpKind::Seq
                } else {
                    XmpKind::Bag
                },
                items: items.map(item_text).collect::<Option<_>>()?,
            },
        });
    }

    if element.elements().next().is_some() {
        return None;
    }

    // `<ns:Prop rdf:resource="..."/>` is a URI value
    if let Some(resource) = element.rdf_attribute("resource") {
        return Some(XmpValue::Text(resource.into()));
    }

    Some(XmpValue::Text(
        element.get_text().map(|t| t.into_owned()).unwrap_or_default(),
    ))
}

fn item_text(li: &Element) -> Option<String> {
    if li.elements().next().is_some() || li.is_struct() {
        return None;
    }
    Some(li.get_text().map(|t| t.into_owned()).unwrap_or_default())
}

/// Splits a `lang="de" text` value.
fn split_lang(value: &str) -> (String, String) {
    value
        .strip_prefix("lang=\"")
        .and_then(|rest| rest.split_once('"'))
        .map(|(lang, text)| (lang.to_owned(), text.trim_start().to_owned()))
        .unwrap_or_else(|| (DEFAULT_LANG.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::{Xmp, XmpKey, XmpValue};
    use crate::{error::CodecErrorKind, util::logger};
    use imgmeta_types::xmp::XmpKind;

    const PACKET: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:Iptc4xmpCore="http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"
    xmlns:my="urn:example:my/"
    Iptc4xmpCore:JobId="12345">
   <dc:subject>
    <rdf:Bag>
     <rdf:li>cat</rdf:li>
     <rdf:li>dog</rdf:li>
    </rdf:Bag>
   </dc:subject>
   <dc:description>
    <rdf:Alt>
     <rdf:li xml:lang="x-default">a cat</rdf:li>
     <rdf:li xml:lang="de">eine Katze</rdf:li>
    </rdf:Alt>
   </dc:description>
   <Iptc4xmpCore:CreatorContactInfo rdf:parseType="Resource">
    <Iptc4xmpCore:CiAdrCity>Ankh-Morpork</Iptc4xmpCore:CiAdrCity>
   </Iptc4xmpCore:CreatorContactInfo>
   <my:Thing>hi</my:Thing>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

    fn shown(xmp: &Xmp, key: &str) -> Option<String> {
        xmp.find(&XmpKey::parse(key).unwrap())
            .map(|(_, v)| v.to_string())
    }

    #[test]
    fn parses_a_packet() {
        logger();

        let xmp = Xmp::new(PACKET.as_bytes()).unwrap();
        assert_eq!(xmp.len(), 5);

        // the document's prefix doesn't matter for known namespaces
        assert_eq!(shown(&xmp, "Xmp.iptc.JobId").as_deref(), Some("12345"));
        assert_eq!(shown(&xmp, "Xmp.dc.subject").as_deref(), Some("cat, dog"));
        assert_eq!(
            shown(&xmp, "Xmp.dc.description").as_deref(),
            Some(r#"lang="x-default" a cat, lang="de" eine Katze"#)
        );
        assert_eq!(
            shown(&xmp, "Xmp.iptc.CreatorContactInfo/iptc:CiAdrCity").as_deref(),
            Some("Ankh-Morpork")
        );
        assert_eq!(shown(&xmp, "Xmp.my.Thing").as_deref(), Some("hi"));

        // the document bound `my`, so it's usable in keys now
        assert!(xmp.parse_key("Xmp.my.Other").is_ok());
    }

    #[test]
    fn bare_rdf_and_blank_descriptions() {
        logger();

        let xmp = Xmp::new(
            br#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:Description rdf:about="" xmlns:ns="ns:myName/" /></rdf:RDF>"#,
        )
        .unwrap();
        assert!(xmp.is_empty());

        let err = Xmp::new(b"<hello>there</hello>").unwrap_err();
        assert!(matches!(err, super::error::XmpError::NoRdfElement));

        assert!(Xmp::new(b"<not xml").is_err());
    }

    #[test]
    fn setting_follows_the_property_kind() {
        logger();

        let mut xmp = Xmp::default();
        xmp.set_string("Xmp.iptc.CreditLine", "John Doe").unwrap();
        xmp.set_string("Xmp.dc.subject", "cat").unwrap();
        xmp.set_string("Xmp.dc.description", "a cat").unwrap();
        xmp.set_string("Xmp.dc.description", r#"lang="de" eine Katze"#)
            .unwrap();

        assert_eq!(xmp.len(), 3);
        assert_eq!(
            xmp.entry(1).unwrap().1,
            XmpValue::Array {
                kind: XmpKind::Bag,
                items: vec!["cat".into()]
            }
        );
        assert_eq!(xmp.entry(2).unwrap().1.type_name(), "LangAlt");
        assert_eq!(
            shown(&xmp, "Xmp.dc.description").as_deref(),
            Some(r#"lang="x-default" a cat, lang="de" eine Katze"#)
        );

        xmp.set_string("Xmp.iptc.CreditLine", "Jane Doe").unwrap();
        assert_eq!(shown(&xmp, "Xmp.iptc.CreditLine").as_deref(), Some("Jane Doe"));
        assert_eq!(xmp.len(), 3);

        xmp.strip_key("Xmp.dc.subject").unwrap();
        xmp.strip_key("Xmp.dc.subject").unwrap();
        assert_eq!(xmp.len(), 2);
    }

    #[test]
    fn unknown_prefixes_are_rejected() {
        logger();

        let mut xmp = Xmp::default();
        let err = xmp.set_string("Xmp.Invalid.Key", "x").unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::InvalidNamespacePrefix);
        assert_eq!(err.code(), 35);
        assert!(
            err.message()
                .starts_with("No namespace info available for XMP prefix")
        );

        let err = xmp
            .strip_key("Xmp.iptc.CreatorContactInfo/nope:CiAdrCity")
            .unwrap_err();
        assert_eq!(err.kind(), CodecErrorKind::InvalidNamespacePrefix);
    }
}
