//! This module assists in guessing the shape of an XML element.
//!
//! XMP properties carry no type information, so we look at how the RDF is
//! laid out instead.

use imgmeta_types::xmp::{RDF_URI, XML_URI};
use xmltree::{AttributeName, Element};

pub(super) trait XmpElementHeuristicsExt {
    fn is_rdf(&self, name: &str) -> bool;
    fn is_struct(&self) -> bool;
    fn has_collection(&self) -> Option<(CollectionKind, &Element)>;
    fn rdf_attribute(&self, name: &str) -> Option<&str>;
    fn lang(&self) -> Option<&str>;
    fn elements(&self) -> impl Iterator<Item = &Element>;
    fn property_attributes(&self) -> Vec<(&AttributeName, &String)>;
}

impl XmpElementHeuristicsExt for Element {
    fn is_rdf(&self, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(RDF_URI)
    }

    /// Determines whether or not `self` is a struct.
    fn is_struct(&self) -> bool {
        // if we have the `rdf:parseType="Resource"`, we must be a struct.
        if self.rdf_attribute("parseType") == Some("Resource") {
            return true;
        }

        // if any of our children are `rdf:Description`, we carry fields and
        // must be a struct
        if self.elements().any(|c| c.is_rdf("Description")) {
            return true;
        }

        // fields as attributes, and nothing else
        self.elements().next().is_none() && !self.property_attributes().is_empty()
    }

    fn has_collection(&self) -> Option<(CollectionKind, &Element)> {
        self.elements().find_map(|c| {
            if c.namespace.as_deref() != Some(RDF_URI) {
                return None;
            }

            match c.name.as_str() {
                "Alt" => Some((CollectionKind::Alternatives, c)),
                "Bag" => Some((CollectionKind::Unordered, c)),
                "Seq" => Some((CollectionKind::Ordered, c)),
                _ => None,
            }
        })
    }

    fn rdf_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.local_name == name && key.namespace.as_deref() == Some(RDF_URI))
            .map(|(_, value)| value.as_str())
    }

    /// The `xml:lang` qualifier.
    fn lang(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| {
                key.local_name == "lang"
                    && (key.prefix.as_deref() == Some("xml") || key.namespace.as_deref() == Some(XML_URI))
            })
            .map(|(_, value)| value.as_str())
    }

    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().flat_map(|c| c.as_element())
    }

    /// Attributes that hold property values, sorted so parsing is stable.
    ///
    /// That's anything namespaced, except RDF syntax and `xml:` qualifiers.
    fn property_attributes(&self) -> Vec<(&AttributeName, &String)> {
        let mut attrs = self
            .attributes
            .iter()
            .filter(|(key, _)| {
                key.namespace.as_deref()
                    .is_some_and(|ns| ns != RDF_URI && ns != XML_URI)
                    && key.prefix.as_deref() != Some("xml")
                    && key.prefix.as_deref() != Some("xmlns")
            })
            .collect::<Vec<_>>();

        attrs.sort_by(|(a, _), (b, _)| {
            (a.namespace.as_deref(), a.local_name.as_str()).cmp(&(b.namespace.as_deref(), b.local_name.as_str()))
        });
        attrs
    }
}

/// The kind of collection we've detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CollectionKind {
    Alternatives,
    Unordered,
    Ordered,
}
