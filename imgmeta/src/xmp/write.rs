//! Serializes an [`Xmp`] model back into a packet.
//!
//! Every property is written as an element of a single `rdf:Description`.
//! Fields of the same struct are gathered under one
//! `rdf:parseType="Resource"` element.

use std::collections::BTreeMap;
use core::fmt::Write as _;

use super::{Xmp, XmpProperty, XmpValue};
use imgmeta_types::xmp::{RDF_URI, X_URI, XmpKind};

const HEADER: &str = "<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n";
const TRAILER: &str = "<?xpacket end=\"w\"?>";

enum Node<'a> {
    Simple(&'a XmpProperty),
    Struct {
        property: &'a XmpProperty,
        fields: Vec<&'a XmpProperty>,
    },
}

impl Xmp {
    /// Encodes the properties as an XMP packet.
    ///
    /// Returns `None` when there are no properties.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        if self.properties.is_empty() {
            return None;
        }

        // group struct fields under their parent, at its first position
        let mut nodes: Vec<Node<'_>> = Vec::new();
        for property in &self.properties {
            if property.field.is_none() {
                nodes.push(Node::Simple(property));
                continue;
            }

            let parent = nodes.iter_mut().find_map(|n| match n {
                Node::Struct { property: p, fields }
                    if p.namespace == property.namespace && p.name == property.name =>
                {
                    Some(fields)
                }
                _ => None,
            });
            match parent {
                Some(fields) => fields.push(property),
                None => nodes.push(Node::Struct {
                    property,
                    fields: vec![property],
                }),
            }
        }

        let mut namespaces: BTreeMap<&str, &str> = BTreeMap::new();
        for property in &self.properties {
            namespaces.insert(&property.prefix, &property.namespace);
            if let Some(ref field) = property.field {
                namespaces.insert(&field.prefix, &field.namespace);
            }
        }

        let mut out = String::from(HEADER);
        _ = writeln!(out, "<x:xmpmeta xmlns:x=\"{X_URI}\">");
        _ = writeln!(out, " <rdf:RDF xmlns:rdf=\"{RDF_URI}\">");
        out.push_str("  <rdf:Description rdf:about=\"\"");
        for (prefix, uri) in &namespaces {
            _ = write!(out, "\n    xmlns:{prefix}=\"{}\"", escape(uri));
        }
        out.push_str(">\n");

        for node in &nodes {
            match node {
                Node::Simple(p) => write_value(&mut out, 3, &format!("{}:{}", p.prefix, p.name), &p.value),
                Node::Struct { property, fields } => {
                    let name = format!("{}:{}", property.prefix, property.name);
                    _ = writeln!(out, "   <{name} rdf:parseType=\"Resource\">");
                    for field in fields {
                        if let Some(ref f) = field.field {
                            write_value(&mut out, 4, &format!("{}:{}", f.prefix, f.name), &field.value);
                        }
                    }
                    _ = writeln!(out, "   </{name}>");
                }
            }
        }

        out.push_str("  </rdf:Description>\n </rdf:RDF>\n</x:xmpmeta>\n");
        out.push_str(TRAILER);
        Some(out.into_bytes())
    }
}

fn write_value(out: &mut String, depth: usize, name: &str, value: &XmpValue) {
    let pad = " ".repeat(depth);
    match value {
        XmpValue::Text(text) => {
            _ = writeln!(out, "{pad}<{name}>{}</{name}>", escape(text));
        }

        XmpValue::Array { kind, items } => {
            let container = if *kind == XmpKind::Seq { "rdf:Seq" } else { "rdf:Bag" };
            _ = writeln!(out, "{pad}<{name}>\n{pad} <{container}>");
            for item in items {
                _ = writeln!(out, "{pad}  <rdf:li>{}</rdf:li>", escape(item));
            }
            _ = writeln!(out, "{pad} </{container}>\n{pad}</{name}>");
        }

        XmpValue::LangAlt(alts) => {
            _ = writeln!(out, "{pad}<{name}>\n{pad} <rdf:Alt>");
            for (lang, text) in alts {
                _ = writeln!(
                    out,
                    "{pad}  <rdf:li xml:lang=\"{}\">{}</rdf:li>",
                    escape(lang),
                    escape(text)
                );
            }
            _ = writeln!(out, "{pad} </rdf:Alt>\n{pad}</{name}>");
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::{util::logger, xmp::Xmp};

    #[test]
    fn written_packets_parse_back() {
        logger();

        let mut xmp = Xmp::default();
        xmp.set_string("Xmp.iptc.CreditLine", "John Doe").unwrap();
        xmp.set_string("Xmp.iptc.CopyrightNotice", "this is the copy, right?")
            .unwrap();
        xmp.set_string("Xmp.dc.subject", "cats & <dogs>").unwrap();
        xmp.set_string("Xmp.dc.description", r#"lang="de" eine "Katze""#)
            .unwrap();
        xmp.set_string("Xmp.iptc.CreatorContactInfo/iptc:CiAdrCity", "Lancre")
            .unwrap();
        xmp.set_string("Xmp.iptc.CreatorContactInfo/iptc:CiAdrCtry", "Disc")
            .unwrap();

        let bytes = xmp.to_bytes().unwrap();
        let parsed = Xmp::new(&bytes).unwrap();
        assert_eq!(parsed.properties, xmp.properties);

        // same model, same bytes
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn empty_xmp_writes_nothing() {
        logger();
        assert_eq!(Xmp::default().to_bytes(), None);
    }
}
