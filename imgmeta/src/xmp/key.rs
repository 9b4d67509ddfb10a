use crate::error::CodecError;

/// A parsed `Xmp.<prefix>.<property>` key.
///
/// Fields of a struct property are addressed with a path, like
/// `Xmp.iptc.CreatorContactInfo/iptc:CiAdrCity`.
///
/// Parsing only checks the shape of the key. Whether its prefixes name a
/// namespace depends on the document, so that's checked by
/// [`Xmp::parse_key`](super::Xmp::parse_key).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct XmpKey {
    pub prefix: String,
    pub name: String,
    pub field: Option<XmpFieldKey>,
}

/// The `prefix:name` of a struct field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct XmpFieldKey {
    pub prefix: String,
    pub name: String,
}

impl XmpKey {
    pub const FAMILY: &'static str = "Xmp";

    pub fn parse(key: &str) -> Result<Self, CodecError> {
        let mut parts = key.splitn(3, '.');
        let (Some(family), Some(prefix), Some(path)) = (parts.next(), parts.next(), parts.next())
        else {
            log::debug!("Rejecting XMP key `{key}`.");
            return Err(CodecError::invalid_key(key));
        };

        if family != Self::FAMILY || prefix.is_empty() {
            log::debug!("XMP key `{key}` has the wrong family or no prefix.");
            return Err(CodecError::invalid_key(key));
        }

        let (name, field) = match path.split_once('/') {
            None => (path, None),
            Some((name, field)) => {
                let Some((field_prefix, field_name)) = field.split_once(':') else {
                    return Err(CodecError::invalid_key(key));
                };
                if !is_name(field_prefix) || !is_name(field_name) {
                    return Err(CodecError::invalid_key(key));
                }

                (
                    name,
                    Some(XmpFieldKey {
                        prefix: field_prefix.into(),
                        name: field_name.into(),
                    }),
                )
            }
        };

        if !is_name(name) {
            return Err(CodecError::invalid_key(key));
        }

        Ok(Self {
            prefix: prefix.into(),
            name: name.into(),
            field,
        })
    }
}

/// Whether `part` can be an XML local name (loosely).
fn is_name(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl core::fmt::Display for XmpKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", Self::FAMILY, self.prefix, self.name)?;
        if let Some(ref field) = self.field {
            write!(f, "/{}:{}", field.prefix, field.name)?;
        }
        Ok(())
    }
}
