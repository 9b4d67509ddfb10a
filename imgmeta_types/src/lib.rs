//! # `imgmeta_types`
//!
//! Static dictionaries used by [`imgmeta`](https://docs.rs/imgmeta).
//!
//! These are split out so the tables can be reused without pulling in any of
//! the parsing machinery:
//!
//! - [`exif`]: IFD groups, primitive types, and per-group tag tables.
//! - [`iptc`]: IIM records and their datasets.
//! - [`xmp`]: namespace prefixes and the array kinds of well-known properties.

pub mod exif;
pub mod iptc;
pub mod xmp;
