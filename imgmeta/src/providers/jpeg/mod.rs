//! JPEG is an older image format designed with old-school compression in mind.
//!
//! It uses an unfortunate internal structure that's difficult to parse and
//! edit, so this crate treads lightly: marker segments before the first scan
//! are kept as a list, and everything after is copied through untouched.

use crate::{
    error::CodecError,
    providers::{Provider, Rewrite},
};

mod error;
mod irb;
mod parse;
mod write;

pub use error::{IrbError, JpegConstructionError};

/// Marker for `APP0` (JFIF).
const APP0_MARKER_CODE: u8 = 0xE0;

/// A marker code indicating that an APP1 marker is present.
const APP1_MARKER_CODE: u8 = 0xE1;

/// `APP2` carries ICC profiles.
const APP2_MARKER_CODE: u8 = 0xE2;

/// `APP13` carries Photoshop resource blocks.
const APP13_MARKER_CODE: u8 = 0xED;

const EXIF_SIG: &[u8] = b"Exif\0\0";
const XMP_SIG: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
const ICC_SIG: &[u8] = b"ICC_PROFILE\0";

/// One marker segment before the image data.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Segment {
    marker_code: u8,

    /// `None` for standalone markers.
    payload: Option<Vec<u8>>,
}

impl Segment {
    fn app_body(&self, marker_code: u8, signature: &[u8]) -> Option<&[u8]> {
        if self.marker_code != marker_code {
            return None;
        }
        self.payload.as_deref()?.strip_prefix(signature)
    }

    fn is_exif(&self) -> bool {
        self.app_body(APP1_MARKER_CODE, EXIF_SIG).is_some()
    }

    fn is_xmp(&self) -> bool {
        self.app_body(APP1_MARKER_CODE, XMP_SIG).is_some()
    }

    fn is_start_of_frame(&self) -> bool {
        matches!(self.marker_code, 0xC0..=0xCF) && ![0xC4, 0xC8, 0xCC].contains(&self.marker_code)
    }

    /// Resource blocks, when this is a readable Photoshop segment.
    fn photoshop_blocks(&self) -> Option<Vec<irb::IrbBlock>> {
        let body = self.app_body(APP13_MARKER_CODE, irb::PHOTOSHOP_SIG)?;
        irb::parse_blocks(body)
            .inspect_err(|e| log::warn!("Keeping unreadable APP13 segment as-is. err: {e}"))
            .ok()
    }
}

/// A JPEG file.
#[derive(Clone, Debug)]
pub struct Jpeg {
    segments: Vec<Segment>,

    /// The first scan and everything after it.
    tail: Vec<u8>,

    dimensions: Option<(u32, u32)>,

    /// IPTC from every Photoshop segment, concatenated.
    iptc: Option<Vec<u8>>,
}

impl Jpeg {
    fn from_parts(segments: Vec<Segment>, tail: Vec<u8>) -> Self {
        let dimensions = segments
            .iter()
            .find(|s| s.is_start_of_frame())
            .and_then(|s| s.payload.as_deref())
            .and_then(parse::frame_dimensions);

        let iptc: Vec<u8> = segments
            .iter()
            .filter_map(Segment::photoshop_blocks)
            .flatten()
            .filter(|b| b.id == irb::IPTC_RESOURCE_ID)
            .flat_map(|b| b.data)
            .collect();

        if segments.iter().filter(|s| s.is_exif()).count() > 1 {
            log::warn!("Found more than one Exif payload in JPEG. Using the first.");
        }

        Self {
            segments,
            tail,
            dimensions,
            iptc: (!iptc.is_empty()).then_some(iptc),
        }
    }
}

impl Provider for Jpeg {
    type ConstructionError = JpegConstructionError;

    fn magic_number(input: &[u8]) -> bool {
        input.starts_with(&[0xFF, parse::SOI_MARKER_CODE, 0xFF])
    }

    fn new(input: &[u8]) -> Result<Self, Self::ConstructionError> {
        parse::parse(input)
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    fn icc_profile(&self) -> Option<Vec<u8>> {
        // `[sequence number, chunk count, data...]`
        let mut chunks: Vec<(u8, &[u8])> = self
            .segments
            .iter()
            .filter_map(|s| s.app_body(APP2_MARKER_CODE, ICC_SIG))
            .filter_map(|body| match body {
                [sequence, _count, data @ ..] => Some((*sequence, data)),
                _ => None,
            })
            .collect();
        chunks.sort_by_key(|(sequence, _)| *sequence);

        let profile: Vec<u8> = chunks.into_iter().flat_map(|(_, d)| d).copied().collect();
        (!profile.is_empty()).then_some(profile)
    }

    fn exif_raw(&self) -> Option<&[u8]> {
        self.segments
            .iter()
            .find_map(|s| s.app_body(APP1_MARKER_CODE, EXIF_SIG))
    }

    fn iptc_raw(&self) -> Option<&[u8]> {
        self.iptc.as_deref()
    }

    fn xmp_raw(&self) -> Option<&[u8]> {
        self.segments
            .iter()
            .find_map(|s| s.app_body(APP1_MARKER_CODE, XMP_SIG))
    }

    fn supports_iptc(&self) -> bool {
        true
    }

    fn rebuild(&self, rewrite: &Rewrite<'_>) -> Result<Vec<u8>, CodecError> {
        write::rebuild(self, rewrite)
    }
}
