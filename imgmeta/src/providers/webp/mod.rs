//! WebP is a RIFF container: a header, then a list of tagged chunks.
//!
//! Metadata lives in the `EXIF`, `XMP ` and `ICCP` chunks, which are only
//! allowed in the "extended" format announced by a `VP8X` chunk. WebP has no
//! place for IPTC.

use winnow::{
    Parser as _,
    binary::{le_u16, le_u24, le_u32, u8},
    error::EmptyError,
    token::take,
};

use self::chunk::RiffChunk;
use crate::{
    error::CodecError,
    providers::{Provider, Rewrite},
};

mod chunk;
mod error;
mod header;
mod write;

pub use error::WebpConstructionError;

const VP8X: &[u8; 4] = b"VP8X";
const VP8: &[u8; 4] = b"VP8 ";
const VP8L: &[u8; 4] = b"VP8L";
const ANMF: &[u8; 4] = b"ANMF";
const ICCP: &[u8; 4] = b"ICCP";
const EXIF: &[u8; 4] = b"EXIF";
const XMP: &[u8; 4] = b"XMP ";

/// Some writers keep JPEG's APP1 signature in the `EXIF` chunk.
const EXIF_SIG: &[u8] = b"Exif\0\0";

#[derive(Clone, Debug)]
pub struct Webp {
    chunks: Vec<RiffChunk>,
    dimensions: Option<(u32, u32)>,
}

impl Webp {
    fn chunk(&self, fourcc: &[u8; 4]) -> Option<&RiffChunk> {
        self.chunks.iter().find(|c| &c.fourcc == fourcc)
    }
}

impl Provider for Webp {
    type ConstructionError = WebpConstructionError;

    fn magic_number(input: &[u8]) -> bool {
        input.len() >= 12 && &input[0..4] == b"RIFF" && &input[8..12] == b"WEBP"
    }

    fn new(input: &[u8]) -> Result<Self, Self::ConstructionError> {
        let mut input = input;

        let header =
            header::riff_header(&mut input).map_err(|_| WebpConstructionError::NoHeader)?;

        // anything past the RIFF size isn't ours
        let riff_len = header.chunks_len();
        if input.len() > riff_len {
            log::warn!(
                "Ignoring `{}` bytes after the RIFF data.",
                input.len() - riff_len
            );
            input = &input[..riff_len];
        }

        let mut chunks: Vec<RiffChunk> = Vec::new();
        while !input.is_empty() {
            match chunk::chunk(&mut input) {
                Ok(c) => {
                    log::trace!("Found `{:?}` chunk.", String::from_utf8_lossy(&c.fourcc));
                    chunks.push(c);
                }
                Err(e) => {
                    log::error!(
                        "Invalid RIFF chunk in WebP file! Keeping the chunks \
                        before it. err: {e}"
                    );
                    break;
                }
            }
        }

        // all WebPs should have at least one chunk
        if chunks.is_empty() {
            return Err(WebpConstructionError::NoChunks);
        }

        if !chunks
            .iter()
            .any(|c| [VP8, VP8L, ANMF].contains(&&c.fourcc))
        {
            log::error!("WebP file has no image data.");
            return Err(WebpConstructionError::NoImageData);
        }

        if chunks.iter().any(|c| &c.fourcc == VP8X && c.data.len() < 10) {
            return Err(WebpConstructionError::MalformedExtendedHeader);
        }

        let dimensions = chunks.iter().find_map(dimensions_of);
        Ok(Self { chunks, dimensions })
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    fn icc_profile(&self) -> Option<Vec<u8>> {
        self.chunk(ICCP)
            .filter(|c| !c.data.is_empty())
            .map(|c| c.data.clone())
    }

    fn exif_raw(&self) -> Option<&[u8]> {
        let data = self.chunk(EXIF)?.data.as_slice();
        Some(data.strip_prefix(EXIF_SIG).unwrap_or(data))
    }

    fn iptc_raw(&self) -> Option<&[u8]> {
        None
    }

    fn xmp_raw(&self) -> Option<&[u8]> {
        self.chunk(XMP).map(|c| c.data.as_slice())
    }

    fn supports_iptc(&self) -> bool {
        false
    }

    fn rebuild(&self, rewrite: &Rewrite<'_>) -> Result<Vec<u8>, CodecError> {
        write::rebuild(self, rewrite)
    }
}

/// Reads the canvas or frame size from a chunk that has one.
fn dimensions_of(chunk: &RiffChunk) -> Option<(u32, u32)> {
    let input = &mut chunk.data.as_slice();

    let found = match &chunk.fourcc {
        // flags, 3 reserved bytes, then 24-bit `size - 1`s
        b"VP8X" => (take(4_usize), le_u24, le_u24)
            .parse_next(input)
            .map(|(_, w, h): (&[u8], u32, u32)| (w + 1, h + 1)),

        // frame tag, start code, then 14-bit sizes
        b"VP8 " => (take(6_usize), le_u16, le_u16)
            .parse_next(input)
            .map(|(_, w, h): (&[u8], u16, u16)| (u32::from(w & 0x3fff), u32::from(h & 0x3fff))),

        // signature, then two 14-bit `size - 1`s
        b"VP8L" => (u8, le_u32)
            .parse_next(input)
            .map(|(_, bits): (u8, u32)| ((bits & 0x3fff) + 1, ((bits >> 14) & 0x3fff) + 1)),

        _ => return None,
    };

    found
        .map_err(|_: EmptyError| log::warn!("`{:x?}` chunk is too short for its size.", chunk.fourcc))
        .ok()
}
