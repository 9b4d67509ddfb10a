use winnow::{
    Parser,
    binary::{be_u16, u8},
    error::EmptyError,
    token::take,
};

use super::{Jpeg, JpegConstructionError, Segment};

/// The first marker code, `SOI` (start of image).
pub(super) const SOI_MARKER_CODE: u8 = 0xD8;

/// The last marker code, `EOI` (end of image).
const EOI_MARKER_CODE: u8 = 0xD9;

/// The start of scan code, `SOS`.
const SOS_MARKER_CODE: u8 = 0xDA;

/// One marker, with the length of its payload if it has one.
enum Marker {
    Standalone(u8),

    /// `len` doesn't count the two length bytes.
    Segment { code: u8, len: u16 },
}

/// Markers that carry no length or payload: `RSTn`, `SOI`, `EOI` and `TEM`.
fn is_standalone(code: u8) -> bool {
    matches!(code, 0xD0..=0xD9 | 0x01)
}

/// Attempts to parse a JPEG file.
///
/// Everything from the first scan onward is kept verbatim. Metadata after
/// the image data isn't looked at.
pub fn parse(original: &[u8]) -> Result<Jpeg, JpegConstructionError> {
    let input: &mut &[u8] = &mut &*original;

    let offset = |input: &[u8]| original.len() - input.len();

    match marker(input, 0)? {
        Marker::Standalone(SOI_MARKER_CODE) => (),
        Marker::Standalone(found) | Marker::Segment { code: found, .. } => {
            log::error!("JPEG starts with marker `0x{found:02X}`, not `SOI`.");
            return Err(JpegConstructionError::MissingSoi { found });
        }
    };

    let mut segments: Vec<Segment> = Vec::new();
    let mut tail: Vec<u8> = Vec::new();

    // loop until the image data.
    while !input.is_empty() {
        let start = offset(*input);

        match marker(input, start)? {
            Marker::Standalone(EOI_MARKER_CODE) => {
                log::warn!("EOI before any image data. Stopping loop.");
                tail = original[start..].to_vec();
                break;
            }

            Marker::Standalone(marker_code) => {
                log::trace!("Standalone marker `0x{marker_code:02X}` at byte `{start}`.");
                segments.push(Segment {
                    marker_code,
                    payload: None,
                });
            }

            // the scan's entropy-coded data isn't length-prefixed, so we keep
            // it (and anything after it) as one blob
            Marker::Segment {
                code: SOS_MARKER_CODE,
                ..
            } => {
                log::trace!("SOS found at byte `{start}`. Keeping the rest verbatim.");
                tail = original[start..].to_vec();
                break;
            }

            Marker::Segment {
                code: marker_code,
                len,
            } => {
                log::trace!("Segment `0x{marker_code:02X}` at byte `{start}`, `{len}` bytes.");

                let remaining = input.len();
                let payload: &[u8] = take(len as usize)
                    .parse_next(input)
                    .map_err(|_: EmptyError| {
                        log::error!(
                            "Segment `0x{marker_code:02X}` at byte `{start}` needs `{len}` \
                            bytes, but only `{remaining}` are left."
                        );
                        JpegConstructionError::PayloadOverrun {
                            at: start,
                            code: marker_code,
                            len,
                            remaining,
                        }
                    })?;

                segments.push(Segment {
                    marker_code,
                    payload: Some(payload.to_vec()),
                });
            }
        }
    }

    if tail.is_empty() {
        log::warn!("JPEG ended without image data.");
    }

    Ok(Jpeg::from_parts(segments, tail))
}

/// Reads `(width, height)` from a start-of-frame payload.
pub(super) fn frame_dimensions(payload: &[u8]) -> Option<(u32, u32)> {
    let input = &mut &*payload;
    let (_precision, height, width) = (u8, be_u16, be_u16)
        .parse_next(input)
        .map_err(|_: EmptyError| log::warn!("Start-of-frame segment is too short."))
        .ok()?;

    Some((u32::from(width), u32::from(height)))
}

/// Reads one marker starting at byte `at`.
///
/// Fill bytes (extra `0xFF`s) before the code are skipped.
fn marker(input: &mut &[u8], at: usize) -> Result<Marker, JpegConstructionError> {
    let end = |_: EmptyError| {
        log::error!("JPEG ended inside the marker at byte `{at}`.");
        JpegConstructionError::UnexpectedEnd { at }
    };

    let found = u8.parse_next(input).map_err(end)?;
    if found != 0xFF {
        log::error!("Expected a marker at byte `{at}`, found `0x{found:02X}`.");
        return Err(JpegConstructionError::ExpectedMarker { at, found });
    }

    let mut code = u8.parse_next(input).map_err(end)?;
    while code == 0xFF {
        code = u8.parse_next(input).map_err(end)?;
    }

    if code == 0x00 {
        log::error!("Marker at byte `{at}` has the reserved code `0x00`.");
        return Err(JpegConstructionError::BadMarkerCode { at, code });
    }

    if is_standalone(code) {
        return Ok(Marker::Standalone(code));
    }

    let len = be_u16.parse_next(input).map_err(end)?;
    match len.checked_sub(2) {
        Some(len) => Ok(Marker::Segment { code, len }),
        None => {
            log::error!("Segment `0x{code:02X}` at byte `{at}` has length `{len}`.");
            Err(JpegConstructionError::LengthTooSmall { at, code, len })
        }
    }
}
