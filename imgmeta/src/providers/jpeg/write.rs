use super::{
    APP0_MARKER_CODE, APP1_MARKER_CODE, APP13_MARKER_CODE, EXIF_SIG, Jpeg, Segment, XMP_SIG,
    irb::{self, IrbBlock},
    parse::SOI_MARKER_CODE,
};
use crate::{
    error::{CodecError, CodecErrorKind},
    providers::{Replacement, Rewrite},
};

/// A segment's length field counts itself, so this is the most it can carry.
const MAX_PAYLOAD_LEN: usize = u16::MAX as usize - 2;

fn app_segment(
    marker_code: u8,
    signature: &[u8],
    body: &[u8],
    what: &str,
) -> Result<Segment, CodecError> {
    let len = signature.len() + body.len();
    if len > MAX_PAYLOAD_LEN {
        log::error!("{what} needs `{len}` bytes, but a JPEG segment holds `{MAX_PAYLOAD_LEN}`.");
        return Err(CodecError::new(
            CodecErrorKind::ValueTooLarge,
            format!("{what} metadata is too large for a JPEG segment"),
        ));
    }

    let mut payload = Vec::with_capacity(len);
    payload.extend_from_slice(signature);
    payload.extend_from_slice(body);
    Ok(Segment {
        marker_code,
        payload: Some(payload),
    })
}

fn photoshop_segment(blocks: &[IrbBlock]) -> Result<Segment, CodecError> {
    app_segment(
        APP13_MARKER_CODE,
        irb::PHOTOSHOP_SIG,
        &irb::write_blocks(blocks),
        "IPTC",
    )
}

/// Writes the JPEG back out with metadata segments replaced.
///
/// Replaced segments keep their position. New ones go right after the
/// leading `APP0`/`APP1` segments, in the order Exif, XMP, IPTC.
pub(super) fn rebuild(jpeg: &Jpeg, rewrite: &Rewrite<'_>) -> Result<Vec<u8>, CodecError> {
    let mut new_exif = match rewrite.exif {
        Replacement::Set(body) => Some(app_segment(APP1_MARKER_CODE, EXIF_SIG, body, "Exif")?),
        _ => None,
    };
    let mut new_xmp = match rewrite.xmp {
        Replacement::Set(body) => Some(app_segment(APP1_MARKER_CODE, XMP_SIG, body, "XMP")?),
        _ => None,
    };
    let mut new_iptc = match rewrite.iptc {
        Replacement::Set(body) => Some(IrbBlock {
            id: irb::IPTC_RESOURCE_ID,
            name: Vec::new(),
            data: body.to_vec(),
        }),
        _ => None,
    };

    let mut segments: Vec<Segment> = Vec::with_capacity(jpeg.segments.len() + 3);
    for segment in &jpeg.segments {
        if segment.is_exif() {
            match rewrite.exif {
                Replacement::Keep => segments.push(segment.clone()),
                Replacement::Remove => log::trace!("Dropping Exif segment."),
                Replacement::Set(_) => segments.extend(new_exif.take()),
            }
            continue;
        }

        if segment.is_xmp() {
            match rewrite.xmp {
                Replacement::Keep => segments.push(segment.clone()),
                Replacement::Remove => log::trace!("Dropping XMP segment."),
                Replacement::Set(_) => segments.extend(new_xmp.take()),
            }
            continue;
        }

        if rewrite.iptc != Replacement::Keep {
            if let Some(blocks) = segment.photoshop_blocks() {
                // other resources (resolution, thumbnails, ...) stay
                let mut blocks: Vec<IrbBlock> = blocks
                    .into_iter()
                    .filter(|b| b.id != irb::IPTC_RESOURCE_ID)
                    .collect();
                blocks.extend(new_iptc.take());

                if blocks.is_empty() {
                    log::trace!("Dropping emptied Photoshop segment.");
                } else {
                    segments.push(photoshop_segment(&blocks)?);
                }
                continue;
            }
        }

        segments.push(segment.clone());
    }

    let new_photoshop = match new_iptc {
        Some(block) => Some(photoshop_segment(&[block])?),
        None => None,
    };

    let mut at = segments
        .iter()
        .take_while(|s| s.marker_code == APP0_MARKER_CODE || s.is_exif() || s.is_xmp())
        .count();
    for segment in [new_exif, new_xmp, new_photoshop].into_iter().flatten() {
        log::debug!("Inserting new segment `{:x?}` at `{at}`.", segment.marker_code);
        segments.insert(at, segment);
        at += 1;
    }

    let payload_len: usize = segments
        .iter()
        .map(|s| 4 + s.payload.as_ref().map_or(0, Vec::len))
        .sum();
    let mut out = Vec::with_capacity(2 + payload_len + jpeg.tail.len());
    out.extend_from_slice(&[0xFF, SOI_MARKER_CODE]);
    for segment in &segments {
        out.extend_from_slice(&[0xFF, segment.marker_code]);
        if let Some(ref payload) = segment.payload {
            out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
            out.extend_from_slice(payload);
        }
    }
    out.extend_from_slice(&jpeg.tail);

    log::trace!("Rebuilt JPEG with `{}` segments.", segments.len());
    Ok(out)
}
