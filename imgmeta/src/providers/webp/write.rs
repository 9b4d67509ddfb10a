use super::{ANMF, EXIF, ICCP, VP8L, VP8X, Webp, XMP, chunk::RiffChunk};
use crate::{
    error::{CodecError, CodecErrorKind},
    providers::{Replacement, Rewrite},
};

// `VP8X` feature flags
const ICC_FLAG: u8 = 0x20;
const ALPHA_FLAG: u8 = 0x10;
const EXIF_FLAG: u8 = 0x08;
const XMP_FLAG: u8 = 0x04;
const ANIMATION_FLAG: u8 = 0x02;

/// Writes the WebP back out with its metadata chunks replaced.
///
/// `EXIF` and `XMP ` chunks move to the end of the file, in that order. A
/// `VP8X` chunk is added when the file needs one, and its flags always match
/// the chunks present.
pub(super) fn rebuild(webp: &Webp, rewrite: &Rewrite<'_>) -> Result<Vec<u8>, CodecError> {
    if let Replacement::Set(_) = rewrite.iptc {
        log::error!("WebP files can't hold IPTC.");
        return Err(CodecError::new(
            CodecErrorKind::Unsupported,
            "Setting IPTC in WebP images is not supported",
        ));
    }

    let chunks: Vec<RiffChunk> = if rewrite.exif == Replacement::Keep
        && rewrite.xmp == Replacement::Keep
    {
        webp.chunks.clone()
    } else {
        let replaced = |fourcc: &[u8; 4], replacement: Replacement<'_>| match replacement {
            Replacement::Keep => webp.chunk(fourcc).cloned(),
            Replacement::Remove => None,
            Replacement::Set(data) => Some(RiffChunk::new(fourcc, data.to_vec())),
        };
        let exif = replaced(EXIF, rewrite.exif);
        let xmp = replaced(XMP, rewrite.xmp);

        let mut chunks: Vec<RiffChunk> = webp
            .chunks
            .iter()
            .filter(|c| &c.fourcc != EXIF && &c.fourcc != XMP)
            .cloned()
            .collect();
        chunks.extend(exif);
        chunks.extend(xmp);
        update_vp8x(webp, &mut chunks)?;
        chunks
    };

    let riff_size: usize = 4 + chunks.iter().map(RiffChunk::stored_len).sum::<usize>();
    let riff_size: u32 = riff_size.try_into().map_err(|_| {
        log::error!("WebP would be `{riff_size}` bytes long.");
        CodecError::new(
            CodecErrorKind::ValueTooLarge,
            "WebP file would be too large",
        )
    })?;

    let mut out = Vec::with_capacity(riff_size as usize + 8);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(b"WEBP");
    for chunk in &chunks {
        chunk.write(&mut out);
    }

    log::trace!("Rebuilt WebP with `{}` chunks.", chunks.len());
    Ok(out)
}

/// Makes the `VP8X` flags match the chunks, adding the chunk if needed.
fn update_vp8x(webp: &Webp, chunks: &mut Vec<RiffChunk>) -> Result<(), CodecError> {
    let has = |fourcc: &[u8; 4]| chunks.iter().any(|c| &c.fourcc == fourcc);

    let old_flags = webp
        .chunk(VP8X)
        .and_then(|c| c.data.first().copied())
        .unwrap_or(0);
    let lossless_alpha = webp
        .chunk(VP8L)
        .and_then(|c| c.data.get(4))
        .is_some_and(|b| b & 0x10 != 0);

    let mut flags = 0;
    if has(ICCP) {
        flags |= ICC_FLAG;
    }
    if old_flags & ALPHA_FLAG != 0 || has(b"ALPH") || lossless_alpha {
        flags |= ALPHA_FLAG;
    }
    if has(EXIF) {
        flags |= EXIF_FLAG;
    }
    if has(XMP) {
        flags |= XMP_FLAG;
    }
    if old_flags & ANIMATION_FLAG != 0 || has(b"ANIM") || has(ANMF) {
        flags |= ANIMATION_FLAG;
    }

    if let Some(vp8x) = chunks.iter_mut().find(|c| &c.fourcc == VP8X) {
        log::trace!("Updating `VP8X` flags from `{old_flags:#04x}` to `{flags:#04x}`.");
        if let Some(first) = vp8x.data.first_mut() {
            *first = flags;
        }
        return Ok(());
    }

    // simple files stay simple
    if flags & !ALPHA_FLAG == 0 {
        return Ok(());
    }

    let Some((width, height)) = webp.dimensions else {
        log::error!("Can't add a `VP8X` chunk without knowing the image size.");
        return Err(CodecError::new(
            CodecErrorKind::WriteFailed,
            "Cannot determine the WebP canvas size",
        ));
    };

    let mut data = vec![flags, 0, 0, 0];
    data.extend_from_slice(&width.saturating_sub(1).to_le_bytes()[..3]);
    data.extend_from_slice(&height.saturating_sub(1).to_le_bytes()[..3]);

    log::debug!("Adding a `VP8X` chunk with flags `{flags:#04x}`.");
    chunks.insert(0, RiffChunk::new(VP8X, data));
    Ok(())
}
