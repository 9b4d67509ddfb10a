use winnow::{Parser as _, binary::le_u32, error::EmptyError, token::literal};

/// The 12 bytes every WebP starts with: `RIFF`, a size, then `WEBP`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RiffHeader {
    /// Bytes after this field: `WEBP` and every chunk.
    pub riff_size: u32,
}

impl RiffHeader {
    /// How many chunk bytes the header claims, not counting `WEBP`.
    pub fn chunks_len(&self) -> usize {
        (self.riff_size as usize).saturating_sub(4)
    }
}

/// Reads the header, leaving `input` at the first chunk.
///
/// A size too small to hold `WEBP` is rejected.
pub fn riff_header(input: &mut &[u8]) -> Result<RiffHeader, EmptyError> {
    let (_, riff_size, _) = (literal(b"RIFF"), le_u32, literal(b"WEBP")).parse_next(input)?;

    if riff_size < 4 {
        log::error!("RIFF size `{riff_size}` can't even hold `WEBP`.");
        return Err(EmptyError);
    }

    Ok(RiffHeader { riff_size })
}
