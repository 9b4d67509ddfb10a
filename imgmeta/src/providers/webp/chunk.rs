use winnow::{
    ModalResult, Parser as _,
    binary::le_u32,
    error::{ContextError, EmptyError},
    token::take,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiffChunk {
    pub fourcc: [u8; 4],
    pub data: Vec<u8>,
}

impl RiffChunk {
    pub fn new(fourcc: &[u8; 4], data: Vec<u8>) -> Self {
        Self {
            fourcc: *fourcc,
            data,
        }
    }

    /// Size on disk, including the header and any padding byte.
    pub fn stored_len(&self) -> usize {
        8 + self.data.len().next_multiple_of(2)
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.fourcc);
        out.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.data);
        if self.data.len() % 2 == 1 {
            out.push(0);
        }
    }
}

/// Parses out a chunk of the RIFF data.
///
/// The format in WebP is simple:
///
/// - let fourcc = input.read(4)
/// - let len = input.read_u32()
/// - let data = input.read(chunk_len)
///
/// Odd-sized chunks are followed by a padding byte, which is consumed here
/// too. A missing pad at the very end of the file is tolerated.
pub fn chunk(input: &mut &[u8]) -> ModalResult<RiffChunk, ContextError> {
    // grab the chunk identifier (fourcc)
    let fourcc: [u8; 4] = take(4_usize)
        .try_map(<[u8; 4]>::try_from)
        .parse_next(input)?;

    // see how long the chunk is
    let len: u32 = le_u32.parse_next(input)?;
    let data: &[u8] = take(len).parse_next(input)?;

    if len % 2 == 1 && !input.is_empty() {
        log::trace!("Skipping a padding byte after `{fourcc:x?}`.");
        _ = take::<_, _, EmptyError>(1_usize).void().parse_next(input);
    }

    Ok(RiffChunk {
        fourcc,
        data: data.to_vec(),
    })
}
