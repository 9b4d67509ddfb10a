//! Photoshop "image resource blocks", as stored in a JPEG's APP13 segment.
//!
//! Each block is `8BIM`, a resource ID, a padded Pascal-string name, and a
//! sized (and padded) payload. IPTC lives in resource `0x0404`.

use winnow::{
    Parser as _,
    binary::{be_u16, be_u32, u8},
    error::EmptyError,
    token::take,
};

use super::error::IrbError;

/// Prefixes an APP13 payload holding resource blocks.
pub(super) const PHOTOSHOP_SIG: &[u8] = b"Photoshop 3.0\0";

/// The resource holding IPTC-IIM datasets.
pub(super) const IPTC_RESOURCE_ID: u16 = 0x0404;

const BLOCK_SIG: &[u8] = b"8BIM";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct IrbBlock {
    pub id: u16,
    pub name: Vec<u8>,
    pub data: Vec<u8>,
}

/// Reads every block in an APP13 payload (after its signature).
pub(super) fn parse_blocks(payload: &[u8]) -> Result<Vec<IrbBlock>, IrbError> {
    let total = payload.len();
    let input = &mut &*payload;
    let mut blocks = Vec::new();

    while !input.is_empty() {
        let at = total - input.len();

        // some writers pad the segment with NULs
        if input.iter().all(|b| *b == 0) {
            log::trace!("Ignoring `{}` bytes of trailing IRB padding.", input.len());
            break;
        }

        let truncated = |_: EmptyError| IrbError::Truncated { at };

        let signature: &[u8] = take(4_usize).parse_next(input).map_err(truncated)?;
        if signature != BLOCK_SIG {
            log::warn!("Resource block at `{at}` has signature `{signature:x?}`.");
            return Err(IrbError::BadSignature { at });
        }

        let id: u16 = be_u16.parse_next(input).map_err(truncated)?;

        // the name and its length byte are padded to an even size
        let name_len: u8 = u8.parse_next(input).map_err(truncated)?;
        let padded_len = (name_len as usize + 1).next_multiple_of(2) - 1;
        let name_field: &[u8] = take(padded_len).parse_next(input).map_err(truncated)?;

        let size: u32 = be_u32.parse_next(input).map_err(truncated)?;
        let data: &[u8] = take(size as usize).parse_next(input).map_err(truncated)?;
        if size % 2 == 1 && !input.is_empty() {
            _ = take::<_, _, EmptyError>(1_usize).void().parse_next(input);
        }

        log::trace!("Found resource block `{id:#06x}` with `{size}` bytes.");
        blocks.push(IrbBlock {
            id,
            name: name_field[..name_len as usize].to_vec(),
            data: data.to_vec(),
        });
    }

    Ok(blocks)
}

/// Serializes blocks, without the `Photoshop 3.0` signature.
pub(super) fn write_blocks(blocks: &[IrbBlock]) -> Vec<u8> {
    let mut out = Vec::new();
    for block in blocks {
        out.extend_from_slice(BLOCK_SIG);
        out.extend_from_slice(&block.id.to_be_bytes());

        let name = &block.name[..block.name.len().min(u8::MAX as usize)];
        out.push(name.len() as u8);
        out.extend_from_slice(name);
        if name.len() % 2 == 0 {
            out.push(0);
        }

        out.extend_from_slice(&(block.data.len() as u32).to_be_bytes());
        out.extend_from_slice(&block.data);
        if block.data.len() % 2 == 1 {
            out.push(0);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{IrbBlock, parse_blocks, write_blocks};
    use crate::{providers::jpeg::error::IrbError, util::logger};

    #[test]
    fn blocks_survive_a_rewrite() {
        logger();

        let blocks = vec![
            IrbBlock {
                id: 0x03ed,
                name: Vec::new(),
                data: vec![0, 72, 0, 1, 0, 72, 0, 1],
            },
            IrbBlock {
                id: 0x0404,
                name: b"iptc".to_vec(),
                data: vec![0x1c, 2, 5, 0, 3, b'c', b'a', b't'],
            },
        ];

        let bytes = write_blocks(&blocks);
        assert_eq!(bytes.len() % 2, 0);
        assert_eq!(parse_blocks(&bytes).unwrap(), blocks);

        // trailing NULs are padding
        let mut padded = bytes.clone();
        padded.extend([0, 0, 0]);
        assert_eq!(parse_blocks(&padded).unwrap(), blocks);
    }

    #[test]
    fn malformed_blocks() {
        logger();

        assert_eq!(
            parse_blocks(b"8BIX\x04\x04\0\0\0\0\0\0"),
            Err(IrbError::BadSignature { at: 0 })
        );
        assert_eq!(
            parse_blocks(b"8BIM\x04\x04\0\0\0\0\0\x10abc"),
            Err(IrbError::Truncated { at: 0 })
        );
    }
}
