use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::BitplaneError;

/// Decompress packbits data into a new buffer of exactly `size` bytes.
///
/// Trailing input after `size` bytes have been produced is ignored.
pub fn decode(src: &[u8], size: usize) -> Result<Vec<u8>, BitplaneError> {
    let mut out = vec![0u8; size];
    decode_into(src, &mut out)?;
    Ok(out)
}

/// Decompress packbits data until `out` is full.
///
/// Returns the number of source bytes consumed, which locates whatever
/// follows the compressed body. Running out of input first is
/// [`BitplaneError::UnexpectedEof`]; a run or literal that would overflow
/// `out` is [`BitplaneError::InvalidData`].
pub fn decode_into(src: &[u8], out: &mut [u8]) -> Result<usize, BitplaneError> {
    let mut src_pos = 0;
    let mut dst_pos = 0;

    while dst_pos < out.len() {
        let control = *src.get(src_pos).ok_or(BitplaneError::UnexpectedEof)? as i8;
        src_pos += 1;

        let (count, literal) = match control {
            -128 => continue,
            n if n < 0 => (1 - isize::from(n), false),
            n => (isize::from(n) + 1, true),
        };
        // count is 1..=128
        let count = count as usize;
        let end = dst_pos + count;
        if end > out.len() {
            return Err(BitplaneError::InvalidData(format!(
                "packbits span of {count} bytes at output offset {dst_pos} overruns {} byte buffer",
                out.len()
            )));
        }

        if literal {
            let bytes = src
                .get(src_pos..src_pos + count)
                .ok_or(BitplaneError::UnexpectedEof)?;
            out[dst_pos..end].copy_from_slice(bytes);
            src_pos += count;
        } else {
            let byte = *src.get(src_pos).ok_or(BitplaneError::UnexpectedEof)?;
            out[dst_pos..end].fill(byte);
            src_pos += 1;
        }
        dst_pos = end;
    }

    tracing::trace!(consumed = src_pos, produced = dst_pos, "packbits decoded");
    Ok(src_pos)
}
