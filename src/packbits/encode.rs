use alloc::vec;
use alloc::vec::Vec;

use super::{MAX_SPAN, max_encoded_len};
use crate::error::BitplaneError;

/// Compress `src` into `dst`, returning the number of bytes written.
///
/// Two or more equal bytes become a run; everything else is gathered into
/// literal spans. `dst` must hold [`max_encoded_len`]`(src.len())` bytes or
/// the call fails with [`BitplaneError::BufferTooSmall`] before writing.
pub fn encode(src: &[u8], dst: &mut [u8]) -> Result<usize, BitplaneError> {
    let needed = max_encoded_len(src.len());
    if dst.len() < needed {
        return Err(BitplaneError::BufferTooSmall {
            needed,
            actual: dst.len(),
        });
    }

    let mut pos = 0;
    let mut out = 0;
    while pos < src.len() {
        let byte = src[pos];
        let run = src[pos..]
            .iter()
            .take(MAX_SPAN)
            .take_while(|&&b| b == byte)
            .count();

        if run >= 2 {
            // 1 - run, for run in 2..=128
            dst[out] = (1 - run as i16) as i8 as u8;
            dst[out + 1] = byte;
            out += 2;
            pos += run;
            continue;
        }

        let len = literal_len(&src[pos..]);
        dst[out] = (len - 1) as u8;
        dst[out + 1..out + 1 + len].copy_from_slice(&src[pos..pos + len]);
        out += 1 + len;
        pos += len;
    }
    Ok(out)
}

/// Length of the literal span at the start of `src`, whose first two bytes
/// differ (or which holds a single byte). The span stops before the first
/// pair of equal neighbours so that pair can start a run.
fn literal_len(src: &[u8]) -> usize {
    let limit = src.len().min(MAX_SPAN);
    let mut len = 1;
    while len < limit {
        if len + 1 < src.len() && src[len] == src[len + 1] {
            break;
        }
        len += 1;
    }
    len
}

/// Compress `src` into a new, exactly sized buffer.
pub fn encode_to_vec(src: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; max_encoded_len(src.len())];
    let written = encode_spans(src, &mut dst);
    dst.truncate(written);
    dst
}

/// Compress `src` one `row_len`-byte row at a time so that no run or
/// literal span crosses a row boundary.
///
/// Degas Elite decompresses into a single scanline buffer and faults on
/// spans that straddle rows. A trailing partial row is compressed on its
/// own.
pub fn encode_rows(src: &[u8], row_len: usize) -> Result<Vec<u8>, BitplaneError> {
    if row_len == 0 {
        return Err(BitplaneError::InvalidDimensions(
            "packbits row length is zero".into(),
        ));
    }
    let mut out = Vec::with_capacity(max_encoded_len(src.len()));
    let mut row_buf = vec![0u8; max_encoded_len(row_len)];
    for row in src.chunks(row_len) {
        let written = encode_spans(row, &mut row_buf);
        out.extend_from_slice(&row_buf[..written]);
    }
    tracing::trace!(
        input = src.len(),
        output = out.len(),
        row_len,
        "packbits encoded rows"
    );
    Ok(out)
}

/// [`encode`] into a buffer already sized with [`max_encoded_len`].
fn encode_spans(src: &[u8], dst: &mut [u8]) -> usize {
    // dst is sized by every caller, so the size check cannot fail.
    encode(src, dst).unwrap_or_default()
}
