//! Packbits byte run-length compression.
//!
//! Used by Degas Elite compressed pictures and by IFF ILBM `BODY` chunks
//! (compression mode 1, "ByteRun1"). The stream is a sequence of signed
//! control bytes `n`:
//!
//! - `0..=127`: copy the next `n + 1` bytes literally.
//! - `-127..=-1`: repeat the next byte `1 - n` times.
//! - `-128`: no operation.

mod decode;
mod encode;

pub use decode::{decode, decode_into};
pub use encode::{encode, encode_rows, encode_to_vec};

/// Longest literal span or run one control byte can describe.
pub const MAX_SPAN: usize = 128;

/// Worst-case size of [`encode`]'s output for `len` input bytes.
///
/// Each literal span costs one control byte. A span ends at the 128-byte
/// cap, at the end of input, or where a run of two or more bytes starts,
/// so there is at most one span per three input bytes plus a trailing one.
pub const fn max_encoded_len(len: usize) -> usize {
    len + len / 3 + 1
}
