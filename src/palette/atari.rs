//! Atari ST/STE hardware palette words.
//!
//! Each entry is a big-endian 16-bit word `0000 rrrr gggg bbbb`. The ST uses
//! the low three bits of each nibble. The STE added a fourth, least
//! significant bit but stores it in the nibble's top bit so ST software
//! still reads a sensible color; decoding rotates it back into place.

use super::IndexedPalette;
use crate::error::BitplaneError;

/// Split a word into its `(r, g, b)` nibbles at bit offsets 8, 4 and 0.
pub const fn parse_4bit_rgb_color(word: u16) -> (u8, u8, u8) {
    (
        ((word >> 8) & 0xF) as u8,
        ((word >> 4) & 0xF) as u8,
        (word & 0xF) as u8,
    )
}

/// Parse an STE word, rotating each nibble's stored top bit down to bit 0.
pub const fn parse_atari_ste_color(word: u16) -> (u8, u8, u8) {
    let (r, g, b) = parse_4bit_rgb_color(word);
    (ste_to_linear(r), ste_to_linear(g), ste_to_linear(b))
}

const fn ste_to_linear(nibble: u8) -> u8 {
    ((nibble & 8) >> 3) | ((nibble << 1) & 0xF)
}

const fn linear_to_ste(value: u8) -> u8 {
    ((value << 3) & 8) | ((value >> 1) & 7)
}

fn palette_words(
    buffer: &[u8],
    colors: usize,
) -> Result<impl Iterator<Item = u16> + '_, BitplaneError> {
    let needed = colors.saturating_mul(2);
    let bytes = buffer.get(..needed).ok_or(BitplaneError::BufferTooSmall {
        needed,
        actual: buffer.len(),
    })?;
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]])))
}

/// Read `colors` STE words as a 4-bit/channel palette.
pub fn create_atari_ste_palette(
    buffer: &[u8],
    colors: usize,
) -> Result<IndexedPalette, BitplaneError> {
    let mut palette = IndexedPalette::new(colors, 4)?;
    for (index, word) in palette_words(buffer, colors)?.enumerate() {
        let (r, g, b) = parse_atari_ste_color(word);
        palette.set_rgb(index, r.into(), g.into(), b.into())?;
    }
    Ok(palette)
}

/// Read `colors` palette words, detecting ST or STE encoding.
///
/// Words are parsed as 3-bit/channel ST colors. If any nibble of any word
/// has bit 3 set the whole buffer is parsed again as STE, producing a
/// 4-bit/channel palette.
pub fn create_atari_st_palette(
    buffer: &[u8],
    colors: usize,
) -> Result<IndexedPalette, BitplaneError> {
    let mut palette = IndexedPalette::new(colors, 3)?;
    for (index, word) in palette_words(buffer, colors)?.enumerate() {
        let (r, g, b) = parse_4bit_rgb_color(word);
        if (r | g | b) & 8 != 0 {
            tracing::debug!(index, word, "STE color bit found, reparsing palette as 4-bit");
            return create_atari_ste_palette(buffer, colors);
        }
        palette.set_rgb(index, r.into(), g.into(), b.into())?;
    }
    Ok(palette)
}

/// Write `palette` as big-endian ST (3-bit) or STE (4-bit) words.
///
/// Other channel depths fail with [`BitplaneError::UnsupportedBitDepth`];
/// resample first.
pub fn write_atari_st_palette(
    buffer: &mut [u8],
    palette: &IndexedPalette,
) -> Result<(), BitplaneError> {
    let encode: fn(u8) -> u8 = match palette.bits_per_channel() {
        3 => |v| v,
        4 => linear_to_ste,
        bits => return Err(BitplaneError::UnsupportedBitDepth { bits }),
    };
    let needed = palette.len() * 2;
    if buffer.len() < needed {
        return Err(BitplaneError::BufferTooSmall {
            needed,
            actual: buffer.len(),
        });
    }
    for (out, c) in buffer.chunks_exact_mut(2).zip(palette.iter()) {
        out[0] = encode(c.r);
        out[1] = (encode(c.g) << 4) | encode(c.b);
    }
    Ok(())
}
