//! Translation between flat RGBA8 pixel buffers and palette indices.
//!
//! Both adapters resample their palette to 8 bits per channel and compare
//! packed `0xRRGGBBAA` words, so lookups are exact: a pixel whose color is
//! not in the palette is an error, never a nearest match.

use alloc::vec::Vec;

use crate::bitplane::MAX_PLANES;
use crate::error::BitplaneError;
use crate::palette::IndexedPalette;

const BYTES_PER_PIXEL: usize = 4;

/// Palette as 8-bit/channel `0xRRGGBBAA` words, indexable by `u8`.
fn lookup_table(palette: &IndexedPalette) -> Result<Vec<u32>, BitplaneError> {
    let max_colors = 1usize << MAX_PLANES;
    if palette.len() > max_colors {
        return Err(BitplaneError::TooManyColors {
            colors: palette.len(),
            planes: MAX_PLANES,
        });
    }
    palette.resample(8)?.to_value_array(8, true)
}

/// Walks an RGBA8 buffer, yielding each pixel's palette index.
#[derive(Debug)]
pub struct RgbaIndexReader<'a> {
    pixels: &'a [u8],
    pos: usize,
    lookup: Vec<u32>,
}

impl<'a> RgbaIndexReader<'a> {
    pub fn new(pixels: &'a [u8], palette: &IndexedPalette) -> Result<Self, BitplaneError> {
        Ok(Self {
            pixels,
            pos: 0,
            lookup: lookup_table(palette)?,
        })
    }

    /// Index of the next pixel's color; the first match wins when the
    /// palette holds duplicates.
    pub fn read(&mut self) -> Result<u8, BitplaneError> {
        let end = self.pos.saturating_add(BYTES_PER_PIXEL);
        let px = self
            .pixels
            .get(self.pos..end)
            .ok_or(BitplaneError::OutOfBounds {
                offset: self.pos,
                len: self.pixels.len(),
            })?;
        let color = u32::from_be_bytes([px[0], px[1], px[2], px[3]]);
        let index = self
            .lookup
            .iter()
            .position(|&c| c == color)
            .ok_or(BitplaneError::ColorNotInPalette { color })?;
        self.pos = end;
        // lookup_table caps the palette at 256 entries
        Ok(index as u8)
    }

    /// Skip `pixels` pixels, e.g. to clip a row.
    pub fn advance(&mut self, pixels: usize) {
        self.pos = self
            .pos
            .saturating_add(pixels.saturating_mul(BYTES_PER_PIXEL));
    }

    /// Switch to another palette for the remaining pixels.
    pub fn set_palette(&mut self, palette: &IndexedPalette) -> Result<(), BitplaneError> {
        self.lookup = lookup_table(palette)?;
        Ok(())
    }

    /// True once every pixel has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.pixels.len()
    }
}

/// Fills an RGBA8 buffer from palette indices.
#[derive(Debug)]
pub struct RgbaIndexWriter<'a> {
    pixels: &'a mut [u8],
    pos: usize,
    lookup: Vec<u32>,
}

impl<'a> RgbaIndexWriter<'a> {
    pub fn new(pixels: &'a mut [u8], palette: &IndexedPalette) -> Result<Self, BitplaneError> {
        Ok(Self {
            pixels,
            pos: 0,
            lookup: lookup_table(palette)?,
        })
    }

    /// Store the 8-bit/channel color of palette entry `index` as the next
    /// pixel.
    pub fn write(&mut self, index: u8) -> Result<(), BitplaneError> {
        let color = *self.lookup.get(usize::from(index)).ok_or(
            BitplaneError::PaletteIndexOutOfRange {
                index: usize::from(index),
                len: self.lookup.len(),
            },
        )?;
        let len = self.pixels.len();
        let end = self.pos.saturating_add(BYTES_PER_PIXEL);
        let px = self
            .pixels
            .get_mut(self.pos..end)
            .ok_or(BitplaneError::OutOfBounds {
                offset: self.pos,
                len,
            })?;
        px.copy_from_slice(&color.to_be_bytes());
        self.pos = end;
        Ok(())
    }

    /// Skip `pixels` pixels, leaving them untouched.
    pub fn advance(&mut self, pixels: usize) {
        self.pos = self
            .pos
            .saturating_add(pixels.saturating_mul(BYTES_PER_PIXEL));
    }

    /// Switch to another palette for the remaining pixels.
    pub fn set_palette(&mut self, palette: &IndexedPalette) -> Result<(), BitplaneError> {
        self.lookup = lookup_table(palette)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_color_st() -> IndexedPalette {
        let mut p = IndexedPalette::new(2, 3).unwrap();
        p.set_rgb(0, 0, 0, 0).unwrap();
        p.set_rgb(1, 7, 7, 7).unwrap();
        p
    }

    #[test]
    fn reader_matches_resampled_colors() {
        let pixels = [255, 255, 255, 255, 0, 0, 0, 255, 255, 255, 255, 255];
        let mut reader = RgbaIndexReader::new(&pixels, &two_color_st()).unwrap();
        assert_eq!(reader.read().unwrap(), 1);
        assert_eq!(reader.read().unwrap(), 0);
        assert!(!reader.is_eof());
        assert_eq!(reader.read().unwrap(), 1);
        assert!(reader.is_eof());
        assert!(matches!(reader.read(), Err(BitplaneError::OutOfBounds { .. })));
    }

    #[test]
    fn reader_rejects_unknown_color() {
        let pixels = [254, 255, 255, 255];
        let mut reader = RgbaIndexReader::new(&pixels, &two_color_st()).unwrap();
        assert!(matches!(
            reader.read(),
            Err(BitplaneError::ColorNotInPalette { color: 0xFEFF_FFFF })
        ));
    }

    #[test]
    fn reader_advance_skips_pixels() {
        let pixels = [0xAB, 0, 0, 0, 0, 0, 0, 255];
        let mut reader = RgbaIndexReader::new(&pixels, &two_color_st()).unwrap();
        reader.advance(1);
        assert_eq!(reader.read().unwrap(), 0);
    }

    #[test]
    fn reader_set_palette_rebinds() {
        let pixels = [255, 0, 0, 255, 255, 0, 0, 255];
        let mut reader = RgbaIndexReader::new(&pixels, &two_color_st()).unwrap();
        assert!(reader.read().is_err());
        let red = IndexedPalette::from_value_array(&[0x0000_00FF, 0xFF00_00FF]);
        reader.set_palette(&red).unwrap();
        assert_eq!(reader.read().unwrap(), 1);
    }

    #[test]
    fn writer_emits_8bit_colors() {
        let mut pixels = [0u8; 8];
        let mut writer = RgbaIndexWriter::new(&mut pixels, &two_color_st()).unwrap();
        writer.write(1).unwrap();
        writer.write(0).unwrap();
        assert!(matches!(writer.write(0), Err(BitplaneError::OutOfBounds { .. })));
        assert_eq!(pixels, [255, 255, 255, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn writer_set_palette_and_advance() {
        let mut pixels = [0xAAu8; 12];
        let mut writer = RgbaIndexWriter::new(&mut pixels, &two_color_st()).unwrap();
        writer.write(1).unwrap();
        let red = IndexedPalette::from_value_array(&[0x0000_00FF, 0xFF00_00FF]);
        writer.set_palette(&red).unwrap();
        writer.write(1).unwrap();
        writer.advance(1);
        assert!(matches!(writer.write(0), Err(BitplaneError::OutOfBounds { .. })));
        assert_eq!(
            pixels,
            [255, 255, 255, 255, 255, 0, 0, 255, 0xAA, 0xAA, 0xAA, 0xAA]
        );
    }

    #[test]
    fn writer_advance_leaves_skipped_pixel() {
        let mut pixels = [0x11u8; 12];
        let mut writer = RgbaIndexWriter::new(&mut pixels, &two_color_st()).unwrap();
        writer.write(0).unwrap();
        writer.advance(1);
        writer.write(1).unwrap();
        assert_eq!(&pixels[..4], [0, 0, 0, 255]);
        assert_eq!(&pixels[4..8], [0x11; 4]);
        assert_eq!(&pixels[8..], [255; 4]);
    }

    #[test]
    fn writer_rejects_index_outside_palette() {
        let mut pixels = [0u8; 4];
        let mut writer = RgbaIndexWriter::new(&mut pixels, &two_color_st()).unwrap();
        assert!(matches!(
            writer.write(2),
            Err(BitplaneError::PaletteIndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn oversized_palette_is_rejected() {
        let big = IndexedPalette::new(257, 8).unwrap();
        assert!(matches!(
            RgbaIndexReader::new(&[], &big),
            Err(BitplaneError::TooManyColors { colors: 257, planes: 8 })
        ));
    }
}
