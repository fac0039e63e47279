//! Indexed color palettes with a configurable per-channel bit depth.
//!
//! Legacy machines stored far fewer than 8 bits per channel: 3 on the
//! Atari ST, 4 on the STE and Amiga OCS. An [`IndexedPalette`] keeps colors
//! at their native depth and converts with [`IndexedPalette::resample`].

pub mod atari;

use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::BitplaneError;

/// Largest supported channel depth.
pub const MAX_BITS_PER_CHANNEL: u8 = 8;

/// One palette entry. Channel values are bounded by the owning palette's
/// bit depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack an 8-bit/channel `0xRRGGBBAA` word.
    pub const fn from_rgba_u32(rgba: u32) -> Self {
        let [r, g, b, a] = rgba.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Pack as an 8-bit/channel `0xRRGGBBAA` word.
    pub const fn to_rgba_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGBA8> for Color {
    fn from(px: rgb::RGBA8) -> Self {
        Self::new(px.r, px.g, px.b, px.a)
    }
}

#[cfg(feature = "rgb")]
impl From<Color> for rgb::RGBA8 {
    fn from(c: Color) -> Self {
        rgb::RGBA8::new(c.r, c.g, c.b, c.a)
    }
}

/// Fixed-length, ordered color table.
///
/// Every write clamps each channel to `0..=2^bits_per_channel - 1`. New
/// entries start as opaque black.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedPalette {
    colors: Vec<Color>,
    bits_per_channel: u8,
}

impl IndexedPalette {
    /// Create a palette of `length` opaque black entries.
    ///
    /// Fails with [`BitplaneError::UnsupportedBitDepth`] unless
    /// `bits_per_channel` is in `1..=8`.
    pub fn new(length: usize, bits_per_channel: u8) -> Result<Self, BitplaneError> {
        let max = channel_max(bits_per_channel)?;
        Ok(Self {
            colors: vec![Color::new(0, 0, 0, max); length],
            bits_per_channel,
        })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn bits_per_channel(&self) -> u8 {
        self.bits_per_channel
    }

    /// Largest value a channel can hold at this palette's depth.
    pub fn max_channel_value(&self) -> u8 {
        max_for_bits(self.bits_per_channel)
    }

    /// Set an entry, clamping every channel into range.
    pub fn set_color(
        &mut self,
        index: usize,
        r: u32,
        g: u32,
        b: u32,
        a: u32,
    ) -> Result<(), BitplaneError> {
        let max = u32::from(self.max_channel_value());
        let len = self.colors.len();
        let slot = self
            .colors
            .get_mut(index)
            .ok_or(BitplaneError::PaletteIndexOutOfRange { index, len })?;
        // min() bounds every channel by max <= 255, so the casts are lossless.
        *slot = Color::new(
            r.min(max) as u8,
            g.min(max) as u8,
            b.min(max) as u8,
            a.min(max) as u8,
        );
        Ok(())
    }

    /// Set an opaque entry (alpha at the channel maximum).
    pub fn set_rgb(&mut self, index: usize, r: u32, g: u32, b: u32) -> Result<(), BitplaneError> {
        let a = u32::from(self.max_channel_value());
        self.set_color(index, r, g, b, a)
    }

    pub fn color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    /// Return a copy of this palette scaled to `bits_per_channel`.
    ///
    /// Each channel becomes `round(c * new_max / old_max)`, rounding half
    /// up, then goes through the same clamp as [`set_color`](Self::set_color).
    /// Scaling up and back down reproduces the original exactly.
    pub fn resample(&self, bits_per_channel: u8) -> Result<IndexedPalette, BitplaneError> {
        let new_max = u32::from(channel_max(bits_per_channel)?);
        let old_max = u32::from(self.max_channel_value());
        let scale = |c: u8| (u32::from(c) * new_max + old_max / 2) / old_max;

        let mut out = IndexedPalette::new(self.len(), bits_per_channel)?;
        for (index, c) in self.colors.iter().enumerate() {
            out.set_color(index, scale(c.r), scale(c.g), scale(c.b), scale(c.a))?;
        }
        Ok(out)
    }

    /// Pack every color into one integer: R in the most significant field,
    /// then G, B and (when `alpha`) A, each `bits_per_channel` wide.
    ///
    /// The field width must be at least the palette depth and small enough
    /// for all fields to fit in 32 bits.
    pub fn to_value_array(
        &self,
        bits_per_channel: u8,
        alpha: bool,
    ) -> Result<Vec<u32>, BitplaneError> {
        let fields = if alpha { 4 } else { 3 };
        if bits_per_channel < self.bits_per_channel
            || u32::from(bits_per_channel) * fields > u32::BITS
        {
            return Err(BitplaneError::UnsupportedBitDepth {
                bits: bits_per_channel,
            });
        }
        let shift = u32::from(bits_per_channel);
        Ok(self
            .colors
            .iter()
            .map(|c| {
                let rgb = (u32::from(c.r) << (shift * 2))
                    | (u32::from(c.g) << shift)
                    | u32::from(c.b);
                if alpha {
                    (rgb << shift) | u32::from(c.a)
                } else {
                    rgb
                }
            })
            .collect())
    }

    /// Build an 8-bit/channel palette from `0xRRGGBBAA` words.
    pub fn from_value_array(colors: &[u32]) -> Self {
        Self {
            colors: colors.iter().map(|&v| Color::from_rgba_u32(v)).collect(),
            bits_per_channel: 8,
        }
    }

    /// Build an 8-bit/channel palette of the distinct colors in a flat RGBA8
    /// buffer, in the order they first appear.
    pub fn from_image_data(pixels: &[u8]) -> Result<Self, BitplaneError> {
        if pixels.len() % 4 != 0 {
            return Err(BitplaneError::InvalidData(alloc::format!(
                "RGBA buffer length {} is not a multiple of 4",
                pixels.len()
            )));
        }
        let mut seen = BTreeSet::new();
        let unique: Vec<u32> = pixels
            .chunks_exact(4)
            .map(|px| u32::from_be_bytes([px[0], px[1], px[2], px[3]]))
            .filter(|&v| seen.insert(v))
            .collect();
        Ok(Self::from_value_array(&unique))
    }
}

impl<'a> IntoIterator for &'a IndexedPalette {
    type Item = &'a Color;
    type IntoIter = core::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

const fn max_for_bits(bits: u8) -> u8 {
    ((1u16 << bits) - 1) as u8
}

fn channel_max(bits: u8) -> Result<u8, BitplaneError> {
    if (1..=MAX_BITS_PER_CHANNEL).contains(&bits) {
        Ok(max_for_bits(bits))
    } else {
        Err(BitplaneError::UnsupportedBitDepth { bits })
    }
}
