use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::bitplane::{BitplaneLayout, BitplaneWriter, MAX_PLANES, planar_len};
use crate::decode::check_dimensions;
use crate::error::BitplaneError;
use crate::limits::Limits;
use crate::packbits;
use crate::palette::IndexedPalette;
use crate::pixel::RgbaIndexReader;

/// RGBA8 → planar data encode, configured builder-style.
///
/// ```
/// use zenbitplanes::{EncodeRequest, IndexedPalette, Unstoppable};
///
/// let mut palette = IndexedPalette::new(2, 8)?;
/// palette.set_rgb(1, 255, 255, 255)?;
/// let pixels = [255u8; 16 * 4]; // one white row
/// let planar = EncodeRequest::new(&palette).encode(&pixels, 16, 1, Unstoppable)?;
/// assert_eq!(planar, [0xFF, 0xFF]);
/// # Ok::<(), zenbitplanes::BitplaneError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    palette: &'a IndexedPalette,
    layout: BitplaneLayout,
    planes: Option<u8>,
    stored_width: Option<u32>,
    packbits: bool,
    limits: Option<&'a Limits>,
}

impl<'a> EncodeRequest<'a> {
    /// Encode against `palette`, word-interleaved by default.
    pub fn new(palette: &'a IndexedPalette) -> Self {
        Self {
            palette,
            layout: BitplaneLayout::default(),
            planes: None,
            stored_width: None,
            packbits: false,
            limits: None,
        }
    }

    pub fn with_layout(mut self, layout: BitplaneLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Override the plane count, which otherwise is the fewest planes that
    /// address every palette entry.
    pub fn with_planes(mut self, planes: u8) -> Self {
        self.planes = Some(planes);
        self
    }

    /// Store rows `stored_width` pixels wide; the padding pixels are left as
    /// index 0.
    pub fn with_stored_width(mut self, stored_width: u32) -> Self {
        self.stored_width = Some(stored_width);
        self
    }

    /// Packbits-compress the planar data in independent chunks of
    /// `stored_width / 8` bytes. With [`BitplaneLayout::LineInterleaved`]
    /// each chunk is one plane's scanline (Degas Elite style); with the
    /// other layouts chunks follow the byte order and may span planes.
    pub fn with_packbits(mut self, packbits: bool) -> Self {
        self.packbits = packbits;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Encode `width` x `height` RGBA8 pixels.
    ///
    /// Every pixel must be exactly one of the palette's colors once the
    /// palette is resampled to 8 bits per channel.
    pub fn encode(
        self,
        pixels: &[u8],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, BitplaneError> {
        let stored_width = self.stored_width.unwrap_or(width);
        check_dimensions(width, height, stored_width)?;

        let colors = self.palette.len();
        let planes = self.planes.unwrap_or_else(|| planes_for_colors(colors));
        if planes == 0 || planes > MAX_PLANES {
            return Err(BitplaneError::InvalidPlaneCount {
                planes: usize::from(planes),
            });
        }
        if colors > 1 << planes {
            return Err(BitplaneError::TooManyColors { colors, planes });
        }

        let limits = self.limits.cloned().unwrap_or_default();
        // The stored width sizes the planar buffer.
        limits.check_dimensions(stored_width, height)?;
        let needed = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or(BitplaneError::DimensionsTooLarge { width, height })?;
        if pixels.len() < needed {
            return Err(BitplaneError::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }
        let size = planar_len(planes, stored_width, height).ok_or(
            BitplaneError::DimensionsTooLarge {
                width: stored_width,
                height,
            },
        )?;
        limits.check_allocation("planar buffer", size)?;

        tracing::debug!(
            width,
            height,
            stored_width,
            planes,
            layout = ?self.layout,
            packbits = self.packbits,
            "encoding bitplanes"
        );

        let geometry = self.layout.geometry(planes, stored_width, height)?;
        let mut planar = vec![0u8; size];
        let mut writer = BitplaneWriter::new(&mut planar, geometry);
        let mut reader = RgbaIndexReader::new(&pixels[..needed], self.palette)?;
        let padding = (stored_width - width) as usize;

        for row in 0..height {
            if row % 16 == 0 {
                stop.check()?;
            }
            for _ in 0..width {
                writer.write(reader.read()?)?;
            }
            writer.advance(padding);
        }

        if !self.packbits {
            return Ok(planar);
        }
        stop.check()?;
        limits.check_allocation("packbits buffer", packbits::max_encoded_len(size))?;
        packbits::encode_rows(&planar, stored_width as usize / 8)
    }
}

/// Fewest planes whose indices reach every one of `colors` entries, at
/// least one.
fn planes_for_colors(colors: usize) -> u8 {
    let bits = usize::BITS - colors.saturating_sub(1).leading_zeros();
    // Clamp so oversized palettes surface as TooManyColors.
    bits.clamp(1, u32::from(MAX_PLANES)) as u8
}
