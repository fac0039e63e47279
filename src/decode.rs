use alloc::borrow::Cow;
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::bitplane::{BitplaneLayout, BitplaneReader, planar_len};
use crate::error::BitplaneError;
use crate::limits::Limits;
use crate::packbits;
use crate::palette::IndexedPalette;
use crate::pixel::RgbaIndexWriter;

/// Decoded image: RGBA8 pixels, row-major, no padding.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodeOutput {
    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// View the pixel data as typed RGBA8 pixels.
    #[cfg(feature = "rgb")]
    pub fn as_pixels(&self) -> &[rgb::RGBA8] {
        self.pixels.as_pixels()
    }

    /// Zero-copy view as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::RGBA8> {
        imgref::ImgRef::new(self.as_pixels(), self.width as usize, self.height as usize)
    }

    /// Copy into an [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        imgref::ImgVec::new(
            self.as_pixels().to_vec(),
            self.width as usize,
            self.height as usize,
        )
    }
}

/// Planar data → RGBA8 decode, configured builder-style.
///
/// ```
/// use zenbitplanes::{BitplaneLayout, DecodeRequest, IndexedPalette, Unstoppable};
///
/// let mut palette = IndexedPalette::new(2, 3)?;
/// palette.set_rgb(1, 7, 7, 7)?;
/// let planar = [0xFF, 0x00]; // 16x1, one plane
/// let decoded = DecodeRequest::new(&planar, &palette)
///     .with_layout(BitplaneLayout::LineInterleaved)
///     .decode(16, 1, Unstoppable)?;
/// assert_eq!(&decoded.pixels()[..4], &[255, 255, 255, 255]);
/// assert_eq!(&decoded.pixels()[32..36], &[0, 0, 0, 255]);
/// # Ok::<(), zenbitplanes::BitplaneError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    palette: &'a IndexedPalette,
    layout: BitplaneLayout,
    planes: Option<u8>,
    stored_width: Option<u32>,
    packbits: bool,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    /// Decode `data` with `palette`, word-interleaved by default.
    pub fn new(data: &'a [u8], palette: &'a IndexedPalette) -> Self {
        Self {
            data,
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

    /// Override the plane count, which otherwise is `log2(palette.len())`.
    pub fn with_planes(mut self, planes: u8) -> Self {
        self.planes = Some(planes);
        self
    }

    /// Width of each stored row when it is wider than the image; the extra
    /// pixels at the end of every row are skipped.
    pub fn with_stored_width(mut self, stored_width: u32) -> Self {
        self.stored_width = Some(stored_width);
        self
    }

    /// Treat `data` as packbits-compressed planar data.
    pub fn with_packbits(mut self, packbits: bool) -> Self {
        self.packbits = packbits;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode a `width` x `height` image.
    ///
    /// Only the pixels the image needs are read; extra trailing data is
    /// ignored.
    pub fn decode(
        self,
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<DecodeOutput, BitplaneError> {
        let stored_width = self.stored_width.unwrap_or(width);
        check_dimensions(width, height, stored_width)?;
        let planes = match self.planes {
            Some(planes) => planes,
            None => planes_for_palette(self.palette)?,
        };

        let limits = self.limits.cloned().unwrap_or_default();
        limits.check_dimensions(stored_width, height)?;
        let out_bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or(BitplaneError::DimensionsTooLarge { width, height })?;
        limits.check_allocation("RGBA output", out_bytes)?;

        tracing::debug!(
            width,
            height,
            stored_width,
            planes,
            layout = ?self.layout,
            packbits = self.packbits,
            "decoding bitplanes"
        );

        stop.check()?;
        let planar: Cow<'_, [u8]> = if self.packbits {
            let size = planar_len(planes, stored_width, height).ok_or(
                BitplaneError::DimensionsTooLarge {
                    width: stored_width,
                    height,
                },
            )?;
            limits.check_allocation("planar buffer", size)?;
            Cow::Owned(packbits::decode(self.data, size)?)
        } else {
            Cow::Borrowed(self.data)
        };

        let geometry = self.layout.geometry(planes, stored_width, height)?;
        let mut reader = BitplaneReader::new(&planar, geometry);
        let mut pixels = vec![0u8; out_bytes];
        let mut writer = RgbaIndexWriter::new(&mut pixels, self.palette)?;
        let padding = (stored_width - width) as usize;

        for row in 0..height {
            if row % 16 == 0 {
                stop.check()?;
            }
            for _ in 0..width {
                writer.write(reader.read()?)?;
            }
            reader.advance(padding);
        }

        Ok(DecodeOutput {
            pixels,
            width,
            height,
        })
    }
}

/// Rows are addressed in whole 16-pixel words.
pub(crate) fn check_dimensions(
    width: u32,
    height: u32,
    stored_width: u32,
) -> Result<(), BitplaneError> {
    if width == 0 || height == 0 {
        return Err(BitplaneError::InvalidDimensions(format!(
            "image is {width}x{height}"
        )));
    }
    if stored_width % 16 != 0 {
        return Err(BitplaneError::InvalidDimensions(format!(
            "stored width {stored_width} is not a multiple of 16"
        )));
    }
    if stored_width < width {
        return Err(BitplaneError::InvalidDimensions(format!(
            "stored width {stored_width} is narrower than image width {width}"
        )));
    }
    Ok(())
}

/// Plane count for decoding: the palette must hold exactly `2^planes`
/// colors.
fn planes_for_palette(palette: &IndexedPalette) -> Result<u8, BitplaneError> {
    let len = palette.len();
    if !len.is_power_of_two() {
        return Err(BitplaneError::NotPowerOfTwo { len });
    }
    let planes = len.trailing_zeros();
    u8::try_from(planes)
        .ok()
        .filter(|p| (1..=crate::bitplane::MAX_PLANES).contains(p))
        .ok_or(BitplaneError::InvalidPlaneCount {
            planes: planes as usize,
        })
}
