//! Planar bitmap addressing.
//!
//! A planar image stores bit `k` of every pixel's palette index in plane
//! `k`, eight pixels per byte, most significant bit first. Machines disagree
//! on where the planes sit relative to each other:
//!
//! ```text
//! word-interleaved (Atari ST), 4 planes, 16 pixels per word:
//!   | p0 w0 | p1 w0 | p2 w0 | p3 w0 | p0 w1 | p1 w1 | ...
//!
//! line-interleaved (Amiga ILBM), one full row per plane:
//!   | p0 row0 | p1 row0 | p2 row0 | p3 row0 | p0 row1 | ...
//!
//! contiguous (Amiga ACBM), one full bitmap per plane:
//!   | p0 rows 0..h | p1 rows 0..h | p2 rows 0..h | p3 rows 0..h |
//! ```
//!
//! All three are the same walk with different strides, captured by
//! [`PlaneGeometry`]. [`BitplaneReader`] and [`BitplaneWriter`] drive a
//! cursor over that geometry one pixel at a time.

mod reader;
mod writer;

pub use reader::BitplaneReader;
pub use writer::BitplaneWriter;

use alloc::format;

use crate::error::BitplaneError;

/// Most planes a palette index (`u8`) can address.
pub const MAX_PLANES: u8 = 8;

/// Arrangement of planes within a buffer.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitplaneLayout {
    /// Each plane is a complete bitmap; planes follow one another (ACBM).
    Contiguous,
    /// Each row stores every plane's bytes for that row in turn (ILBM,
    /// compressed Degas).
    LineInterleaved,
    /// Planes alternate every 16-pixel word (Atari ST screen memory).
    #[default]
    WordInterleaved,
}

impl BitplaneLayout {
    /// Geometry for an image of `width` x `height` pixels.
    pub fn geometry(
        self,
        planes: u8,
        width: u32,
        height: u32,
    ) -> Result<PlaneGeometry, BitplaneError> {
        match self {
            Self::Contiguous => PlaneGeometry::contiguous(planes, width, height),
            Self::LineInterleaved => PlaneGeometry::line_interleaved(planes, width),
            Self::WordInterleaved => PlaneGeometry::word_interleaved(planes),
        }
    }
}

/// Bytes needed to hold `planes` planes of a `width` x `height` image.
///
/// The same for every layout; `width` is expected to be a multiple of 16.
pub fn planar_len(planes: u8, width: u32, height: u32) -> Option<usize> {
    (width as usize / 8)
        .checked_mul(height as usize)?
        .checked_mul(usize::from(planes))
}

/// Stride parameters of a planar walk.
///
/// The byte holding plane `k` at the cursor is
/// `byte + block * block_stride + line * line_stride + k * plane_stride`,
/// where `byte < bytes_per_block` and `block < blocks_per_line`.
///
/// Only [`PlaneGeometry::new`] and the presets build one, so the plane
/// count is always in `1..=MAX_PLANES`:
///
/// ```compile_fail
/// let g = zenbitplanes::PlaneGeometry {
///     bytes_per_block: 2,
///     block_stride: 0,
///     blocks_per_line: 1,
///     line_stride: 0,
///     planes: 0,
///     plane_stride: 2,
/// };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneGeometry {
    bytes_per_block: usize,
    block_stride: usize,
    blocks_per_line: usize,
    line_stride: usize,
    planes: u8,
    plane_stride: usize,
}

impl PlaneGeometry {
    pub fn new(
        bytes_per_block: usize,
        block_stride: usize,
        blocks_per_line: usize,
        line_stride: usize,
        planes: u8,
        plane_stride: usize,
    ) -> Result<Self, BitplaneError> {
        if planes == 0 || planes > MAX_PLANES {
            return Err(BitplaneError::InvalidPlaneCount {
                planes: usize::from(planes),
            });
        }
        if bytes_per_block == 0 || blocks_per_line == 0 {
            return Err(BitplaneError::InvalidDimensions(format!(
                "empty planar walk: {bytes_per_block} bytes per block, {blocks_per_line} blocks per line"
            )));
        }
        Ok(Self {
            bytes_per_block,
            block_stride,
            blocks_per_line,
            line_stride,
            planes,
            plane_stride,
        })
    }

    pub fn bytes_per_block(&self) -> usize {
        self.bytes_per_block
    }

    pub fn block_stride(&self) -> usize {
        self.block_stride
    }

    pub fn blocks_per_line(&self) -> usize {
        self.blocks_per_line
    }

    pub fn line_stride(&self) -> usize {
        self.line_stride
    }

    pub fn planes(&self) -> u8 {
        self.planes
    }

    pub fn plane_stride(&self) -> usize {
        self.plane_stride
    }

    pub fn contiguous(planes: u8, width: u32, height: u32) -> Result<Self, BitplaneError> {
        let bytes_per_plane = (width as usize / 8)
            .checked_mul(height as usize)
            .ok_or(BitplaneError::DimensionsTooLarge { width, height })?;
        Self::new(bytes_per_plane, 0, 1, 0, planes, bytes_per_plane)
    }

    pub fn line_interleaved(planes: u8, width: u32) -> Result<Self, BitplaneError> {
        let bytes_per_line = width as usize / 8;
        Self::new(
            bytes_per_line,
            0,
            1,
            bytes_per_line * usize::from(planes),
            planes,
            bytes_per_line,
        )
    }

    pub fn word_interleaved(planes: u8) -> Result<Self, BitplaneError> {
        let planes_usize = usize::from(planes);
        Self::new(2, planes_usize * 2, 2, planes_usize * 4, planes, 2)
    }
}

/// Position of the next pixel in a planar walk.
///
/// Only moves forward. One cursor belongs to exactly one reader or writer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    byte: usize,
    block: usize,
    line: usize,
    bit: u8,
}

impl Cursor {
    pub(crate) fn bit(&self) -> u8 {
        self.bit
    }

    /// Offset of plane 0's byte at the cursor, after checking that every
    /// plane's byte lies inside a buffer of `len` bytes.
    ///
    /// A geometry without a line stride covers exactly one line; moving past
    /// it is out of bounds rather than a wrap back to the start.
    pub(crate) fn locate(
        &self,
        geometry: &PlaneGeometry,
        len: usize,
    ) -> Result<usize, BitplaneError> {
        let last_plane = usize::from(geometry.planes - 1);
        if geometry.line_stride == 0 && self.line > 0 {
            let end = last_plane
                .saturating_mul(geometry.plane_stride)
                .saturating_add(geometry.bytes_per_block);
            return Err(BitplaneError::OutOfBounds { offset: end, len });
        }
        let base = self
            .block
            .checked_mul(geometry.block_stride)
            .and_then(|o| o.checked_add(self.byte))
            .and_then(|o| o.checked_add(self.line.checked_mul(geometry.line_stride)?));
        let last =
            base.and_then(|b| b.checked_add(last_plane.checked_mul(geometry.plane_stride)?));
        match (base, last) {
            (Some(base), Some(last)) if last < len => Ok(base),
            (_, last) => Err(BitplaneError::OutOfBounds {
                offset: last.unwrap_or(usize::MAX),
                len,
            }),
        }
    }

    /// Move to the next pixel. Returns true when the move leaves the
    /// current byte.
    pub(crate) fn step(&mut self, geometry: &PlaneGeometry) -> bool {
        if self.bit < 7 {
            self.bit += 1;
            return false;
        }
        self.bit = 0;
        if self.byte + 1 < geometry.bytes_per_block {
            self.byte += 1;
        } else {
            self.byte = 0;
            if self.block + 1 < geometry.blocks_per_line {
                self.block += 1;
            } else {
                self.block = 0;
                self.line += 1;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(geometry: &PlaneGeometry, pixels: usize) -> alloc::vec::Vec<usize> {
        let mut cursor = Cursor::default();
        let mut bases = alloc::vec::Vec::new();
        for _ in 0..pixels {
            if cursor.bit() == 0 {
                bases.push(cursor.locate(geometry, usize::MAX).unwrap());
            }
            cursor.step(geometry);
        }
        bases
    }

    #[test]
    fn presets_match_layout_table() {
        let strides = |g: PlaneGeometry| {
            (
                g.bytes_per_block(),
                g.block_stride(),
                g.blocks_per_line(),
                g.line_stride(),
                g.planes(),
                g.plane_stride(),
            )
        };
        let c = PlaneGeometry::contiguous(4, 32, 2).unwrap();
        assert_eq!(strides(c), (8, 0, 1, 0, 4, 8));

        let l = PlaneGeometry::line_interleaved(4, 32).unwrap();
        assert_eq!(strides(l), (4, 0, 1, 16, 4, 4));

        let w = PlaneGeometry::word_interleaved(4).unwrap();
        assert_eq!(strides(w), (2, 8, 2, 16, 4, 2));
    }

    #[test]
    fn word_interleaved_walk_skips_other_planes() {
        let g = PlaneGeometry::word_interleaved(4).unwrap();
        // Two bytes of plane 0, then jump over planes 1-3 of the same word.
        assert_eq!(walk(&g, 64), [0, 1, 8, 9, 16, 17, 24, 25]);
    }

    #[test]
    fn line_interleaved_walk_skips_plane_rows() {
        let g = PlaneGeometry::line_interleaved(2, 16).unwrap();
        assert_eq!(walk(&g, 48), [0, 1, 4, 5, 8, 9]);
    }

    #[test]
    fn contiguous_walk_is_linear() {
        let g = PlaneGeometry::contiguous(3, 16, 2).unwrap();
        assert_eq!(walk(&g, 32), [0, 1, 2, 3]);
    }

    #[test]
    fn locate_checks_highest_plane() {
        let g = PlaneGeometry::contiguous(2, 16, 1).unwrap();
        let cursor = Cursor::default();
        assert_eq!(cursor.locate(&g, 4).unwrap(), 0);
        assert!(matches!(
            cursor.locate(&g, 2),
            Err(BitplaneError::OutOfBounds { offset: 2, len: 2 })
        ));
    }

    #[test]
    fn rejects_degenerate_geometry() {
        assert!(matches!(
            PlaneGeometry::word_interleaved(0),
            Err(BitplaneError::InvalidPlaneCount { planes: 0 })
        ));
        assert!(matches!(
            PlaneGeometry::word_interleaved(9),
            Err(BitplaneError::InvalidPlaneCount { planes: 9 })
        ));
        assert!(PlaneGeometry::line_interleaved(1, 4).is_err());
    }

    #[test]
    fn raw_constructor_bounds_plane_count() {
        for planes in [0u8, 9, 255] {
            assert!(matches!(
                PlaneGeometry::new(2, 0, 1, 0, planes, 2),
                Err(BitplaneError::InvalidPlaneCount { .. })
            ));
        }
        for planes in 1..=MAX_PLANES {
            let g = PlaneGeometry::new(1, 0, 1, 0, planes, 1).unwrap();
            let mut data = alloc::vec![0xFFu8; usize::from(planes)];
            let mut writer = BitplaneWriter::new(&mut data, g);
            writer.write(0).unwrap();
            let mut reader = BitplaneReader::new(&data, g);
            // All planes set: index has every plane bit set.
            let all = ((1u16 << planes) - 1) as u8;
            assert_eq!(reader.read().unwrap(), all);
        }
    }

    #[test]
    fn planar_len_is_layout_independent() {
        assert_eq!(planar_len(4, 320, 200), Some(32000));
        assert_eq!(planar_len(1, 640, 400), Some(32000));
    }
}
