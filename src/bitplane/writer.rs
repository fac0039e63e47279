use super::{Cursor, PlaneGeometry};
use crate::error::BitplaneError;

/// Writes palette indices, one pixel at a time, into planar data.
///
/// Only sets bits: the destination must start zeroed.
#[derive(Debug)]
pub struct BitplaneWriter<'a> {
    data: &'a mut [u8],
    geometry: PlaneGeometry,
    cursor: Cursor,
    base: Option<usize>,
}

impl<'a> BitplaneWriter<'a> {
    pub fn new(data: &'a mut [u8], geometry: PlaneGeometry) -> Self {
        Self {
            data,
            geometry,
            cursor: Cursor::default(),
            base: None,
        }
    }

    /// Writer producing one bitmap per plane (Amiga ACBM).
    pub fn contiguous(
        data: &'a mut [u8],
        planes: u8,
        width: u32,
        height: u32,
    ) -> Result<Self, BitplaneError> {
        Ok(Self::new(
            data,
            PlaneGeometry::contiguous(planes, width, height)?,
        ))
    }

    /// Writer producing row-interleaved planes (Amiga ILBM).
    pub fn line_interleaved(
        data: &'a mut [u8],
        planes: u8,
        width: u32,
    ) -> Result<Self, BitplaneError> {
        Ok(Self::new(data, PlaneGeometry::line_interleaved(planes, width)?))
    }

    /// Writer producing word-interleaved planes (Atari ST).
    pub fn word_interleaved(data: &'a mut [u8], planes: u8) -> Result<Self, BitplaneError> {
        Ok(Self::new(data, PlaneGeometry::word_interleaved(planes)?))
    }

    pub fn geometry(&self) -> &PlaneGeometry {
        &self.geometry
    }

    /// Store `index` as the next pixel.
    ///
    /// Indices needing more bits than there are planes are rejected, as is
    /// writing past the end of the data.
    pub fn write(&mut self, index: u8) -> Result<(), BitplaneError> {
        let planes = self.geometry.planes;
        if planes < 8 && index >> planes != 0 {
            return Err(BitplaneError::PaletteIndexOutOfRange {
                index: usize::from(index),
                len: 1 << planes,
            });
        }
        let base = match self.base {
            Some(base) => base,
            None => {
                let base = self.cursor.locate(&self.geometry, self.data.len())?;
                self.base = Some(base);
                base
            }
        };
        let mask = 0x80 >> self.cursor.bit();
        for plane in 0..planes {
            if index & (1 << plane) != 0 {
                self.data[base + usize::from(plane) * self.geometry.plane_stride] |= mask;
            }
        }
        self.step();
        Ok(())
    }

    /// Skip `pixels` pixels, leaving their bits untouched.
    pub fn advance(&mut self, pixels: usize) {
        for _ in 0..pixels {
            self.step();
        }
    }

    fn step(&mut self) {
        if self.cursor.step(&self.geometry) {
            self.base = None;
        }
    }
}
