use super::{Cursor, PlaneGeometry};
use crate::error::BitplaneError;

/// Reads palette indices, one pixel at a time, from planar data.
///
/// The first read inside each byte fetches that byte from every plane and
/// unpacks all eight pixels; the following seven reads come from the cache.
#[derive(Debug)]
pub struct BitplaneReader<'a> {
    data: &'a [u8],
    geometry: PlaneGeometry,
    cursor: Cursor,
    indices: [u8; 8],
    loaded: bool,
}

impl<'a> BitplaneReader<'a> {
    pub fn new(data: &'a [u8], geometry: PlaneGeometry) -> Self {
        Self {
            data,
            geometry,
            cursor: Cursor::default(),
            indices: [0; 8],
            loaded: false,
        }
    }

    /// Reader over one bitmap per plane (Amiga ACBM).
    pub fn contiguous(
        data: &'a [u8],
        planes: u8,
        width: u32,
        height: u32,
    ) -> Result<Self, BitplaneError> {
        Ok(Self::new(
            data,
            PlaneGeometry::contiguous(planes, width, height)?,
        ))
    }

    /// Reader over row-interleaved planes (Amiga ILBM).
    pub fn line_interleaved(
        data: &'a [u8],
        planes: u8,
        width: u32,
    ) -> Result<Self, BitplaneError> {
        Ok(Self::new(data, PlaneGeometry::line_interleaved(planes, width)?))
    }

    /// Reader over word-interleaved planes (Atari ST).
    pub fn word_interleaved(data: &'a [u8], planes: u8) -> Result<Self, BitplaneError> {
        Ok(Self::new(data, PlaneGeometry::word_interleaved(planes)?))
    }

    pub fn geometry(&self) -> &PlaneGeometry {
        &self.geometry
    }

    /// Palette index of the next pixel.
    ///
    /// Fails with [`BitplaneError::OutOfBounds`] instead of reading past the
    /// end of the data; the cursor does not move on failure.
    pub fn read(&mut self) -> Result<u8, BitplaneError> {
        if !self.loaded {
            self.load()?;
        }
        let index = self.indices[usize::from(self.cursor.bit())];
        if self.cursor.step(&self.geometry) {
            self.loaded = false;
        }
        Ok(index)
    }

    /// Skip `pixels` pixels without reading them.
    pub fn advance(&mut self, pixels: usize) {
        for _ in 0..pixels {
            if self.cursor.step(&self.geometry) {
                self.loaded = false;
            }
        }
    }

    fn load(&mut self) -> Result<(), BitplaneError> {
        let base = self.cursor.locate(&self.geometry, self.data.len())?;
        let mut indices = [0u8; 8];
        for plane in 0..self.geometry.planes {
            let byte = self.data[base + usize::from(plane) * self.geometry.plane_stride];
            for (pixel, index) in indices.iter_mut().enumerate() {
                *index |= ((byte >> (7 - pixel)) & 1) << plane;
            }
        }
        self.indices = indices;
        self.loaded = true;
        Ok(())
    }
}
