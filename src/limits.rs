use alloc::format;

use crate::error::BitplaneError;

/// Resource limits for [`DecodeRequest`](crate::DecodeRequest) and
/// [`EncodeRequest`](crate::EncodeRequest).
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size of any single buffer the request allocates: the RGBA
    /// output when decoding, the planar and packed buffers when encoding.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<(), BitplaneError> {
        let exceeds = |value: u64, max: Option<u64>| max.is_some_and(|m| value > m);
        if exceeds(u64::from(width), self.max_width) {
            return Err(BitplaneError::LimitExceeded(format!(
                "width {width} exceeds limit {}",
                self.max_width.unwrap_or_default()
            )));
        }
        if exceeds(u64::from(height), self.max_height) {
            return Err(BitplaneError::LimitExceeded(format!(
                "height {height} exceeds limit {}",
                self.max_height.unwrap_or_default()
            )));
        }
        let pixels = u64::from(width) * u64::from(height);
        if exceeds(pixels, self.max_pixels) {
            return Err(BitplaneError::LimitExceeded(format!(
                "pixel count {pixels} exceeds limit {}",
                self.max_pixels.unwrap_or_default()
            )));
        }
        Ok(())
    }

    /// `what` names the buffer in the error message.
    pub(crate) fn check_allocation(&self, what: &str, bytes: usize) -> Result<(), BitplaneError> {
        match self.max_memory_bytes {
            Some(max_mem) if bytes as u64 > max_mem => Err(BitplaneError::LimitExceeded(format!(
                "{what} of {bytes} bytes exceeds memory limit {max_mem}"
            ))),
            _ => Ok(()),
        }
    }
}
