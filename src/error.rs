use alloc::string::String;
use enough::StopReason;

/// Errors from bitplane, palette and packbits decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitplaneError {
    #[error("read or write past end of buffer: offset {offset}, length {len}")]
    OutOfBounds { offset: usize, len: usize },

    #[error("color 0x{color:08x} not in palette")]
    ColorNotInPalette { color: u32 },

    #[error("palette length {len} is not a power of two")]
    NotPowerOfTwo { len: usize },

    #[error("{colors} colors cannot be addressed with {planes} bitplanes")]
    TooManyColors { colors: usize, planes: u8 },

    #[error("unsupported bit depth: {bits} bits per channel")]
    UnsupportedBitDepth { bits: u8 },

    #[error("unsupported bitplane count: {planes}")]
    InvalidPlaneCount { planes: usize },

    #[error("palette index {index} out of range for palette of {len} colors")]
    PaletteIndexOutOfRange { index: usize, len: usize },

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BitplaneError {
    fn from(r: StopReason) -> Self {
        BitplaneError::Cancelled(r)
    }
}
