//! # zenbitplanes
//!
//! Planar (bitplane) bitmap decoder and encoder for Atari ST/STE and Amiga
//! style images.
//!
//! ## What's here
//!
//! - [`IndexedPalette`]: ordered colors at 1 to 8 bits per channel, with
//!   exact resampling between depths.
//! - [`palette::atari`]: ST (3-bit) and STE (4-bit, scrambled) hardware
//!   color words.
//! - [`BitplaneReader`] / [`BitplaneWriter`]: pixel-at-a-time access to
//!   word-interleaved, line-interleaved and contiguous planes, or any
//!   custom [`PlaneGeometry`].
//! - [`packbits`]: the run-length scheme used by Degas Elite and IFF ILBM.
//! - [`RgbaIndexReader`] / [`RgbaIndexWriter`]: RGBA8 pixels ↔ palette
//!   indices.
//! - [`DecodeRequest`] / [`EncodeRequest`]: whole images in one call.
//!
//! ## Non-Goals
//!
//! - Container formats (Degas `.PI1`, IFF `FORM`, NEOchrome headers)
//! - Color quantization or dithering: pixels must already use palette
//!   colors
//! - Chunky (packed-pixel) indexed formats
//!
//! ## Usage
//!
//! ```
//! use zenbitplanes::{DecodeRequest, EncodeRequest, IndexedPalette, Unstoppable};
//! use zenbitplanes::palette::atari::create_atari_st_palette;
//!
//! // Degas-style 16-color palette: 16 big-endian ST color words.
//! let mut words = [0u8; 32];
//! words[2..4].copy_from_slice(&0x0777u16.to_be_bytes());
//! let palette = create_atari_st_palette(&words, 16)?;
//!
//! // A 16x1 image, every pixel palette entry 1 (white).
//! let pixels = [255u8; 16 * 4];
//! let planar = EncodeRequest::new(&palette).encode(&pixels, 16, 1, Unstoppable)?;
//! assert_eq!(planar, [0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
//!
//! let decoded = DecodeRequest::new(&planar, &palette).decode(16, 1, Unstoppable)?;
//! assert_eq!(decoded.pixels(), &pixels[..]);
//! # Ok::<(), zenbitplanes::BitplaneError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod limits;
mod pixel;

pub mod bitplane;
pub mod packbits;
pub mod palette;

mod decode;
mod encode;

// Re-exports
pub use bitplane::{BitplaneLayout, BitplaneReader, BitplaneWriter, PlaneGeometry, planar_len};
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::BitplaneError;
pub use limits::Limits;
pub use palette::{Color, IndexedPalette};
pub use pixel::{RgbaIndexReader, RgbaIndexWriter};
