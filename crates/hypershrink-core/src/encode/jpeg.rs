//! Baseline JPEG encoding with optimized Huffman tables.

use jpeg_encoder::{ColorType, Encoder};
use thiserror::Error;

use crate::decode::{DecodedImage, PixelLayout};

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero or beyond the 65535 JPEG limit
    #[error("Invalid dimensions: {width}x{height} (each side must be 1-65535)")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality, clamped to 1-100
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero or oversized side,
/// `EncodeError::InvalidPixelData` when the buffer length is wrong, and
/// `EncodeError::EncodingFailed` if the encoder itself fails.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    encode_pixels(pixels, width, height, PixelLayout::Rgb, quality)
}

/// Encode a [`DecodedImage`] to JPEG bytes, single-channel for gray input.
pub fn encode_decoded(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    encode_pixels(&image.pixels, image.width, image.height, image.layout, quality)
}

fn encode_pixels(
    pixels: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let invalid = || EncodeError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    let w = u16::try_from(width).map_err(|_| invalid())?;
    let h = u16::try_from(height).map_err(|_| invalid())?;

    let expected_len = (width as usize) * (height as usize) * layout.channels();
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let color = match layout {
        PixelLayout::Gray => ColorType::Luma,
        PixelLayout::Rgb => ColorType::Rgb,
    };

    let mut buffer = Vec::with_capacity(expected_len / 3);
    let mut encoder = Encoder::new(&mut buffer, quality.clamp(1, 100));
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(pixels, w, h, color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}
