//! Synthetic fixtures shared by unit tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

/// Smooth RGBA gradient with a varying alpha channel.
pub(crate) fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([
            ((x * 255) / width.max(1)) as u8,
            ((y * 255) / height.max(1)) as u8,
            128,
            ((x + y) % 256) as u8,
        ])
    })
}

/// Deterministic pseudo-random RGB noise. Compresses poorly, which keeps
/// JPEG sizes large enough to exercise the downscale phase.
pub(crate) fn noise_rgb(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.max(1);
    RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        };
        image::Rgb([next(), next(), next()])
    })
}

/// Encode an image into an in-memory container of the given format.
pub(crate) fn encode_as(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .expect("fixture encoding failed");
    cursor.into_inner()
}

/// Hand-built 8-bit indexed BMP with a two-entry palette (red, blue)
/// laid out as a checkerboard.
pub(crate) fn paletted_bmp(width: u32, height: u32) -> Vec<u8> {
    // Palette entries are stored as BGRx.
    let palette: [[u8; 4]; 2] = [[0, 0, 255, 0], [255, 0, 0, 0]];
    let row_len = width.div_ceil(4) as usize * 4;
    let pixel_offset = 14 + 40 + palette.len() * 4;
    let file_size = pixel_offset + row_len * height as usize;

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(pixel_offset as u32).to_le_bytes());

    // BITMAPINFOHEADER
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&((row_len * height as usize) as u32).to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&(palette.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    for entry in palette {
        out.extend_from_slice(&entry);
    }

    for y in 0..height {
        for x in 0..row_len as u32 {
            out.push(if x < width { ((x + y) % 2) as u8 } else { 0 });
        }
    }
    out
}
