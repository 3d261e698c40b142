//! Decoding of source files (PNG, JPEG, WebP, TIFF, BMP) into a [`SourceImage`].

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{ColorMode, DecodeError, Orientation, SourceImage};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_INDEXED_COLOR: u8 = 3;

/// Decode an image from bytes, guessing the format from its content.
///
/// EXIF orientation is applied so the output, which carries no metadata,
/// displays the same way the source did. Indexed-color PNG and BMP files
/// are reported with [`ColorMode::Palette`].
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized,
/// and `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let mode = if container_is_paletted(bytes) {
        ColorMode::Palette
    } else {
        ColorMode::from_color_type(img.color())
    };

    Ok(SourceImage::with_mode(
        apply_orientation(img, orientation),
        mode,
    ))
}

/// Read and decode an image file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<SourceImage, DecodeError> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| DecodeError::IoError(e.to_string()))?;
    decode_image(&bytes)
}

/// Extract EXIF orientation value from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Check the container header for indexed color.
///
/// The decoder expands palettes into RGB(A), so this is the only place the
/// original mode is still visible.
fn container_is_paletted(bytes: &[u8]) -> bool {
    // PNG: IHDR is always the first chunk, color type sits at byte 25.
    if bytes.len() > 25 && bytes[..8] == PNG_SIGNATURE && &bytes[12..16] == b"IHDR" {
        return bytes[25] == PNG_INDEXED_COLOR;
    }

    // BMP: bits per pixel follows the DIB header size field.
    if bytes.len() >= 30 && &bytes[..2] == b"BM" {
        let dib_size = u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]);
        let bpp_offset = if dib_size == 12 { 24 } else { 28 };
        let bpp = u16::from_le_bytes([bytes[bpp_offset], bytes[bpp_offset + 1]]);
        return (1..=8).contains(&bpp);
    }

    false
}
