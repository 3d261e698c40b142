//! Image resizing for the downscale phase of the budget search.
//!
//! All functions return new `DecodedImage` instances without modifying the input.
//! Resampling is always Lanczos3 and keeps the input's pixel layout.

use image::imageops::FilterType;

use super::{DecodeError, DecodedImage, PixelLayout};

const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Resize an image to exact dimensions.
///
/// # Arguments
///
/// * `image` - The source image to resize
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero,
/// and `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// source dimensions.
pub fn resize(image: &DecodedImage, width: u32, height: u32) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let source = image
        .to_dynamic()
        .ok_or_else(|| DecodeError::CorruptedFile("Pixel buffer size mismatch".to_string()))?;

    let resized = source.resize_exact(width, height, RESAMPLE_FILTER);

    Ok(match image.layout {
        PixelLayout::Gray => DecodedImage::from_gray_image(resized.into_luma8()),
        PixelLayout::Rgb => DecodedImage::from_rgb_image(resized.into_rgb8()),
    })
}

/// Resize an image by a uniform scale factor applied to its dimensions.
///
/// Dimensions come from [`scaled_dimensions`], so they are floored and never
/// drop below one pixel.
pub fn resize_by_scale(image: &DecodedImage, scale: f64) -> Result<DecodedImage, DecodeError> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(DecodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }
    let (width, height) = scaled_dimensions(image.width, image.height, scale);
    resize(image, width, height)
}

/// Scale dimensions by `scale`, flooring each side and clamping to 1.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).floor() as u32;
    let h = (height as f64 * scale).floor() as u32;
    (w.max(1), h.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        // Create a simple gradient image for testing
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_same_dimensions() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 100, 50).unwrap();

        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);

        assert!(matches!(
            resize(&img, 0, 50),
            Err(DecodeError::InvalidDimensions { .. })
        ));
        assert!(resize(&img, 50, 0).is_err());
    }

    #[test]
    fn test_scaled_dimensions_floor() {
        // 333 * 0.9 = 299.7, 101 * 0.9 = 90.9
        assert_eq!(scaled_dimensions(333, 101, 0.9), (299, 90));
        assert_eq!(scaled_dimensions(1000, 500, 1.0), (1000, 500));
    }

    #[test]
    fn test_scaled_dimensions_clamps_to_one() {
        assert_eq!(scaled_dimensions(5, 3, 0.01), (1, 1));
        assert_eq!(scaled_dimensions(4000, 3, 0.1), (400, 1));
    }

    #[test]
    fn test_resize_by_scale() {
        let img = create_test_image(100, 50);
        let resized = resize_by_scale(&img, 0.81).unwrap();

        assert_eq!(resized.width, 81);
        assert_eq!(resized.height, 40);
    }

    #[test]
    fn test_resize_by_scale_rejects_bad_scale() {
        let img = create_test_image(10, 10);
        assert!(resize_by_scale(&img, 0.0).is_err());
        assert!(resize_by_scale(&img, -0.5).is_err());
        assert!(resize_by_scale(&img, f64::NAN).is_err());
    }

    #[test]
    fn test_resize_is_deterministic() {
        let img = create_test_image(64, 48);
        let a = resize_by_scale(&img, 0.59049).unwrap();
        let b = resize_by_scale(&img, 0.59049).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_resize_keeps_gray_layout() {
        let img = DecodedImage::gray(40, 20, (0..800).map(|i| (i % 256) as u8).collect());
        let resized = resize_by_scale(&img, 0.5).unwrap();

        assert_eq!(resized.layout, PixelLayout::Gray);
        assert_eq!((resized.width, resized.height), (20, 10));
        assert_eq!(resized.pixels.len(), 20 * 10);
    }

    #[test]
    fn test_resize_rejects_mismatched_buffer() {
        let img = DecodedImage {
            width: 10,
            height: 10,
            layout: PixelLayout::Rgb,
            pixels: vec![0u8; 12],
        };
        assert!(matches!(
            resize(&img, 5, 5),
            Err(DecodeError::CorruptedFile(_))
        ));
    }
}
