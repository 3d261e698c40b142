//! Core types for image decoding.

use image::{ColorType, DynamicImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding and resampling operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Requested dimensions are not usable.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Color layout of a source image as it was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Single gray channel.
    Luma,
    /// Gray plus alpha.
    LumaAlpha,
    /// Plain three-channel color.
    Rgb,
    /// Color plus alpha.
    Rgba,
    /// Indexed color with a palette.
    Palette,
    /// Anything else the decoder produced (16-bit, float).
    Other,
}

impl ColorMode {
    /// Map the decoder's pixel layout onto a color mode.
    ///
    /// Decoders expand palettes on read, so `Palette` never comes out of
    /// here; it is detected from the container header instead.
    pub fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 | ColorType::L16 => ColorMode::Luma,
            ColorType::La8 | ColorType::La16 => ColorMode::LumaAlpha,
            ColorType::Rgb8 => ColorMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            _ => ColorMode::Other,
        }
    }

    /// True for modes that carry an alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::LumaAlpha | ColorMode::Rgba)
    }

    /// True when the mode cannot be written as JPEG without conversion.
    pub fn needs_normalization(self) -> bool {
        self.has_alpha() || self == ColorMode::Palette
    }
}

/// Channel layout of a [`DecodedImage`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelLayout {
    /// One byte per pixel.
    Gray,
    /// Three bytes per pixel, R G B.
    #[default]
    Rgb,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::Rgb => 3,
        }
    }
}

/// A decoded 8-bit image in one of the layouts the JPEG encoder accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel layout of `pixels`.
    pub layout: PixelLayout,
    /// Pixel data in row-major order.
    /// Length should be width * height * layout.channels().
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new RGB DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::with_layout(width, height, PixelLayout::Rgb, pixels)
    }

    /// Create a single-channel DecodedImage.
    pub fn gray(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::with_layout(width, height, PixelLayout::Gray, pixels)
    }

    fn with_layout(width: u32, height: u32, layout: PixelLayout, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * layout.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            layout,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Rgb,
            pixels: img.into_raw(),
        }
    }

    /// Create a DecodedImage from an image::GrayImage.
    pub fn from_gray_image(img: image::GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Gray,
            pixels: img.into_raw(),
        }
    }

    /// Wrap the buffer as a `DynamicImage` of the matching layout.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        let pixels = self.pixels.clone();
        match self.layout {
            PixelLayout::Gray => image::GrayImage::from_raw(self.width, self.height, pixels)
                .map(DynamicImage::ImageLuma8),
            PixelLayout::Rgb => image::RgbImage::from_raw(self.width, self.height, pixels)
                .map(DynamicImage::ImageRgb8),
        }
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// An image as handed to the encoder: decoded pixels plus the color mode
/// they were stored in.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    mode: ColorMode,
}

impl SourceImage {
    /// Wrap a decoded image, deriving the color mode from its pixel layout.
    pub fn new(image: DynamicImage) -> Self {
        let mode = ColorMode::from_color_type(image.color());
        Self { image, mode }
    }

    /// Wrap a decoded image with a color mode known from the container.
    pub fn with_mode(image: DynamicImage, mode: ColorMode) -> Self {
        Self { image, mode }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.mode
    }

    /// Convert to a layout the JPEG encoder can write.
    ///
    /// Plain gray stays single-channel. Everything else becomes RGB: alpha
    /// is dropped, not composited, and palettes are expanded.
    pub fn normalize(&self) -> DecodedImage {
        match self.mode {
            ColorMode::Luma => DecodedImage::from_gray_image(self.image.to_luma8()),
            _ => DecodedImage::from_rgb_image(self.image.to_rgb8()),
        }
    }
}

impl From<DecodedImage> for SourceImage {
    fn from(decoded: DecodedImage) -> Self {
        match decoded.to_dynamic() {
            Some(image) => SourceImage::new(image),
            None => SourceImage::new(DynamicImage::new_rgb8(0, 0)),
        }
    }
}
