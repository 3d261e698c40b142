//! WASM-compatible wrapper types for image data.

use hypershrink_core::decode::{ColorMode, DecodedImage, SourceImage};
use wasm_bindgen::prelude::*;

/// A decoded source image held in WASM memory.
///
/// The raster stays on the Rust side; JavaScript only sees dimensions and
/// the color mode, and hands the image back to [`crate::fit_to_budget`].
#[wasm_bindgen]
pub struct JsSourceImage {
    inner: SourceImage,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Build an image from RGB pixel data (3 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsSourceImage, JsValue> {
        let expected = (width as usize) * (height as usize) * 3;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "expected {expected} bytes of RGB data, got {}",
                pixels.len()
            )));
        }
        Ok(Self::from_source(SourceImage::from(DecodedImage::new(
            width, height, pixels,
        ))))
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Stored color mode: "luma", "luma_alpha", "rgb", "rgba", "palette" or "other".
    #[wasm_bindgen(getter)]
    pub fn color_mode(&self) -> String {
        color_mode_name(self.inner.color_mode()).to_string()
    }

    /// Whether the image carries alpha or a palette that JPEG output drops.
    #[wasm_bindgen(getter)]
    pub fn needs_normalization(&self) -> bool {
        self.inner.color_mode().needs_normalization()
    }
}

impl JsSourceImage {
    pub(crate) fn from_source(inner: SourceImage) -> Self {
        Self { inner }
    }

    pub(crate) fn source(&self) -> &SourceImage {
        &self.inner
    }
}

pub(crate) fn color_mode_name(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Luma => "luma",
        ColorMode::LumaAlpha => "luma_alpha",
        ColorMode::Rgb => "rgb",
        ColorMode::Rgba => "rgba",
        ColorMode::Palette => "palette",
        ColorMode::Other => "other",
    }
}
