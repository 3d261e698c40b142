//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@hypershrink/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height} (${image.color_mode})`);
//! ```

use crate::types::JsSourceImage;
use hypershrink_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a PNG, JPEG, WebP, TIFF or BMP file from bytes.
///
/// EXIF orientation is applied during decoding.
///
/// # Errors
///
/// Returns an error if the format is not recognized or the file is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
