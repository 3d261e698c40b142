//! Hypershrink WASM - WebAssembly bindings for Hypershrink
//!
//! This crate exposes hypershrink-core decoding and fit-to-budget encoding
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for decoded source images
//! - `decode` - Image decoding bindings
//! - `fit` - Fit-to-budget JPEG encoding bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, fit_to_budget_mb } from '@hypershrink/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const result = fit_to_budget_mb(image, 16);
//! ```
//!
//! Each call blocks until the search completes; run it in a Web Worker to
//! keep the page responsive.

use wasm_bindgen::prelude::*;

mod decode;
mod fit;
mod types;

pub use decode::decode_image;
pub use fit::{fit_to_budget, fit_to_budget_mb, fit_to_budget_with_progress, JsFitResult};
pub use types::JsSourceImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert a megabyte limit to bytes (`mb × 1,048,576`).
#[wasm_bindgen]
pub fn megabytes_to_bytes(megabytes: u32) -> f64 {
    (u64::from(megabytes) * hypershrink_core::fit::BYTES_PER_MEGABYTE) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_megabytes_to_bytes() {
        assert_eq!(megabytes_to_bytes(16), 16_777_216.0);
        assert_eq!(megabytes_to_bytes(0), 0.0);
    }
}
