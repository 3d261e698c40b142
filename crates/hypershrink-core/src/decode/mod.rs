//! Image decoding for Hypershrink.
//!
//! This module provides functionality for:
//! - Decoding PNG, JPEG, WebP, TIFF and BMP sources
//! - Recording the stored color mode (alpha, palette) before normalization
//! - Applying EXIF orientation
//! - Resizing by a scale factor for the downscale phase of the budget search
//!
//! # Architecture
//!
//! All operations are synchronous and single-threaded. Callers decode once
//! per file and hand the resulting [`SourceImage`] to the encoder.
//!
//! # Examples
//!
//! ```ignore
//! use hypershrink_core::decode::decode_file;
//!
//! let image = decode_file("photo.png").unwrap();
//! println!("Decoded {}x{} image ({:?})", image.width(), image.height(), image.color_mode());
//! ```

mod reader;
mod resize;
mod types;

pub use reader::{decode_file, decode_image};
pub use resize::{resize, resize_by_scale, scaled_dimensions};
pub use types::{ColorMode, DecodeError, DecodedImage, PixelLayout, SourceImage};

use types::Orientation;
