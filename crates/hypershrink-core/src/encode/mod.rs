//! JPEG encoding for Hypershrink.
//!
//! Each call writes into a fresh buffer; nothing is shared between attempts.
//!
//! # Examples
//!
//! ```ignore
//! use hypershrink_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_decoded, encode_jpeg, EncodeError};
