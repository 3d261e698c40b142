//! Hypershrink Core - fit-to-budget JPEG re-encoding
//!
//! This crate takes an oversized image and produces a JPEG at or under a
//! byte budget by progressively lowering quality and, past a threshold,
//! downscaling resolution.
//!
//! # Module Structure
//!
//! - `decode` - Source decoding, color modes, resizing
//! - `encode` - JPEG encoding
//! - `fit` - The quality/scale budget search
//!
//! The encoder is synchronous and keeps no state between calls. Callers
//! that want parallelism run independent calls on their own workers.

pub mod decode;
pub mod encode;
pub mod fit;

#[cfg(test)]
pub(crate) mod test_support;

pub use decode::{decode_file, decode_image, ColorMode, DecodeError, DecodedImage, SourceImage};
pub use encode::{encode_jpeg, EncodeError};
pub use fit::{
    fit_to_budget, Budget, EncodeAttempt, FailureReason, FitError, FitOutcome, FitToBudget,
    SearchParams,
};
