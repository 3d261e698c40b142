//! Fit-to-budget encoding.
//!
//! Re-encodes an image as JPEG until the output is at or under a byte
//! budget. Quality is lowered first; once it drops below a threshold the
//! resolution is reduced as well, always resampling from the original
//! pixels. The first attempt that fits is returned.
//!
//! Running out of room is a normal [`FitOutcome::Failure`], not an error.
//! [`FitError`] is reserved for invalid input and codec failures.
//!
//! # Examples
//!
//! ```ignore
//! use hypershrink_core::decode::decode_file;
//! use hypershrink_core::fit::{fit_to_budget, Budget, FitOutcome};
//!
//! let image = decode_file("huge.png")?;
//! match fit_to_budget(&image, Budget::from_megabytes(16)?)? {
//!     FitOutcome::Success(s) => std::fs::write("huge_small.jpg", &s.bytes)?,
//!     FitOutcome::Failure(f) => eprintln!("gave up: {}", f.reason),
//! }
//! ```

mod budget;
mod outcome;
mod params;
mod search;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

pub use budget::{Budget, BYTES_PER_MEGABYTE};
pub use outcome::{EncodeAttempt, FailureReason, FitFailure, FitOutcome, FitSuccess};
pub use params::SearchParams;
pub use search::{fit_to_budget, FitToBudget};

/// Errors that stop a budget search before it reaches an outcome.
#[derive(Debug, Error)]
pub enum FitError {
    /// The byte budget is zero.
    #[error("Budget must be greater than zero bytes")]
    InvalidBudget,

    /// The search parameters would not terminate or are out of range.
    #[error("Invalid search parameters: {0}")]
    InvalidParams(String),

    /// The image has no pixels.
    #[error("Cannot encode an empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Resampling for a downscaled attempt failed.
    #[error("Resize failed: {0}")]
    Resize(#[from] DecodeError),

    /// The JPEG encoder failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
