//! Byte budgets.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::FitError;

/// Bytes in one megabyte, as used by the size limit presets.
pub const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

/// Maximum allowed size in bytes for one encoded image.
///
/// Always positive; a zero budget is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Budget(u64);

impl Budget {
    /// Create a budget of `bytes`.
    pub fn new(bytes: u64) -> Result<Self, FitError> {
        if bytes == 0 {
            return Err(FitError::InvalidBudget);
        }
        Ok(Self(bytes))
    }

    /// Create a budget of `megabytes × 1,048,576` bytes.
    pub fn from_megabytes(megabytes: u32) -> Result<Self, FitError> {
        Self::new(u64::from(megabytes) * BYTES_PER_MEGABYTE)
    }

    pub fn bytes(self) -> u64 {
        self.0
    }

    /// True when a buffer of `size` bytes fits the budget.
    pub fn admits(self, size: u64) -> bool {
        size <= self.0
    }
}

impl TryFrom<u64> for Budget {
    type Error = FitError;

    fn try_from(bytes: u64) -> Result<Self, Self::Error> {
        Budget::new(bytes)
    }
}

impl From<Budget> for u64 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} MB", self.0 as f64 / BYTES_PER_MEGABYTE as f64)
    }
}
