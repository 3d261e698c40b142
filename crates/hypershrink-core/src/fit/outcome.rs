//! Results of a budget search.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One trial encode. Reported to observers, never retained by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodeAttempt {
    /// 1-based position in the search.
    pub index: u32,
    pub quality: u8,
    pub scale: f64,
    /// Pixel width actually encoded.
    pub width: u32,
    /// Pixel height actually encoded.
    pub height: u32,
    pub size_bytes: u64,
}

/// Why a search ended without meeting its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// Quality and scale both reached their floors while still over budget.
    BudgetUnreachable,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::BudgetUnreachable => f.write_str("budget unreachable"),
        }
    }
}

/// A JPEG that met its budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSuccess {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub final_quality: u8,
    pub final_scale: f64,
    pub final_size_bytes: u64,
    pub width: u32,
    pub height: u32,
    pub attempts: u32,
}

/// A search that gave up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFailure {
    pub reason: FailureReason,
    pub last_attempt_size_bytes: u64,
    pub attempts: u32,
}

/// Terminal outcome of a budget search. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FitOutcome {
    Success(FitSuccess),
    Failure(FitFailure),
}

impl FitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FitOutcome::Success(_))
    }

    /// Number of encodes the search performed.
    pub fn attempts(&self) -> u32 {
        match self {
            FitOutcome::Success(s) => s.attempts,
            FitOutcome::Failure(f) => f.attempts,
        }
    }

    /// Take the encoded bytes of a successful search.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            FitOutcome::Success(s) => Some(s.bytes),
            FitOutcome::Failure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(
            FailureReason::BudgetUnreachable.to_string(),
            "budget unreachable"
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let success = FitOutcome::Success(FitSuccess {
            bytes: vec![0xFF, 0xD8],
            final_quality: 95,
            final_scale: 1.0,
            final_size_bytes: 2,
            width: 1,
            height: 1,
            attempts: 1,
        });
        assert!(success.is_success());
        assert_eq!(success.attempts(), 1);
        assert_eq!(success.into_bytes(), Some(vec![0xFF, 0xD8]));

        let failure = FitOutcome::Failure(FitFailure {
            reason: FailureReason::BudgetUnreachable,
            last_attempt_size_bytes: 700,
            attempts: 28,
        });
        assert!(!failure.is_success());
        assert_eq!(failure.attempts(), 28);
        assert_eq!(failure.into_bytes(), None);
    }
}
