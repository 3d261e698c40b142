//! Tunables of the quality/scale search.

use serde::{Deserialize, Serialize};

use super::FitError;

/// Parameters of the degrade-and-retry search.
///
/// The default reproduces the reference schedule: start at quality 95, step
/// down by 5, begin downscaling by 0.9 per attempt once quality drops below
/// 70, and give up once quality is below 10 and scale below 0.1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Quality of the first attempt.
    pub initial_quality: u8,
    /// Quality decrement after each failed attempt.
    pub quality_step: u8,
    /// Attempts below this quality also shrink the scale.
    pub downscale_below_quality: u8,
    /// Multiplier applied to the scale on each downscaling attempt.
    pub scale_step: f64,
    /// Abandon once quality is below this and scale is below `min_scale`.
    pub quality_floor: u8,
    /// Abandon once scale is below this and quality is below `quality_floor`.
    pub min_scale: f64,
    /// Quality is never lowered past this value.
    pub min_encode_quality: u8,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            initial_quality: 95,
            quality_step: 5,
            downscale_below_quality: 70,
            scale_step: 0.9,
            quality_floor: 10,
            min_scale: 0.1,
            min_encode_quality: 1,
        }
    }
}

impl SearchParams {
    /// Check that the schedule is well formed and always terminates.
    ///
    /// Termination needs quality to eventually fall below both the downscale
    /// threshold and the abandonment floor, and the scale to strictly shrink.
    pub fn validate(&self) -> Result<(), FitError> {
        let invalid = |reason: &str| Err(FitError::InvalidParams(reason.to_string()));

        if !(1..=100).contains(&self.initial_quality) {
            return invalid("initial_quality must be within 1..=100");
        }
        if self.quality_step == 0 {
            return invalid("quality_step must be positive");
        }
        if self.min_encode_quality == 0 || self.min_encode_quality > self.initial_quality {
            return invalid("min_encode_quality must be within 1..=initial_quality");
        }
        if self.quality_floor <= self.min_encode_quality {
            return invalid("quality_floor must exceed min_encode_quality");
        }
        if self.downscale_below_quality <= self.min_encode_quality {
            return invalid("downscale_below_quality must exceed min_encode_quality");
        }
        if !(self.scale_step > 0.0 && self.scale_step < 1.0) {
            return invalid("scale_step must be within (0, 1)");
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return invalid("min_scale must be within (0, 1]");
        }
        Ok(())
    }
}
