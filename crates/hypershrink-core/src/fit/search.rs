//! The degrade-and-retry loop.

use std::borrow::Cow;

use tracing::{debug, info};

use super::{
    Budget, EncodeAttempt, FailureReason, FitError, FitFailure, FitOutcome, FitSuccess,
    SearchParams,
};
use crate::decode::{resize_by_scale, DecodedImage, SourceImage};
use crate::encode::encode_decoded;

/// Fit-to-budget JPEG encoder.
///
/// Holds only its parameters; every call is independent, so one instance
/// can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct FitToBudget {
    params: SearchParams,
}

impl FitToBudget {
    /// Create an encoder with custom parameters.
    pub fn new(params: SearchParams) -> Result<Self, FitError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Encode `image` as a JPEG of at most `budget` bytes.
    pub fn encode(&self, image: &SourceImage, budget: Budget) -> Result<FitOutcome, FitError> {
        self.encode_with_observer(image, budget, |_| {})
    }

    /// Like [`encode`](Self::encode), reporting every attempt to `observer`.
    ///
    /// The search runs to completion before returning; the observer cannot
    /// cancel it.
    pub fn encode_with_observer<F>(
        &self,
        image: &SourceImage,
        budget: Budget,
        mut observer: F,
    ) -> Result<FitOutcome, FitError>
    where
        F: FnMut(&EncodeAttempt),
    {
        if image.color_mode().needs_normalization() {
            debug!(mode = ?image.color_mode(), "normalizing to rgb");
        }
        // Gray stays single-channel; everything else is RGB from here on.
        let base = image.normalize();
        if base.is_empty() {
            return Err(FitError::EmptyImage {
                width: base.width,
                height: base.height,
            });
        }

        let p = &self.params;
        let mut quality = p.initial_quality;
        let mut scale = 1.0_f64;
        let mut index = 0u32;

        loop {
            // Always resample from the full-size base, never from a previous attempt.
            let candidate: Cow<'_, DecodedImage> = if quality < p.downscale_below_quality {
                scale *= p.scale_step;
                Cow::Owned(resize_by_scale(&base, scale)?)
            } else {
                Cow::Borrowed(&base)
            };

            let bytes = encode_decoded(&candidate, quality)?;
            index += 1;

            let attempt = EncodeAttempt {
                index,
                quality,
                scale,
                width: candidate.width,
                height: candidate.height,
                size_bytes: bytes.len() as u64,
            };
            debug!(
                attempt = attempt.index,
                quality = attempt.quality,
                scale = attempt.scale,
                width = attempt.width,
                height = attempt.height,
                size = attempt.size_bytes,
                "encode attempt"
            );
            observer(&attempt);

            if budget.admits(attempt.size_bytes) {
                info!(
                    quality,
                    scale,
                    size = attempt.size_bytes,
                    attempts = index,
                    "fit within budget"
                );
                return Ok(FitOutcome::Success(FitSuccess {
                    bytes,
                    final_quality: quality,
                    final_scale: scale,
                    final_size_bytes: attempt.size_bytes,
                    width: attempt.width,
                    height: attempt.height,
                    attempts: index,
                }));
            }

            quality = quality
                .saturating_sub(p.quality_step)
                .max(p.min_encode_quality);

            if quality < p.quality_floor && scale < p.min_scale {
                info!(
                    budget = budget.bytes(),
                    last_size = attempt.size_bytes,
                    attempts = index,
                    "budget unreachable"
                );
                return Ok(FitOutcome::Failure(FitFailure {
                    reason: FailureReason::BudgetUnreachable,
                    last_attempt_size_bytes: attempt.size_bytes,
                    attempts: index,
                }));
            }
        }
    }
}

/// Encode `image` as a JPEG of at most `budget` bytes with default parameters.
pub fn fit_to_budget(image: &SourceImage, budget: Budget) -> Result<FitOutcome, FitError> {
    FitToBudget::default().encode(image, budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_image, ColorMode};
    use crate::test_support::{gradient_rgba, noise_rgb, paletted_bmp};
    use image::DynamicImage;

    fn noise_source(width: u32, height: u32) -> SourceImage {
        SourceImage::new(DynamicImage::ImageRgb8(noise_rgb(width, height, 7)))
    }

    fn collect_attempts(image: &SourceImage, budget: Budget) -> (FitOutcome, Vec<EncodeAttempt>) {
        let mut attempts = Vec::new();
        let outcome = FitToBudget::default()
            .encode_with_observer(image, budget, |a| attempts.push(*a))
            .unwrap();
        (outcome, attempts)
    }

    #[test]
    fn test_small_image_fits_on_first_attempt() {
        let image = noise_source(8, 8);
        let budget = Budget::from_megabytes(16).unwrap();

        match fit_to_budget(&image, budget).unwrap() {
            FitOutcome::Success(s) => {
                assert_eq!(s.final_quality, 95);
                assert_eq!(s.final_scale, 1.0);
                assert_eq!(s.attempts, 1);
                assert_eq!((s.width, s.height), (8, 8));
                assert_eq!(s.final_size_bytes, s.bytes.len() as u64);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_unreachable_budget_reports_failure() {
        let image = noise_source(64, 48);
        let budget = Budget::new(100).unwrap();

        match fit_to_budget(&image, budget).unwrap() {
            FitOutcome::Failure(f) => {
                assert_eq!(f.reason, FailureReason::BudgetUnreachable);
                assert!(f.last_attempt_size_bytes > 100);
                assert_eq!(f.attempts, 28);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_attempt_schedule() {
        let image = noise_source(64, 48);
        let (_, attempts) = collect_attempts(&image, Budget::new(100).unwrap());

        let qualities: Vec<u8> = attempts.iter().map(|a| a.quality).collect();
        assert_eq!(&qualities[..6], &[95, 90, 85, 80, 75, 70]);
        assert_eq!(&qualities[6..9], &[65, 60, 55]);
        // Quality stops at 1 instead of going to zero or below.
        assert_eq!(&qualities[18..], &[5, 1, 1, 1, 1, 1, 1, 1, 1, 1]);

        // Full size until quality drops below 70.
        for a in &attempts[..6] {
            assert_eq!(a.scale, 1.0);
            assert_eq!((a.width, a.height), (64, 48));
        }

        // First downscale at quality 65: 64*0.9 = 57.6, 48*0.9 = 43.2.
        assert!((attempts[6].scale - 0.9).abs() < 1e-12);
        assert_eq!((attempts[6].width, attempts[6].height), (57, 43));

        // Scale decays geometrically against the original size.
        for pair in attempts[6..].windows(2) {
            assert!((pair[1].scale - pair[0].scale * 0.9).abs() < 1e-12);
            assert!(pair[1].width <= pair[0].width);
        }

        let last = attempts.last().unwrap();
        assert!(last.scale < 0.1);
        assert_eq!(attempts.iter().map(|a| a.index).collect::<Vec<_>>(), (1..=28).collect::<Vec<_>>());
    }

    #[test]
    fn test_success_reports_iteration_state() {
        let image = noise_source(96, 96);
        let (_, attempts) = collect_attempts(&image, Budget::new(100).unwrap());

        // Budget equal to the 10th attempt's size must stop at or before it.
        let target = attempts[9];
        let (outcome, seen) = collect_attempts(&image, Budget::new(target.size_bytes).unwrap());

        match outcome {
            FitOutcome::Success(s) => {
                assert!(s.attempts <= 10);
                let last = seen.last().unwrap();
                assert_eq!(s.final_quality, last.quality);
                assert_eq!(s.final_scale, last.scale);
                assert_eq!(s.final_size_bytes, last.size_bytes);
                assert!(s.final_size_bytes <= target.size_bytes);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_rgba_is_normalized() {
        let image = SourceImage::new(DynamicImage::ImageRgba8(gradient_rgba(32, 32)));
        assert_eq!(image.color_mode(), ColorMode::Rgba);

        let bytes = fit_to_budget(&image, Budget::from_megabytes(1).unwrap())
            .unwrap()
            .into_bytes()
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_gray_source_stays_gray() {
        let gray = image::GrayImage::from_fn(48, 32, |x, y| image::Luma([(x * 5 + y * 3) as u8]));
        let image = SourceImage::new(DynamicImage::ImageLuma8(gray));

        let bytes = fit_to_budget(&image, Budget::from_megabytes(1).unwrap())
            .unwrap()
            .into_bytes()
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
        assert_eq!((decoded.width(), decoded.height()), (48, 32));
    }

    #[test]
    fn test_palette_image_produces_rgb_jpeg() {
        let image = decode_image(&paletted_bmp(16, 8)).unwrap();
        assert_eq!(image.color_mode(), ColorMode::Palette);

        let outcome = fit_to_budget(&image, Budget::from_megabytes(1).unwrap()).unwrap();
        let bytes = outcome.into_bytes().unwrap();

        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let image = SourceImage::new(DynamicImage::new_rgb8(0, 0));
        let result = fit_to_budget(&image, Budget::new(1000).unwrap());
        assert!(matches!(result, Err(FitError::EmptyImage { .. })));
    }

    #[test]
    fn test_tiny_image_terminates() {
        // Dimensions clamp at one pixel while the scale keeps shrinking.
        let image = noise_source(2, 2);
        let outcome = fit_to_budget(&image, Budget::new(10).unwrap()).unwrap();
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_custom_params() {
        let params = SearchParams {
            initial_quality: 60,
            ..SearchParams::default()
        };
        let encoder = FitToBudget::new(params).unwrap();
        let mut first = None;
        encoder
            .encode_with_observer(&noise_source(40, 40), Budget::new(100).unwrap(), |a| {
                first.get_or_insert(*a);
            })
            .unwrap();

        // Below the downscale threshold from the start.
        let first = first.unwrap();
        assert_eq!(first.quality, 60);
        assert!((first.scale - 0.9).abs() < 1e-12);
        assert_eq!((first.width, first.height), (36, 36));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = SearchParams {
            scale_step: 1.5,
            ..SearchParams::default()
        };
        assert!(matches!(
            FitToBudget::new(params),
            Err(FitError::InvalidParams(_))
        ));
    }
}
