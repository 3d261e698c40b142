//! Fit-to-budget WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, fit_to_budget_mb } from '@hypershrink/wasm';
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const result = fit_to_budget_mb(image, 16);
//! if (result.success) {
//!   const blob = new Blob([result.bytes()], { type: 'image/jpeg' });
//!   console.log(`q=${result.final_quality} scale=${result.final_scale}`);
//! } else {
//!   console.warn(result.failure_reason, result.to_json());
//! }
//! ```

use crate::types::JsSourceImage;
use hypershrink_core::fit::{self, Budget, FitOutcome, FitToBudget};
use tracing::debug;
use wasm_bindgen::prelude::*;

/// Outcome of a budget search.
#[wasm_bindgen]
pub struct JsFitResult {
    outcome: FitOutcome,
}

#[wasm_bindgen]
impl JsFitResult {
    /// True when the output met the budget.
    #[wasm_bindgen(getter)]
    pub fn success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Number of encodes the search performed.
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.outcome.attempts()
    }

    #[wasm_bindgen(getter)]
    pub fn final_quality(&self) -> Option<u8> {
        match &self.outcome {
            FitOutcome::Success(s) => Some(s.final_quality),
            FitOutcome::Failure(_) => None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn final_scale(&self) -> Option<f64> {
        match &self.outcome {
            FitOutcome::Success(s) => Some(s.final_scale),
            FitOutcome::Failure(_) => None,
        }
    }

    /// Size of the JPEG on success, of the last attempt on failure.
    #[wasm_bindgen(getter)]
    pub fn size_bytes(&self) -> f64 {
        match &self.outcome {
            FitOutcome::Success(s) => s.final_size_bytes as f64,
            FitOutcome::Failure(f) => f.last_attempt_size_bytes as f64,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn failure_reason(&self) -> Option<String> {
        match &self.outcome {
            FitOutcome::Success(_) => None,
            FitOutcome::Failure(f) => Some(f.reason.to_string()),
        }
    }

    /// JPEG bytes as a Uint8Array (empty on failure).
    ///
    /// Note: This copies the buffer out of WASM memory.
    pub fn bytes(&self) -> Vec<u8> {
        match &self.outcome {
            FitOutcome::Success(s) => s.bytes.clone(),
            FitOutcome::Failure(_) => Vec::new(),
        }
    }

    /// Result metadata as a plain object (without the JPEG bytes).
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.outcome).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsFitResult {
    pub(crate) fn from_outcome(outcome: FitOutcome) -> Self {
        Self { outcome }
    }
}

/// Re-encode `image` as a JPEG of at most `budget_bytes` bytes.
///
/// # Errors
///
/// Returns an error for a zero budget, an empty image, or an encoder failure.
/// Running out of room is not an error; check `success` on the result.
#[wasm_bindgen]
pub fn fit_to_budget(image: &JsSourceImage, budget_bytes: u32) -> Result<JsFitResult, JsValue> {
    let budget = Budget::new(u64::from(budget_bytes)).map_err(to_js)?;
    run(image, budget)
}

/// Re-encode `image` as a JPEG of at most `megabytes` × 1,048,576 bytes.
#[wasm_bindgen]
pub fn fit_to_budget_mb(image: &JsSourceImage, megabytes: u32) -> Result<JsFitResult, JsValue> {
    let budget = Budget::from_megabytes(megabytes).map_err(to_js)?;
    run(image, budget)
}

/// Like [`fit_to_budget`], calling `on_attempt` with each attempt as a plain
/// object `{ index, quality, scale, width, height, size_bytes }`.
///
/// The search still runs to completion; exceptions thrown by the callback
/// are logged at debug level and do not stop it.
#[wasm_bindgen]
pub fn fit_to_budget_with_progress(
    image: &JsSourceImage,
    budget_bytes: u32,
    on_attempt: &js_sys::Function,
) -> Result<JsFitResult, JsValue> {
    let budget = Budget::new(u64::from(budget_bytes)).map_err(to_js)?;
    FitToBudget::default()
        .encode_with_observer(image.source(), budget, |attempt| {
            let value = match serde_wasm_bindgen::to_value(attempt) {
                Ok(value) => value,
                Err(e) => {
                    debug!(attempt = attempt.index, error = %e, "attempt not serializable");
                    return;
                }
            };
            if let Err(e) = on_attempt.call1(&JsValue::NULL, &value) {
                debug!(attempt = attempt.index, error = ?e, "progress callback threw");
            }
        })
        .map(JsFitResult::from_outcome)
        .map_err(to_js)
}

fn run(image: &JsSourceImage, budget: Budget) -> Result<JsFitResult, JsValue> {
    fit::fit_to_budget(image.source(), budget)
        .map(JsFitResult::from_outcome)
        .map_err(to_js)
}

fn to_js(e: fit::FitError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
