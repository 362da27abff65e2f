//! Inference module: preprocessing, mock prediction, and the pipeline
//!
//! This module provides:
//! - Image decoding and ImageNet-style preprocessing
//! - A deterministic mock predictor for when no model is available
//! - The prediction pipeline orchestrating preprocess -> score -> rank

pub mod mock;
pub mod pipeline;
pub mod preprocess;

// Re-export main types for convenience
pub use mock::{mock_predict, DEFAULT_MOCK_NOTE};
pub use pipeline::{ClassProbability, ClassifierContext, Prediction};
pub use preprocess::{decode_image, preprocess};

/// Round a confidence to 4 decimal places for the wire format
pub(crate) fn round_confidence(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
