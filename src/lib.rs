//! # Campus Building Classifier
//!
//! A Rust library for classifying campus-building photos with a pretrained
//! ONNX model, backed by a deterministic mock predictor when no model
//! artifact is available. Designed to sit behind a small HTTP API that a
//! frontend demo consumes.
//!
//! ## Features
//!
//! - **ONNX Runtime inference** with a prioritized model-artifact search
//! - **Deterministic mock fallback** keyed on image content, so the API
//!   stays usable before a model has been trained
//! - **ImageNet-style preprocessing** (224x224, per-channel normalization)
//! - **Schema-stable predictions**: every call returns a well-formed result
//!
//! ## Modules
//!
//! - `labels`: loading and atomic replacement of the class-name list
//! - `model`: the `Scorer` trait, ONNX session wrapper, and artifact probing
//! - `inference`: preprocessing, mock prediction, and the prediction pipeline
//! - `utils`: error types and logging helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use campus_classifier::ClassifierContext;
//!
//! let ctx = ClassifierContext::initialize("assets/labels.json", "models", false);
//! let prediction = ctx.predict(&image_bytes);
//! println!("{} ({:.2}%)", prediction.pred, prediction.confidence * 100.0);
//! ```

pub mod inference;
pub mod labels;
pub mod model;
pub mod utils;

// Re-export commonly used items for convenience
pub use inference::mock::{mock_predict, DEFAULT_MOCK_NOTE};
pub use inference::pipeline::{ClassProbability, ClassifierContext, Prediction};
pub use inference::preprocess::{decode_image, preprocess};
pub use labels::LabelStore;
pub use model::{load_model, OnnxScorer, Scorer};
pub use utils::error::{ClassifierError, Result};

/// Square input resolution expected by the model (pixels)
pub const INPUT_SIZE: u32 = 224;

/// Number of ranked predictions returned per request
pub const TOP_K: usize = 5;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
