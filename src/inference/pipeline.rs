//! Prediction pipeline.
//!
//! Orchestrates decode -> preprocess -> (model or mock) -> ranked result.
//! The pipeline never fails outward: every code path, including unexpected
//! scorer errors, yields a well-formed [`Prediction`], and failure context
//! travels in the `notes` field.

use std::path::Path;
use std::sync::Arc;

use ndarray::Array4;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::inference::mock::{mock_predict, DEFAULT_MOCK_NOTE};
use crate::inference::preprocess::{decode_image, preprocess};
use crate::inference::round_confidence;
use crate::labels::LabelStore;
use crate::model::{load_model, Scorer};
use crate::utils::error::{ClassifierError, Result};
use crate::TOP_K;

/// A single ranked class with its confidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassProbability {
    pub class: String,
    pub confidence: f64,
}

/// Result of one prediction request.
///
/// Invariants: `probs` is sorted non-increasing by confidence, its length
/// is `min(5, |labels|)`, and `pred`/`confidence` mirror `probs[0]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Top predicted building
    pub pred: String,
    /// Confidence of the top prediction
    pub confidence: f64,
    /// Ranked candidate labels, best first
    pub probs: Vec<ClassProbability>,
    /// Provenance of the result ("real" vs "mock", device, error context)
    pub notes: String,
    /// Reserved for Grad-CAM visualizations; currently always absent
    pub gradcam_base64: Option<String>,
}

/// Everything the pipeline needs to answer a request: the label set and
/// the optional scorer. Constructed once at startup and read-only after
/// that, apart from atomic label reloads.
pub struct ClassifierContext {
    labels: LabelStore,
    scorer: Option<Box<dyn Scorer>>,
}

impl ClassifierContext {
    /// Build a context from already constructed parts.
    pub fn new(labels: LabelStore, scorer: Option<Box<dyn Scorer>>) -> Self {
        Self { labels, scorer }
    }

    /// Load labels and attempt the one-time model load.
    ///
    /// A failed model load is not an error; the context simply answers
    /// with mock predictions.
    pub fn initialize(
        labels_path: impl AsRef<Path>,
        models_dir: impl AsRef<Path>,
        force_mock: bool,
    ) -> Self {
        let labels = LabelStore::new(labels_path);
        let scorer = load_model(models_dir.as_ref(), force_mock)
            .map(|s| Box::new(s) as Box<dyn Scorer>);
        Self::new(labels, scorer)
    }

    /// Current label set
    pub fn labels(&self) -> Arc<Vec<String>> {
        self.labels.current()
    }

    /// Re-read the label file, atomically replacing the active set
    pub fn reload_labels(&self) -> Arc<Vec<String>> {
        self.labels.reload()
    }

    /// Whether a real model is loaded
    pub fn has_model(&self) -> bool {
        self.scorer.is_some()
    }

    /// Device description of the loaded model, if any
    pub fn device(&self) -> Option<&str> {
        self.scorer.as_deref().map(|s| s.device())
    }

    /// Classify an uploaded image.
    ///
    /// Linear state machine: decode, preprocess, score (or mock). Every
    /// failure branch delegates to the mock predictor with the original
    /// upload bytes, so repeated uploads of the same image stay
    /// deterministic even in fallback.
    pub fn predict(&self, image_bytes: &[u8]) -> Prediction {
        let labels = self.labels.current();

        let image = match decode_image(image_bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!("image decode failed: {}", e);
                return mock_predict(Some(image_bytes), &labels, "Error preprocessing image");
            }
        };

        let tensor = match preprocess(&image) {
            Ok(tensor) => tensor,
            Err(e) => {
                warn!("preprocessing failed: {}", e);
                return mock_predict(Some(image_bytes), &labels, "Error preprocessing image");
            }
        };

        let scorer = match &self.scorer {
            Some(scorer) => scorer.as_ref(),
            None => return mock_predict(Some(image_bytes), &labels, DEFAULT_MOCK_NOTE),
        };

        match real_predict(scorer, &tensor, &labels) {
            Ok(prediction) => prediction,
            Err(e) => {
                error!("real inference failed: {}", e);
                mock_predict(Some(image_bytes), &labels, &format!("Error: {}", e))
            }
        }
    }
}

/// Forward pass, softmax, top-k ranking.
fn real_predict(scorer: &dyn Scorer, tensor: &Array4<f32>, labels: &[String]) -> Result<Prediction> {
    let logits = scorer.score(tensor)?;

    let num_classes = TOP_K.min(labels.len());
    if num_classes == 0 {
        return Err(ClassifierError::Inference(
            "no labels loaded for real inference".to_string(),
        ));
    }
    // A model emitting fewer classes than we must rank cannot satisfy the
    // |probs| == min(5, |labels|) contract; treat it as a mismatch.
    if logits.len() < num_classes {
        return Err(ClassifierError::Inference(format!(
            "model returned {} class scores, need at least {}",
            logits.len(),
            num_classes
        )));
    }

    let probabilities = softmax(&logits);

    let mut indexed: Vec<(usize, f32)> = probabilities.into_iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let probs: Vec<ClassProbability> = indexed
        .into_iter()
        .take(num_classes)
        .map(|(idx, prob)| {
            // Guards against a label-set/model class-count mismatch
            let class = labels
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("Unknown_{}", idx));
            ClassProbability {
                class,
                confidence: round_confidence(prob as f64),
            }
        })
        .collect();

    Ok(Prediction {
        pred: probs[0].class.clone(),
        confidence: probs[0].confidence,
        probs,
        notes: format!("Real inference on {}", scorer.device()),
        gradcam_base64: compute_gradcam(scorer, tensor),
    })
}

/// Numerically stable softmax over the class dimension
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}

/// Compute a Grad-CAM visualization as a base64 PNG.
///
/// Reserved extension point: always `None` for now.
pub fn compute_gradcam(_scorer: &dyn Scorer, _tensor: &Array4<f32>) -> Option<String> {
    None
}
