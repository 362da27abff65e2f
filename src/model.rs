//! Model loading and the scoring abstraction.
//!
//! A trained classifier is shipped as an ONNX artifact. At startup we probe
//! a prioritized list of candidate files and load the first one that
//! deserializes; if none does, the service runs in mock mode. The loaded
//! session is wrapped behind the [`Scorer`] trait so the pipeline never
//! depends on the concrete runtime.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array4;
#[cfg(feature = "cuda")]
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tracing::{info, warn};

use crate::utils::error::{ClassifierError, Result};

/// Model artifact filenames to attempt loading, in order of preference.
/// The first candidate that exists and deserializes wins.
pub const MODEL_CANDIDATES: [&str; 3] = ["resnet18_best.onnx", "ensemble.onnx", "model.onnx"];

/// A loaded, ready-to-score model.
///
/// `score` must be side-effect-free per invocation so concurrent requests
/// can share one scorer.
pub trait Scorer: Send + Sync {
    /// Run a forward pass on a (1, 3, H, W) input tensor and return the
    /// raw per-class logits, flattened.
    fn score(&self, input: &Array4<f32>) -> Result<Vec<f32>>;

    /// Human-readable description of the compute device in use
    fn device(&self) -> &str;
}

/// ONNX Runtime backed scorer.
///
/// The session is held behind a `Mutex`: ONNX Runtime sessions need
/// exclusive access to run, and serializing the forward pass keeps the
/// scorer safe for unsynchronized concurrent callers.
pub struct OnnxScorer {
    session: Mutex<Session>,
    model_path: PathBuf,
    device: String,
}

impl OnnxScorer {
    /// Deserialize an ONNX artifact from disk onto the active device.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let builder = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .map_err(|e| {
                ClassifierError::ModelLoad(format!("failed to create session builder: {}", e))
            })?;

        #[cfg(feature = "cuda")]
        let builder = builder
            .with_execution_providers([
                CUDAExecutionProvider::default().build(),
                // CPU fallback if no CUDA device is present at runtime
                CPUExecutionProvider::default().build(),
            ])
            .map_err(|e| {
                ClassifierError::ModelLoad(format!("failed to register execution providers: {}", e))
            })?;

        let session = builder.commit_from_file(path).map_err(|e| {
            ClassifierError::ModelLoad(format!("failed to load model from {:?}: {}", path, e))
        })?;

        let device = if cfg!(feature = "cuda") { "cuda" } else { "cpu" };

        Ok(Self {
            session: Mutex::new(session),
            model_path: path.to_path_buf(),
            device: device.to_string(),
        })
    }

    /// Path of the artifact this scorer was loaded from
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Scorer for OnnxScorer {
    fn score(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        let tensor = Tensor::from_array(input.clone()).map_err(|e| {
            ClassifierError::Inference(format!("failed to create input tensor: {}", e))
        })?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("failed to acquire session lock".to_string()))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ClassifierError::Inference("model session has no outputs".to_string()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ClassifierError::Inference(format!("forward pass failed: {}", e)))?;

        let value = outputs.get(output_name.as_str()).ok_or_else(|| {
            ClassifierError::Inference(format!("output '{}' not found", output_name))
        })?;

        let logits = value.try_extract_array::<f32>().map_err(|e| {
            ClassifierError::Inference(format!("failed to extract output tensor: {}", e))
        })?;

        Ok(logits.iter().copied().collect())
    }

    fn device(&self) -> &str {
        &self.device
    }
}

/// Candidate artifact paths that currently exist on disk, in priority order.
pub fn existing_candidates(models_dir: &Path) -> Vec<PathBuf> {
    MODEL_CANDIDATES
        .iter()
        .map(|name| models_dir.join(name))
        .filter(|path| path.exists())
        .collect()
}

/// Probe the candidate list and load the first usable model.
///
/// Per-candidate failures are logged and skipped. Exhausting every
/// candidate returns `None` (mock mode), never an error. Called exactly
/// once at startup; the result is read-only afterwards.
pub fn load_model(models_dir: &Path, force_mock: bool) -> Option<OnnxScorer> {
    if force_mock {
        info!("mock mode forced (force_mock=true)");
        return None;
    }

    for path in existing_candidates(models_dir) {
        info!("found model candidate at {:?}", path);
        match OnnxScorer::from_file(&path) {
            Ok(scorer) => {
                info!(
                    "model loaded from {:?} (device: {})",
                    scorer.model_path(),
                    scorer.device()
                );
                return Some(scorer);
            }
            Err(e) => {
                warn!("failed to load model from {:?}: {}", path, e);
            }
        }
    }

    info!("no usable model found, falling back to mock inference");
    info!("expected model files at:");
    for name in MODEL_CANDIDATES {
        info!("  - {:?}", models_dir.join(name));
    }
    None
}
