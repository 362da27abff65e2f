//! Mock predictor.
//!
//! Fabricates a schema-valid prediction when no trained model is loaded
//! (or when the real path failed), so the frontend demo keeps working.
//! When the original upload bytes are supplied, the generator is seeded
//! from a content hash: identical images always produce identical mock
//! results. The confidences are drawn from a symmetric Dirichlet, which
//! makes them non-negative and sum to 1 like a real softmax output.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Dirichlet, Distribution};
use sha2::{Digest, Sha256};

use crate::inference::pipeline::{ClassProbability, Prediction};
use crate::inference::round_confidence;
use crate::labels::LabelStore;
use crate::TOP_K;

/// Note attached to mock predictions unless the caller supplies its own
pub const DEFAULT_MOCK_NOTE: &str = "Using mock inference";

/// Derive a generator seed from image content.
///
/// Content-addressed on purpose: the same bytes must seed the same way no
/// matter where they came from.
pub fn seed_from_bytes(bytes: &[u8]) -> u64 {
    let digest = Sha256::digest(bytes);
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(seed)
}

/// Fabricate a ranked prediction over the given label set.
///
/// With `image_bytes` present the result is deterministic per image; with
/// `None` the generator is entropy-seeded. An empty label set falls back
/// to the built-in placeholder labels so the response is never degenerate.
pub fn mock_predict(image_bytes: Option<&[u8]>, labels: &[String], notes: &str) -> Prediction {
    let fallback;
    let labels = if labels.is_empty() {
        fallback = LabelStore::fallback();
        fallback.as_slice()
    } else {
        labels
    };

    let mut rng = match image_bytes {
        Some(bytes) => ChaCha8Rng::seed_from_u64(seed_from_bytes(bytes)),
        None => ChaCha8Rng::from_entropy(),
    };

    let num_classes = TOP_K.min(labels.len());
    let selected: Vec<String> = labels
        .choose_multiple(&mut rng, num_classes)
        .cloned()
        .collect();

    let raw_scores = if num_classes < 2 {
        vec![1.0]
    } else {
        // Symmetric Dirichlet(1): non-negative, sums to 1, softmax-shaped
        match Dirichlet::new_with_size(1.0f64, num_classes) {
            Ok(dist) => dist.sample(&mut rng),
            Err(_) => vec![1.0 / num_classes as f64; num_classes],
        }
    };

    let mut ranked: Vec<(String, f64)> = selected.into_iter().zip(raw_scores).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let probs: Vec<ClassProbability> = ranked
        .into_iter()
        .map(|(class, confidence)| ClassProbability {
            class,
            confidence: round_confidence(confidence),
        })
        .collect();

    Prediction {
        pred: probs[0].class.clone(),
        confidence: probs[0].confidence,
        probs,
        notes: notes.to_string(),
        gradcam_base64: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campus_labels() -> Vec<String> {
        [
            "Library", "Gym", "Cafeteria", "Dorm A", "Dorm B", "Lecture Hall", "Lab Complex",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_same_bytes_same_prediction() {
        let labels = campus_labels();
        let bytes = b"fake image content";

        let a = mock_predict(Some(bytes), &labels, DEFAULT_MOCK_NOTE);
        let b = mock_predict(Some(bytes), &labels, DEFAULT_MOCK_NOTE);

        assert_eq!(a.pred, b.pred);
        assert_eq!(a.confidence, b.confidence);
        for (pa, pb) in a.probs.iter().zip(b.probs.iter()) {
            assert_eq!(pa.class, pb.class);
            assert_eq!(pa.confidence, pb.confidence);
        }
    }

    #[test]
    fn test_different_bytes_usually_differ() {
        let labels = campus_labels();
        let a = mock_predict(Some(b"image one"), &labels, DEFAULT_MOCK_NOTE);
        let b = mock_predict(Some(b"image two"), &labels, DEFAULT_MOCK_NOTE);
        // Seeds differ, so the ranked lists should not be identical
        let same = a.probs.iter().zip(b.probs.iter()).all(|(x, y)| {
            x.class == y.class && x.confidence == y.confidence
        });
        assert!(!same);
    }

    #[test]
    fn test_probs_sorted_and_sum_to_one() {
        let labels = campus_labels();
        let prediction = mock_predict(Some(b"abc"), &labels, DEFAULT_MOCK_NOTE);

        assert_eq!(prediction.probs.len(), 5);
        for pair in prediction.probs.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }

        let sum: f64 = prediction.probs.iter().map(|p| p.confidence).sum();
        // 4-decimal rounding per entry bounds the drift
        assert!((sum - 1.0).abs() < 5e-4 * prediction.probs.len() as f64);
    }

    #[test]
    fn test_top_entry_mirrors_probs() {
        let labels = campus_labels();
        let prediction = mock_predict(Some(b"xyz"), &labels, DEFAULT_MOCK_NOTE);
        assert_eq!(prediction.pred, prediction.probs[0].class);
        assert_eq!(prediction.confidence, prediction.probs[0].confidence);
    }

    #[test]
    fn test_selected_labels_are_distinct() {
        let labels = campus_labels();
        let prediction = mock_predict(Some(b"distinct"), &labels, DEFAULT_MOCK_NOTE);
        let mut classes: Vec<&str> = prediction.probs.iter().map(|p| p.class.as_str()).collect();
        classes.sort_unstable();
        classes.dedup();
        assert_eq!(classes.len(), prediction.probs.len());
    }

    #[test]
    fn test_empty_label_set_uses_fallback() {
        let prediction = mock_predict(Some(b"abc"), &[], DEFAULT_MOCK_NOTE);
        assert_eq!(prediction.probs.len(), 5);
        assert!(!prediction.pred.is_empty());
    }

    #[test]
    fn test_small_label_set_caps_probs_length() {
        let labels: Vec<String> = vec!["Library".to_string(), "Gym".to_string()];
        let prediction = mock_predict(Some(b"abc"), &labels, DEFAULT_MOCK_NOTE);
        assert_eq!(prediction.probs.len(), 2);
    }

    #[test]
    fn test_single_label_gets_full_confidence() {
        let labels = vec!["Library".to_string()];
        let prediction = mock_predict(Some(b"abc"), &labels, DEFAULT_MOCK_NOTE);
        assert_eq!(prediction.probs.len(), 1);
        assert_eq!(prediction.confidence, 1.0);
    }

    #[test]
    fn test_custom_note_is_carried() {
        let labels = campus_labels();
        let prediction = mock_predict(None, &labels, "Error preprocessing image");
        assert_eq!(prediction.notes, "Error preprocessing image");
    }

    #[test]
    fn test_gradcam_is_absent() {
        let prediction = mock_predict(Some(b"abc"), &campus_labels(), DEFAULT_MOCK_NOTE);
        assert!(prediction.gradcam_base64.is_none());
    }
}
