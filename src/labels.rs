//! Label Store
//!
//! Loads the ordered list of building/location class names from a JSON
//! resource. The index of a label corresponds to the model's output class
//! index when a real model is in use, so order matters.
//!
//! Loading never fails outward: a missing or malformed file logs an error
//! and yields an empty list. Each successful reload swaps the whole set
//! atomically, so concurrent readers never observe a partial list.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{error, info};

/// Placeholder labels used by the mock predictor when no label file could
/// be loaded, so responses are never degenerate.
pub const FALLBACK_LABELS: [&str; 7] = [
    "CSE Building",
    "ECE Building",
    "Mechanical Building",
    "Civil Engineering",
    "LA Lawns 1",
    "LA Lawns 2",
    "BMBT Building",
];

/// Ordered, atomically replaceable set of class names.
pub struct LabelStore {
    path: PathBuf,
    active: RwLock<Arc<Vec<String>>>,
}

impl LabelStore {
    /// Create a store backed by the given JSON file and load it once.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            active: RwLock::new(Arc::new(Vec::new())),
        };
        store.reload();
        store
    }

    /// Re-read the label file, replacing the active set in one swap.
    ///
    /// On any failure the active set becomes empty; the failure is logged
    /// and never surfaced to the caller.
    pub fn reload(&self) -> Arc<Vec<String>> {
        let labels = match read_label_file(&self.path) {
            Ok(labels) => {
                info!("loaded {} labels from {:?}", labels.len(), self.path);
                labels
            }
            Err(e) => {
                error!("failed to load labels from {:?}: {}", self.path, e);
                Vec::new()
            }
        };

        let labels = Arc::new(labels);
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        *active = labels.clone();
        labels
    }

    /// Current label set. Cheap to call; clones an `Arc`, not the labels.
    pub fn current(&self) -> Arc<Vec<String>> {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of labels in the active set
    pub fn count(&self) -> usize {
        self.current().len()
    }

    /// Built-in placeholder labels as owned strings
    pub fn fallback() -> Vec<String> {
        FALLBACK_LABELS.iter().map(|s| s.to_string()).collect()
    }
}

fn read_label_file(path: &Path) -> crate::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    let labels: Vec<String> = serde_json::from_str(&text)?;
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_labels(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("labels.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_labels(&dir, r#"["Library", "Gym", "Cafeteria"]"#);

        let store = LabelStore::new(&path);
        assert_eq!(store.count(), 3);
        assert_eq!(store.current()[0], "Library");
    }

    #[test]
    fn test_missing_file_yields_empty_set() {
        let store = LabelStore::new("/nonexistent/labels.json");
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_malformed_file_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_labels(&dir, "not json at all");

        let store = LabelStore::new(&path);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_reload_replaces_whole_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_labels(&dir, r#"["Library"]"#);

        let store = LabelStore::new(&path);
        let before = store.current();
        assert_eq!(before.len(), 1);

        fs::write(&path, r#"["Gym", "Cafeteria"]"#).unwrap();
        store.reload();

        assert_eq!(store.count(), 2);
        // The previously handed-out Arc is untouched by the swap
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn test_fallback_has_at_least_five_labels() {
        assert!(LabelStore::fallback().len() >= 5);
    }
}
