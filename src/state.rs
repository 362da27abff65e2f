//! Application state for the classifier server
//!
//! Owns the server configuration and the classifier context. The context
//! is initialized once before the server starts and never mutated after
//! that, apart from atomic label reloads.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use campus_classifier::ClassifierContext;

/// Server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the labels JSON resource
    pub labels_path: PathBuf,
    /// Directory probed for model artifacts
    pub models_dir: PathBuf,
    /// Skip model loading entirely and serve mock predictions
    pub force_mock: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            labels_path: PathBuf::from("assets/labels.json"),
            models_dir: PathBuf::from("models"),
            force_mock: false,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Labels plus optional model, initialized at startup
    pub context: ClassifierContext,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, context: ClassifierContext) -> Self {
        Self {
            config,
            context,
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
