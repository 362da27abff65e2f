//! Error Handling Module
//!
//! Defines custom error types for the campus classifier library.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Main error type for classifier operations
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Error decoding an uploaded image
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// Error transforming a decoded image into a model input tensor
    #[error("Preprocessing error: {0}")]
    Preprocess(String),

    /// Error loading a model artifact
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Error during a forward pass
    #[error("Inference error: {0}")]
    Inference(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClassifierError::Inference("output shape mismatch".to_string());
        assert_eq!(format!("{}", err), "Inference error: output shape mismatch");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "labels.json");
        let err: ClassifierError = io_err.into();
        assert!(matches!(err, ClassifierError::Io(_)));
    }
}
