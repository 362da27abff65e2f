//! Prediction endpoint
//!
//! Accepts a multipart image upload, validates the file type, and runs the
//! prediction pipeline. Upload validation problems map to 400 responses;
//! everything past that point returns 200 with a well-formed prediction
//! (failure context travels in the `notes` field).

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::debug;

use campus_classifier::Prediction;

use crate::state::SharedState;

/// File extensions accepted for upload
const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn bad_request(detail: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// POST /predict - Classify an uploaded building photo.
///
/// Expects a multipart form with a `file` field. Returns the top
/// prediction plus a ranked top-5 list with confidence scores.
pub async fn predict(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<Prediction>, (StatusCode, Json<ErrorResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let ext = extension_of(&filename);
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(bad_request(format!(
                "Unsupported file type: '.{}'. Allowed: {:?}",
                ext, ALLOWED_EXTENSIONS
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Failed to read upload: {}", e)))?;
        if bytes.is_empty() {
            return Err(bad_request("Empty file"));
        }

        debug!("predicting on upload '{}' ({} bytes)", filename, bytes.len());
        return Ok(Json(state.context.predict(&bytes)));
    }

    Err(bad_request("No file uploaded"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), "jpg");
        assert_eq!(extension_of("archive.tar.png"), "png");
        assert_eq!(extension_of("noextension"), "");
    }

    #[test]
    fn test_allowed_extensions_cover_common_formats() {
        for ext in ["jpg", "jpeg", "png", "webp"] {
            assert!(ALLOWED_EXTENSIONS.contains(&ext));
        }
        assert!(!ALLOWED_EXTENSIONS.contains(&"svg"));
    }
}
