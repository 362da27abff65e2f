//! Label listing endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
    pub count: usize,
}

/// GET /labels - List all available building/location labels.
///
/// Re-reads the label file on every call; a failed read logs and yields
/// an empty list rather than an error, matching the label-store contract.
pub async fn get_labels(State(state): State<SharedState>) -> Json<LabelsResponse> {
    let labels = state.context.reload_labels();
    Json(LabelsResponse {
        count: labels.len(),
        labels: labels.as_ref().clone(),
    })
}
