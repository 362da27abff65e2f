//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct PingResponse {
    pub status: String,
    pub timestamp: String,
    pub message: String,
    pub uptime_seconds: u64,
}

/// GET /ping - Health check endpoint
pub async fn ping(State(state): State<SharedState>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        message: "Campus Building Classifier API is running".to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}
