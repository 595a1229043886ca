//! Liveness and model configuration status.

use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

/// Always 200. `geminiConfigured` tells clients whether solves can succeed.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "geminiConfigured": state.solver.is_configured(),
        "model": state.solver.model_name(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
