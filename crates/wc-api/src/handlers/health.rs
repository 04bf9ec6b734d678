use axum::{extract::State, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::SharedState;

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readyz(
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.readiness.load(std::sync::atomic::Ordering::SeqCst) {
        return Err(ApiError::ServiceUnavailable("shutting_down".into()));
    }

    Ok(Json(json!({
        "status": "ok",
        "application": env!("CARGO_PKG_NAME"),
    })))
}
