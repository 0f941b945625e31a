// ABOUTME: Liveness endpoint
// ABOUTME: Reports service version and whether the completion key is usable

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "intake",
        "model": state.completion.model(),
        "model_configured": state.completion.is_configured(),
        "active_sessions": state.sessions.len().await,
    }))
}
