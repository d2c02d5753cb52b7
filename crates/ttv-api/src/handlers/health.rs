//! Health and readiness handlers.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe: reports admission counters so orchestration can see
/// the instance doing work.
pub async fn ready(State(state): State<AppState>) -> Json<Value> {
    let stats = state.manager.stats().await;
    Json(json!({
        "status": "ready",
        "in_flight": stats.in_flight,
        "max_concurrent": state.manager.max_concurrent(),
    }))
}
