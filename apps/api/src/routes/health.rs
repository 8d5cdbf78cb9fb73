use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness probe with the server clock and the store's readiness.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let store = if state.store.is_ready().await {
        "ready"
    } else {
        "unavailable"
    };

    Json(json!({
        "status": "Server is running",
        "timestamp": Utc::now().to_rfc3339(),
        "store": store,
    }))
}
