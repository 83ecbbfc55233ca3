//! GET /ping

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe.
pub async fn ping() -> Json<Value> {
    tracing::debug!("ping");
    Json(json!({ "message": "pong" }))
}
