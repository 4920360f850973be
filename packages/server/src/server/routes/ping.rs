use axum::Json;
use serde_json::{json, Value};

/// Liveness probe
pub async fn ping_handler() -> Json<Value> {
    Json(json!({ "ping": "pong!" }))
}

pub async fn test_handler() -> Json<Value> {
    Json(json!({ "hello": "world!" }))
}
