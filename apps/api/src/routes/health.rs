use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Plain-text liveness line for load balancers and humans.
pub async fn root_handler() -> &'static str {
    "CareerDNA backend is live."
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "careerdna-api"
    }))
}

/// GET /api/ping
pub async fn ping_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}
