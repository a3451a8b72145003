use axum::response::Json;
use serde_json::{Value, json};

/// Liveness endpoint. Reports the service name and build version; it does
/// not touch the stores or the upstream, so it answers even when Spotify
/// is down.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
