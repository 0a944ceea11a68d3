//! Root health endpoint, answering the same probe the connectivity monitor sends.

use axum::Json;
use serde_json::{json, Value};

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "message": "GROMACS GUI API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
