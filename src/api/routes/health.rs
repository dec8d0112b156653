//! Health check routes.

use super::AppState;
use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde_json::{Value, json};

/// Create the health router.
pub fn health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/ping", get(ping))
}

/// GET /health - Service and storage health.
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.storage.ping().await {
        Ok(()) => "healthy".to_string(),
        Err(e) => format!("unhealthy: {}", e),
    };

    let status = if db_status == "healthy" { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "timestamp": Utc::now().to_rfc3339(),
        "service": state.settings.app_name,
        "version": state.settings.app_version,
        "database": db_status,
    }))
}

/// GET /health/ping - Liveness only.
async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}
