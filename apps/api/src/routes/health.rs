use axum::{extract::State, http::Uri, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "Email Backend"
    }))
}

/// GET /
/// Service metadata and endpoint index.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "endpoints": {
            "health": "/health",
            "applications": "/api/applications",
            "teams": "/api/teams"
        }
    }))
}

/// Fallback for unknown routes.
pub async fn not_found_handler(uri: Uri) -> (StatusCode, Json<Value>) {
    tracing::warn!("Route not found: {uri}");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": {
                "code": "ROUTE_NOT_FOUND",
                "message": "Route not found"
            },
            "path": uri.to_string()
        })),
    )
}
