use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "partbin-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /api/v1/health/detailed
pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let stats = state.components.stats().await;

    Json(json!({
        "status": "healthy",
        "service": "partbin-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "store": {
                "status": "healthy",
                "components": stats.total_components
            },
            "import": {
                "status": "healthy",
                "allowedExtensions": state.config.import.allowed_extensions
            }
        }
    }))
}
