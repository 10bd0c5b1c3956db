use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::api::routes::AppState;

/// GET /health
///
/// Reports the build version and whether the database answers.
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<Value>) {
    match app_state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "version": crate::VERSION, "database": "connected" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "version": crate::VERSION, "database": "error" })),
            )
        }
    }
}
