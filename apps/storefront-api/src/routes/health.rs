//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Present when the SQLite backend is in use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
}

/// GET /health: Returns system health status.
///
/// With a database behind the cart, an unreachable pool reports
/// `degraded` with 503.
pub async fn check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let Some(db) = &state.database else {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: None,
            }),
        );
    };

    if db.health_check().await {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: Some("ok"),
            }),
        )
    } else {
        warn!("Database health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                database: Some("unavailable"),
            }),
        )
    }
}
