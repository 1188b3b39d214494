//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let database = match state.stores.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "degraded",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "unreachable"
        }
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: if database == "connected" { "ok" } else { "degraded" }.to_string(),
        backend: state.stores.backend().to_string(),
        database: database.to_string(),
        mail_provider: state.mailer.provider_type().to_string(),
    }))
}
