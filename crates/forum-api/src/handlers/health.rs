//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use forum_service::dto::{HealthResponse, ReadinessResponse};
use tracing::{error, instrument};

use crate::state::AppState;

/// Liveness probe
#[instrument]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness probe
///
/// Verifies the database connection is usable; returns 503 when it is not.
#[instrument(skip(state))]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let database_healthy = match state.service_context().pool().acquire().await {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "Database health check failed");
            false
        }
    };

    let response = ReadinessResponse::ready(database_healthy);
    if database_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
