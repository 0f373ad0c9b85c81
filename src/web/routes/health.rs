//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (backend reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::web::dto::HealthResponse;
use crate::web::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_backend_health(&state).await {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let backend_ok = check_backend_health(&state).await;

    Json(HealthResponse {
        status: if backend_ok { "healthy" } else { "degraded" }.to_string(),
        backend: state.provider.name().to_string(),
        backend_status: if backend_ok { "ok" } else { "error" }.to_string(),
        views: state.views.len().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_backend_health(state: &AppState) -> bool {
    match state.provider.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(backend = state.provider.name(), "Backend health check failed: {}", e);
            false
        }
    }
}
