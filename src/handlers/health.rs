use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use once_cell::sync::Lazy;
use std::time::Instant;
use tracing::{debug, info};

use crate::models::HealthResponse;
use crate::state::AppState;

static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// Pins the uptime clock; called once at startup.
pub fn mark_started() {
    Lazy::force(&STARTED_AT);
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let metrics = state.limiter.metrics();
    let status = if metrics.available_permits > 0 {
        "healthy"
    } else {
        "saturated"
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds: STARTED_AT.elapsed().as_secs(),
        max_file_size_mb: state.config.max_file_size_mb,
        rate_limiting: metrics,
    };

    info!(
        status = status,
        total_requests = metrics.total_requests,
        rejected_requests = metrics.rejected_requests,
        "Health check completed"
    );

    Json(response)
}

/// Readiness check endpoint
pub async fn ready_handler() -> StatusCode {
    debug!("Readiness check passed");
    StatusCode::OK
}
