use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderMap, Method},
    response::Json,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id;
use crate::models::AnalyzeResponse;
use crate::services::pipeline::{self, StageTracker};
use crate::state::AppState;

/// `POST /api/analyze`. Mounted for every method so that non-POST requests
/// get the JSON 405 body instead of axum's empty one.
pub async fn analyze_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    if method != Method::POST {
        warn!(request_id = %request_id, method = %method, "Rejected non-POST analyze request");
        return Err(AppError::MethodNotAllowed);
    }

    info!(request_id = %request_id, "Starting PDF analysis request");

    if let Some(declared) = declared_length(&headers) {
        let max_body = state.config.max_body_bytes();
        if declared > max_body {
            warn!(
                request_id = %request_id,
                content_length = declared,
                max_body_bytes = max_body,
                "Declared body size exceeds limit"
            );
            return Err(AppError::PayloadTooLarge {
                limit_mb: state.config.max_file_size_mb,
            });
        }
    }

    let multipart = multipart.map_err(|rejection| {
        warn!(request_id = %request_id, rejection = %rejection, "Request is not a valid multipart upload");
        AppError::invalid_upload(rejection.body_text())
    })?;

    let permit = state.limiter.try_acquire().map_err(|_| {
        let metrics = state.limiter.metrics();
        warn!(
            request_id = %request_id,
            total_requests = metrics.total_requests,
            rejected_requests = metrics.rejected_requests,
            "Rate limit exceeded - too many concurrent requests"
        );
        AppError::RateLimitExceeded
    })?;

    debug!(
        request_id = %request_id,
        available_permits = state.limiter.metrics().available_permits,
        "Request permit acquired"
    );

    let mut tracker = StageTracker::new(request_id.clone());
    let timeout = Duration::from_secs(state.config.request_timeout_seconds);
    let run = pipeline::run(&state, &mut tracker, multipart, permit);
    let response = tokio::time::timeout(timeout, run).await.map_err(|elapsed| {
        warn!(
            request_id = %request_id,
            timeout_secs = timeout.as_secs(),
            "Request exceeded its time budget"
        );
        AppError::from(elapsed)
    })??;

    info!(
        request_id = %request_id,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Request completed successfully"
    );

    Ok(Json(response))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
