//! PDF Analyzer Service
//!
//! Accepts a PDF over a multipart upload, extracts its text and returns it
//! alongside placeholder analysis fields.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::router;
pub use state::AppState;

use axum::{extract::Request, response::Response};
use tower::ServiceExt;

/// Serves one request through the same router the long-running server uses.
/// Intended for function-style hosts that hand over a single request at a
/// time.
pub async fn handle(state: AppState, request: Request) -> Response {
    match router(state).oneshot(request).await {
        Ok(response) => response,
        Err(infallible) => match infallible {},
    }
}
