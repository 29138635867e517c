pub mod analyze;
pub mod health;

pub use analyze::*;
pub use health::*;

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::middleware::logging_middleware;
use crate::state::AppState;

/// Builds the full application router. Unmatched paths are served from the
/// static frontend directory, falling back to its `index.html`.
pub fn router(state: AppState) -> Router {
    let static_dir = Path::new(&state.config.static_dir);
    let frontend = ServeDir::new(static_dir)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/analyze", any(analyze_handler))
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(state.config.max_body_bytes())),
        )
        .with_state(state)
}
