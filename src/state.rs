use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::middleware::RequestLimiter;
use crate::services::{DocumentAnalyzer, PdfProcessor, PlaceholderAnalyzer};

/// Handles shared by every request. Nothing here is mutated per request
/// apart from the limiter's permits and counters.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub limiter: Arc<RequestLimiter>,
    pub processor: Arc<PdfProcessor>,
    pub analyzer: Arc<dyn DocumentAnalyzer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_analyzer(config, Arc::new(PlaceholderAnalyzer))
    }

    pub fn with_analyzer(config: Config, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        let limiter = RequestLimiter::new(config.max_concurrent_requests);
        let processor = PdfProcessor::new(Duration::from_secs(config.extraction_timeout_seconds));
        Self {
            config: Arc::new(config),
            limiter: Arc::new(limiter),
            processor: Arc::new(processor),
            analyzer,
        }
    }
}
