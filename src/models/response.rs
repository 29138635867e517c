use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/analyze`.
///
/// `summary` and `topics` are produced by the configured
/// [`DocumentAnalyzer`](crate::services::DocumentAnalyzer); new derived
/// fields (headings, key points) belong here once an analyzer fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub text: String,
    pub summary: String,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub topic: String,
    pub pages: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub max_file_size_mb: usize,
    pub rate_limiting: LimiterMetrics,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimiterMetrics {
    pub total_requests: u64,
    pub rejected_requests: u64,
    pub available_permits: usize,
}

impl AnalyzeResponse {
    pub fn new(text: String, summary: String, topics: Vec<Topic>) -> Self {
        Self { text, summary, topics }
    }
}
