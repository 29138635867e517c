use crate::models::Topic;

pub const SUMMARY_PLACEHOLDER: &str = "Summary placeholder";

/// Derived fields computed from extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: String,
    pub topics: Vec<Topic>,
}

/// Hook for the stages that run after text extraction. Called on the same
/// blocking thread as extraction and under the same timeout, so it may do
/// CPU-heavy work. Implementations must be deterministic for a given input
/// and must not keep the text around.
pub trait DocumentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Analysis;
}

/// Fills the response with fixed values until real analysis lands.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderAnalyzer;

impl DocumentAnalyzer for PlaceholderAnalyzer {
    fn analyze(&self, _text: &str) -> Analysis {
        Analysis {
            summary: SUMMARY_PLACEHOLDER.to_string(),
            topics: Vec::new(),
        }
    }
}
