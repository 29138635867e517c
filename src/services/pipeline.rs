//! Per-request ingestion pipeline.
//!
//! A request moves `Received → ParsingMultipart → BufferingFile →
//! ExtractingText → Responding`; any error moves it to `Failed`. Both
//! `Responding` and `Failed` are terminal.

use std::fmt;
use std::sync::Arc;

use axum::extract::Multipart;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::AnalyzeResponse;
use crate::services::upload::read_pdf_field;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    ParsingMultipart,
    BufferingFile,
    ExtractingText,
    Responding,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Responding | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::ParsingMultipart => "parsing_multipart",
            Stage::BufferingFile => "buffering_file",
            Stage::ExtractingText => "extracting_text",
            Stage::Responding => "responding",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks where a single request is, so failures are logged with the stage
/// they happened in.
#[derive(Debug)]
pub struct StageTracker {
    request_id: String,
    stage: Stage,
}

impl StageTracker {
    pub fn new(request_id: impl Into<String>) -> Self {
        let tracker = Self {
            request_id: request_id.into(),
            stage: Stage::Received,
        };
        debug!(request_id = %tracker.request_id, stage = %tracker.stage, "Request received");
        tracker
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn advance(&mut self, next: Stage) {
        debug_assert!(!self.stage.is_terminal(), "advance past terminal stage");
        debug!(
            request_id = %self.request_id,
            from = %self.stage,
            to = %next,
            "Pipeline stage transition"
        );
        self.stage = next;
    }

    pub fn fail(&mut self, err: AppError) -> AppError {
        warn!(
            request_id = %self.request_id,
            stage = %self.stage,
            error_code = err.error_code(),
            error = %err,
            "Pipeline failed"
        );
        self.stage = Stage::Failed;
        err
    }
}

/// Runs an already-extracted multipart body through buffering, extraction
/// and analysis. `permit` is held until extraction and analysis finish,
/// even if the request gives up on them first.
pub async fn run(
    state: &AppState,
    tracker: &mut StageTracker,
    mut multipart: Multipart,
    permit: OwnedSemaphorePermit,
) -> AppResult<AnalyzeResponse> {
    tracker.advance(Stage::ParsingMultipart);
    let limit = state.config.max_upload_bytes();

    let read = read_pdf_field(&mut multipart, limit, || tracker.advance(Stage::BufferingFile)).await;
    let file = match read {
        Ok(file) => file,
        Err(e) => return Err(tracker.fail(e)),
    };

    info!(
        request_id = %tracker.request_id,
        file_name = %file.display_name(),
        file_size = file.size(),
        content_type = ?file.content_type,
        "File buffered from multipart form"
    );

    tracker.advance(Stage::ExtractingText);
    let analyzer = Arc::clone(&state.analyzer);
    let processed = match state.processor.process(file.content, analyzer, permit).await {
        Ok(processed) => processed,
        Err(e) => return Err(tracker.fail(e)),
    };

    info!(
        request_id = %tracker.request_id,
        text_length = processed.text.len(),
        pages = processed.pages,
        processing_time_ms = processed.processing_time_ms,
        "PDF processing completed successfully"
    );

    tracker.advance(Stage::Responding);

    let analysis = processed.analysis;
    Ok(AnalyzeResponse::new(processed.text, analysis.summary, analysis.topics))
}
