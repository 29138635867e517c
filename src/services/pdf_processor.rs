use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use lopdf::Document;
use tokio::sync::OwnedSemaphorePermit;

use crate::error::{AppResult, ExtractionFailure};
use crate::models::has_pdf_signature;
use crate::services::analysis::{Analysis, DocumentAnalyzer};

/// Turns raw upload bytes into per-page text. Runs on a blocking thread.
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, content: &[u8]) -> Result<Vec<String>, ExtractionFailure>;
}

/// lopdf structure check followed by pdf-extract text extraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_pages(&self, content: &[u8]) -> Result<Vec<String>, ExtractionFailure> {
        extract_pages(content)
    }
}

pub struct PdfProcessor {
    timeout: Duration,
    extractor: Arc<dyn TextExtractor>,
}

#[derive(Debug)]
pub struct ProcessedDocument {
    pub text: String,
    pub pages: usize,
    pub analysis: Analysis,
    pub processing_time_ms: u64,
}

impl PdfProcessor {
    pub fn new(timeout: Duration) -> Self {
        Self::with_extractor(timeout, Arc::new(PdfExtractor))
    }

    pub fn with_extractor(timeout: Duration, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { timeout, extractor }
    }

    /// Extracts the text of every page in document order, then runs
    /// `analyzer` over it, all on one blocking thread.
    ///
    /// `permit` moves into that thread and is released only when the work
    /// actually ends. A timed-out extraction keeps running in the background
    /// and keeps its permit until then.
    pub async fn process(
        &self,
        content: Bytes,
        analyzer: Arc<dyn DocumentAnalyzer>,
        permit: OwnedSemaphorePermit,
    ) -> AppResult<ProcessedDocument> {
        let start = Instant::now();

        tracing::info!("Starting PDF text extraction ({} bytes)", content.len());

        let extractor = Arc::clone(&self.extractor);
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let pages = extractor.extract_pages(&content)?;
            let text = join_pages(&pages);
            let analysis = analyzer.analyze(&text);
            Ok::<_, ExtractionFailure>((text, pages.len(), analysis))
        });

        let (text, page_count, analysis) = match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => joined??,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "PDF extraction timed out"
                );
                return Err(ExtractionFailure::TimedOut.into());
            }
        };

        let processing_time = start.elapsed().as_millis() as u64;

        tracing::info!(
            "PDF processing completed in {}ms, extracted {} characters from {} pages",
            processing_time,
            text.len(),
            page_count
        );

        Ok(ProcessedDocument {
            text,
            pages: page_count,
            analysis,
            processing_time_ms: processing_time,
        })
    }
}

fn extract_pages(content: &[u8]) -> Result<Vec<String>, ExtractionFailure> {
    if content.is_empty() {
        return Err(ExtractionFailure::EmptyDocument);
    }
    if !has_pdf_signature(content) {
        return Err(ExtractionFailure::NotPdf);
    }

    let document = Document::load_mem(content).map_err(|e| {
        tracing::warn!("PDF structure validation failed: {}", e);
        ExtractionFailure::Malformed
    })?;
    let encrypted = document.trailer.get(b"Encrypt").is_ok();
    tracing::debug!(
        pages = document.get_pages().len(),
        encrypted,
        "PDF structure loaded"
    );
    drop(document);

    // pdf-extract panics on some malformed inputs instead of returning errors.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(content)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => {
            tracing::warn!("PDF text extraction failed: {}", e);
            if encrypted {
                Err(ExtractionFailure::Encrypted)
            } else {
                Err(ExtractionFailure::Malformed)
            }
        }
        Err(_) => {
            tracing::error!("PDF text extraction panicked");
            Err(ExtractionFailure::Panicked)
        }
    }
}

/// Joins pages with a blank line between them. Each page has trailing
/// whitespace stripped per line and its outer blank lines removed;
/// non-empty output ends with exactly one newline.
fn join_pages(pages: &[String]) -> String {
    let cleaned: Vec<String> = pages.iter().map(|page| clean_page(page)).collect();
    let mut text = cleaned.join("\n\n").trim_matches('\n').to_string();
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

fn clean_page(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().map(str::trim_end).collect();
    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());

    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_page_strips_outer_blank_lines_and_trailing_spaces() {
        assert_eq!(clean_page("\n\n  Hello World  \n\n"), "  Hello World");
        assert_eq!(clean_page("a \n\n b\t\n"), "a\n\n b");
        assert_eq!(clean_page("\n \n"), "");
    }

    #[test]
    fn join_pages_keeps_document_order() {
        let pages = vec!["\nFirst\n".to_string(), "Second \n".to_string()];
        assert_eq!(join_pages(&pages), "First\n\nSecond\n");
    }

    #[test]
    fn join_pages_of_blank_document_is_empty() {
        let pages = vec!["\n".to_string(), String::new()];
        assert_eq!(join_pages(&pages), "");
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn empty_input_is_reported_before_parsing() {
        assert_eq!(extract_pages(b""), Err(ExtractionFailure::EmptyDocument));
    }

    #[test]
    fn non_pdf_bytes_are_rejected() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
        assert_eq!(extract_pages(&jpeg), Err(ExtractionFailure::NotPdf));
    }

    #[test]
    fn truncated_pdf_is_malformed() {
        assert_eq!(
            extract_pages(b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog"),
            Err(ExtractionFailure::Malformed)
        );
    }
}
