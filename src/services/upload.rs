use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{UploadedFile, PDF_FIELD};

/// Append-only byte collector for a single upload. Refuses to grow past
/// `limit`, so an oversized stream is cut off at the first chunk that
/// crosses it.
#[derive(Debug)]
pub struct UploadBuffer {
    buf: BytesMut,
    limit: usize,
}

impl UploadBuffer {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            limit,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) -> AppResult<()> {
        if self.buf.len() + chunk.len() > self.limit {
            return Err(payload_too_large(self.limit));
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Walks the multipart body until it finds the `pdf` part, then streams
/// that part chunk by chunk into a bounded buffer. Other parts are skipped.
/// `on_found` runs once the part header has been read, before its body.
pub async fn read_pdf_field<F>(
    multipart: &mut Multipart,
    limit: usize,
    on_found: F,
) -> AppResult<UploadedFile>
where
    F: FnOnce(),
{
    let mut on_found = Some(on_found);

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(PDF_FIELD) {
            debug!(field = ?field.name(), "Skipping unrelated multipart field");
            continue;
        }

        if let Some(notify) = on_found.take() {
            notify();
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);

        let mut buffer = UploadBuffer::with_limit(limit);
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
            buffer.push(&chunk)?;
        }

        let file = UploadedFile::new(PDF_FIELD, buffer.freeze())
            .with_file_name(file_name)
            .with_content_type(content_type);

        if !file.declares_pdf() {
            warn!(
                file_name = %file.display_name(),
                content_type = ?file.content_type,
                "Upload is not labelled application/pdf"
            );
        }

        return Ok(file);
    }

    Err(AppError::MissingFile { field: PDF_FIELD })
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        payload_too_large(limit)
    } else {
        AppError::invalid_upload(err.body_text())
    }
}

fn payload_too_large(limit: usize) -> AppError {
    AppError::PayloadTooLarge {
        limit_mb: limit.div_ceil(1024 * 1024),
    }
}
