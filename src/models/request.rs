use bytes::Bytes;

/// Multipart field the frontend posts the document under.
pub const PDF_FIELD: &str = "pdf";

const PDF_MIME_TYPE: &str = "application/pdf";

/// Readers accept the header anywhere in the first KiB, not only at offset 0.
const SIGNATURE_WINDOW: usize = 1024;

/// A file part read out of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(field_name: impl Into<String>, content: Bytes) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: None,
            content_type: None,
            content,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("unknown.pdf")
    }

    /// Whether the client labelled the part as a PDF. Advisory only.
    pub fn declares_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_MIME_TYPE))
            .unwrap_or(false)
    }

    pub fn has_pdf_signature(&self) -> bool {
        has_pdf_signature(&self.content)
    }
}

pub fn has_pdf_signature(content: &[u8]) -> bool {
    let window = &content[..content.len().min(SIGNATURE_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}
