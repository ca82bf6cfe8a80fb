use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("unsupported document type: {0}")]
    Unsupported(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Document type as determined from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
    Unknown,
}

impl DocumentKind {
    /// Classify a file extension (without the leading dot, any case).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Docx,
            "txt" | "text" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::PlainText => "text/plain",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Trait for document-to-text conversion backends.
///
/// Implementors turn a stored document into a single text blob; everything
/// after that (normalization, section detection, field extraction) lives in
/// `cvparse_parsing::CvExtractor`.
pub trait TextBackend: Send + Sync {
    /// Extract the full text content of a document.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

/// Backend for documents that are already plain text.
///
/// PDF and Word files are refused: converting them is the job of an external
/// extractor whose output can then be fed in as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextBackend;

impl PlainTextBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for PlainTextBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let kind = DocumentKind::from_path(path);
        match kind {
            DocumentKind::Pdf | DocumentKind::Docx => Err(BackendError::Unsupported(format!(
                "{} ({}); convert it to text first",
                path.display(),
                kind.mime_type()
            ))),
            DocumentKind::PlainText | DocumentKind::Unknown => {
                let bytes = std::fs::read(path)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}
