//! Uploaded file → plain text
//!
//! The document kind is guessed from the file name. Plain text must be valid
//! UTF-8; PDFs go through `pdf-extract` on a blocking thread, which yields
//! the text of every page in page order. Anything else extracts to an empty
//! string and is dropped by the corpus like an empty file.

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::errors::ExtractionError;
use crate::domain::models::ExtractedDocument;

/// Kinds of upload the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Unsupported,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Self {
        match mime_guess::from_path(file_name).first() {
            Some(mime) if mime.essence_str() == "text/plain" => Self::PlainText,
            Some(mime) if mime.essence_str() == "application/pdf" => Self::Pdf,
            _ => Self::Unsupported,
        }
    }
}

/// Read a file from disk and extract its text.
pub async fn extract_file(path: &Path) -> Result<ExtractedDocument, ExtractionError> {
    let file_name = path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ExtractionError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    extract_bytes(&file_name, bytes).await
}

/// Extract text from an upload already held in memory.
pub async fn extract_bytes(
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<ExtractedDocument, ExtractionError> {
    let kind = DocumentKind::from_file_name(file_name);
    let text = match kind {
        DocumentKind::PlainText => {
            String::from_utf8(bytes).map_err(|_| ExtractionError::InvalidUtf8 {
                file: file_name.to_string(),
            })?
        }
        DocumentKind::Pdf => extract_pdf(file_name, bytes).await?,
        DocumentKind::Unsupported => {
            warn!(file = file_name, "unsupported file type, nothing extracted");
            String::new()
        }
    };

    debug!(file = file_name, ?kind, bytes = text.len(), "extracted document");
    Ok(ExtractedDocument::new(file_name, text))
}

async fn extract_pdf(file_name: &str, bytes: Vec<u8>) -> Result<String, ExtractionError> {
    let pdf_error = |reason: String| ExtractionError::Pdf {
        file: file_name.to_string(),
        reason,
    };

    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|err| pdf_error(format!("extraction task failed: {err}")))?
        .map_err(|err| pdf_error(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(
            DocumentKind::from_file_name("notes.txt"),
            DocumentKind::PlainText
        );
        assert_eq!(DocumentKind::from_file_name("Report.PDF"), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_file_name("image.png"),
            DocumentKind::Unsupported
        );
        assert_eq!(
            DocumentKind::from_file_name("no_extension"),
            DocumentKind::Unsupported
        );
    }

    #[tokio::test]
    async fn test_plain_text_is_decoded() {
        let doc = extract_bytes("a.txt", b"hello".to_vec()).await.unwrap();
        assert_eq!(doc, ExtractedDocument::new("a.txt", "hello"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_fails() {
        let err = extract_bytes("bad.txt", vec![0xff, 0xfe, 0x00])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUtf8 { ref file } if file == "bad.txt"));
    }

    #[tokio::test]
    async fn test_unsupported_type_is_empty() {
        let doc = extract_bytes("photo.jpg", vec![1, 2, 3]).await.unwrap();
        assert!(doc.text.is_empty());
        assert!(doc.into_chunk().is_none());
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_an_error() {
        let err = extract_bytes("broken.pdf", b"not a pdf".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf { .. }));
    }

    #[tokio::test]
    async fn test_extract_file_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "some notes").unwrap();

        let doc = extract_file(&path).await.unwrap();
        assert_eq!(doc.file_name, "notes.txt");
        assert_eq!(doc.text, "some notes");
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let err = extract_file(Path::new("/definitely/not/here.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Read { .. }));
    }
}
