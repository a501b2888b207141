//! Domain errors for the docseek corpus.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Cannot build an index over zero-dimensional vectors")]
    ZeroDimension,

    #[error("Index blob is not a docseek index (bad magic)")]
    BadMagic,

    #[error("Unsupported index format version: {0}")]
    UnsupportedVersion(u32),

    #[error("Index blob is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to encode index: {0}")]
    Encode(String),
}

/// Errors raised while turning an uploaded file into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{file} is not valid UTF-8 text")]
    InvalidUtf8 { file: String },

    #[error("Failed to extract text from PDF {file}: {reason}")]
    Pdf { file: String, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by corpus operations.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("The corpus is empty. Add documents before searching.")]
    EmptyCorpus,

    #[error("The corpus is rebuilding its index; try again when it finishes")]
    Busy,

    #[error("Row {row} is out of range (corpus has {len} entries)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type CorpusResult<T> = Result<T, CorpusError>;

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for CorpusError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_out_of_range_message() {
        let err = CorpusError::RowOutOfRange { row: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Row 7 is out of range (corpus has 3 entries)"
        );
    }

    #[test]
    fn test_index_error_converts() {
        let err: CorpusError = IndexError::DimensionMismatch {
            expected: 4,
            actual: 3,
        }
        .into();
        assert!(matches!(err, CorpusError::Index(_)));
        assert!(err.to_string().contains("expects 4, got 3"));
    }
}
