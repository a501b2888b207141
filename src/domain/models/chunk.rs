//! Document chunk model
//!
//! A chunk is one uploaded document's extracted text, stamped with a header
//! line naming the file it came from:
//!
//! ```text
//! --- Source: report.pdf ---
//! <extracted text>
//! ```

use serde::{Deserialize, Serialize};

const HEADER_PREFIX: &str = "--- Source: ";
const HEADER_SUFFIX: &str = " ---";

/// One stored unit of searchable text.
///
/// Serialized transparently as its text so the persisted chunk list stays a
/// plain JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentChunk(String);

impl DocumentChunk {
    /// Stamp extracted text with its source header.
    ///
    /// Returns `None` for empty content; such uploads never become chunks.
    pub fn from_upload(file_name: &str, content: &str) -> Option<Self> {
        if content.is_empty() {
            return None;
        }
        Some(Self(format!(
            "{HEADER_PREFIX}{file_name}{HEADER_SUFFIX}\n{content}"
        )))
    }

    /// Full chunk text, header included. This is what gets embedded.
    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn into_text(self) -> String {
        self.0
    }

    /// Source name parsed from the header line.
    ///
    /// Chunks written by other tools may lack the markers; the first line is
    /// returned with whatever markers it does have stripped.
    pub fn source_name(&self) -> &str {
        let first_line = self.0.split('\n').next().unwrap_or_default();
        let name = first_line.strip_prefix(HEADER_PREFIX).unwrap_or(first_line);
        name.strip_suffix(HEADER_SUFFIX).unwrap_or(name)
    }

    /// Extracted text without the header line.
    pub fn body(&self) -> &str {
        self.0.split_once('\n').map_or("", |(_, body)| body)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Text extracted from one uploaded file, before header stamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub file_name: String,
    pub text: String,
}

impl ExtractedDocument {
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: text.into(),
        }
    }

    /// Turn into a chunk, or `None` when no text was extracted.
    pub fn into_chunk(self) -> Option<DocumentChunk> {
        DocumentChunk::from_upload(&self.file_name, &self.text)
    }
}

impl std::fmt::Display for DocumentChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentChunk {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
