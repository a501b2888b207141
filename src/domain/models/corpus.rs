//! Corpus lifecycle models: mutation state and operation reports.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mutation state of a corpus.
///
/// `Rebuilding` is held from the start of an add/remove until the rebuilt
/// index has been persisted. It is an in-process flag, not a file lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusState {
    #[default]
    Idle,
    Rebuilding,
}

impl std::fmt::Display for CorpusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Rebuilding => write!(f, "rebuilding"),
        }
    }
}

/// Outcome of adding a batch of uploads.
///
/// Uploads with no extractable text are dropped silently, so the number of
/// files received and the number of chunks added can differ. Both are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddReport {
    pub files_received: usize,
    pub chunks_added: usize,
    /// Names of uploads that produced no text.
    pub dropped: Vec<String>,
    /// Corpus size after the add.
    pub corpus_len: usize,
}

/// Outcome of removing one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveReport {
    pub row_id: usize,
    pub source: String,
    pub corpus_len: usize,
}

/// How persisted state was reconciled when a corpus was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    /// Nothing persisted yet.
    Empty,
    /// Chunk list and index matched.
    Consistent,
    /// Chunks were present but the index file was missing.
    RebuiltMissingIndex,
    /// Index row count differed from the chunk count.
    RebuiltRowMismatch { index_rows: usize, chunks: usize },
    /// Index dimension differed from the active embedder.
    RebuiltDimensionMismatch { index_dim: usize, embedder_dim: usize },
    /// Index file could not be decoded.
    RebuiltUnreadableIndex,
}

impl Reconciliation {
    pub fn rebuilt(&self) -> bool {
        !matches!(self, Self::Empty | Self::Consistent)
    }
}

impl std::fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "no persisted corpus"),
            Self::Consistent => write!(f, "consistent"),
            Self::RebuiltMissingIndex => write!(f, "index missing, rebuilt"),
            Self::RebuiltRowMismatch { index_rows, chunks } => write!(
                f,
                "index had {index_rows} rows for {chunks} chunks, rebuilt"
            ),
            Self::RebuiltDimensionMismatch {
                index_dim,
                embedder_dim,
            } => write!(
                f,
                "index dimension {index_dim} differs from embedder dimension {embedder_dim}, rebuilt"
            ),
            Self::RebuiltUnreadableIndex => write!(f, "index unreadable, rebuilt"),
        }
    }
}

/// Outcome of opening a persisted corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub chunks: usize,
    pub reconciliation: Reconciliation,
}

/// Point-in-time description of a corpus and its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStatus {
    pub chunks: usize,
    /// `None` when the corpus is empty and no index exists.
    pub index_rows: Option<usize>,
    pub index_dimension: Option<usize>,
    pub index_built_at: Option<DateTime<Utc>>,
    pub embedder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    pub embedding_dimension: usize,
    pub state: CorpusState,
    pub chunks_path: PathBuf,
    pub index_path: PathBuf,
}
