//! Search result models and ranking helpers.

use serde::{Deserialize, Serialize};

use super::chunk::DocumentChunk;

/// Smallest number of results a query may request.
pub const MIN_RESULTS: usize = 1;

/// Largest number of results a query may request.
pub const MAX_RESULTS: usize = 10;

/// Default number of results when the caller does not ask for a count.
pub const DEFAULT_RESULTS: usize = 3;

/// Clamp a requested result count into `[MIN_RESULTS, MAX_RESULTS]`.
pub fn clamp_k(k: usize) -> usize {
    k.clamp(MIN_RESULTS, MAX_RESULTS)
}

/// Display relevance derived from an L2 distance: `max(0, 1 - distance)`.
///
/// This is a heuristic for ranking display only, not a probability. Any
/// distance of 1 or more maps to zero.
pub fn relevance_score(distance: f32) -> f32 {
    (1.0 - distance).max(0.0)
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based rank in the result list.
    pub rank: usize,
    /// Row id of the chunk in the corpus.
    pub row_id: usize,
    /// Source file name from the chunk header.
    pub source: String,
    pub chunk: DocumentChunk,
    /// Squared L2 distance between query and chunk embeddings.
    pub distance: f32,
    /// `max(0, 1 - distance)`, in `[0, 1]`.
    pub relevance: f32,
}

impl SearchHit {
    /// Relevance as a percentage string, e.g. `"87.50%"`.
    pub fn relevance_percent(&self) -> String {
        format!("{:.2}%", self.relevance * 100.0)
    }
}
