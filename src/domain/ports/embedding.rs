//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for similarity search.

use async_trait::async_trait;

use crate::domain::errors::CorpusResult;

/// Trait for embedding providers.
///
/// Implementations must be deterministic: the same text always maps to the
/// same vector, and every vector has length [`EmbeddingProvider::dimension`].
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "fastembed", "hashed").
    fn name(&self) -> &'static str;

    /// Model identifier for diagnostics, when the backend has one.
    fn model(&self) -> Option<String> {
        None
    }

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> CorpusResult<Vec<f32>>;

    /// Generate embeddings for multiple texts, one row per input, in order.
    async fn embed_batch(&self, texts: &[String]) -> CorpusResult<Vec<Vec<f32>>>;
}
