//! Hashed embedding service
//!
//! Model-free embeddings: every alphanumeric token is lowercased and hashed
//! into one of `dimension` buckets, counts are accumulated, and the result is
//! L2-normalized. Texts sharing vocabulary land close together, identical
//! texts land on the same point.
//!
//! There is no semantics beyond token overlap. A chunk's header tokens
//! (`source`, the file name parts) count like any other word, so a bare
//! `hello` against the chunk `--- Source: a.txt ---\nhello` has cosine 0.5,
//! squared distance 1.0 and therefore 0% relevance. Only a query whose tokens
//! match the whole chunk scores near 100% here.
//!
//! Used for tests and offline runs where a sentence-transformer model cannot
//! be downloaded. The hash is FNV-1a so vectors are stable across builds and
//! a persisted index stays valid.

use async_trait::async_trait;

use crate::domain::errors::CorpusResult;
use crate::domain::ports::EmbeddingProvider;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic bag-of-words embedder.
#[derive(Debug, Clone)]
pub struct HashedEmbeddingService {
    dimension: usize,
}

impl HashedEmbeddingService {
    /// Create a hashed embedder. A zero dimension is raised to 1.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Embed synchronously. Texts without tokens map to the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokens(text) {
            vector[bucket(&token, self.dimension)] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashedEmbeddingService {
    fn name(&self) -> &'static str {
        "hashed"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> CorpusResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> CorpusResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn bucket(token: &str, dimension: usize) -> usize {
    let hash = token.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    });
    (hash % dimension as u64) as usize
}
