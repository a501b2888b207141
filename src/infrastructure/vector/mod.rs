//! Vector infrastructure components
//!
//! Embedding backends, the process-wide embedder cache, and the exact L2
//! index the corpus is searched with.

pub mod embedding_service;
#[cfg(feature = "fastembed")]
pub mod fastembed_service;
pub mod flat_index;
pub mod model_cache;

pub use embedding_service::HashedEmbeddingService;
#[cfg(feature = "fastembed")]
pub use fastembed_service::FastEmbedService;
pub use flat_index::{FlatL2Index, Neighbors, INVALID_ROW};
pub use model_cache::{create_provider, shared_provider};
