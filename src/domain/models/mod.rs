pub mod chunk;
pub mod config;
pub mod corpus;
pub mod search;

pub use chunk::{DocumentChunk, ExtractedDocument};
pub use config::{
    Config, EmbeddingBackend, EmbeddingConfig, LogFormat, LoggingConfig, RotationPolicy,
    SearchConfig, StorageConfig,
};
pub use corpus::{
    AddReport, CorpusState, CorpusStatus, LoadReport, Reconciliation, RemoveReport,
};
pub use search::{
    clamp_k, relevance_score, SearchHit, DEFAULT_RESULTS, MAX_RESULTS, MIN_RESULTS,
};
