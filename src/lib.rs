//! docseek - semantic search over a small document corpus
//!
//! Uploaded text and PDF files become chunks; every chunk is embedded and
//! kept in an exact L2 index whose row `i` always belongs to chunk `i`. Any
//! change to the chunk list rebuilds the whole index and persists both.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors, and the embedding port
//! - **Service Layer** (`services`): the corpus manager and its consistency rules
//! - **Infrastructure Layer** (`infrastructure`): config, logging, embedders,
//!   the vector index, persistence, and text extraction
//! - **CLI Layer** (`cli`): one-shot commands and the interactive shell
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use docseek::domain::models::ExtractedDocument;
//! use docseek::infrastructure::storage::CorpusStore;
//! use docseek::infrastructure::vector::HashedEmbeddingService;
//! use docseek::services::CorpusManager;
//!
//! # async fn demo() -> docseek::domain::CorpusResult<()> {
//! let provider = Arc::new(HashedEmbeddingService::new(384));
//! let store = CorpusStore::new("data.json", "index.bin");
//! let (corpus, _report) = CorpusManager::open(provider, store).await?;
//!
//! corpus
//!     .add_documents(vec![ExtractedDocument::new("a.txt", "hello")])
//!     .await?;
//! let hits = corpus.search("hello", 3).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::{
    AddReport, Config, DocumentChunk, ExtractedDocument, LoadReport, Reconciliation,
    RemoveReport, SearchHit,
};
pub use domain::ports::EmbeddingProvider;
pub use domain::{CorpusError, CorpusResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::storage::CorpusStore;
pub use services::CorpusManager;
