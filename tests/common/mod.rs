//! Common test utilities for integration tests
//!
//! Shared fixtures for building corpus managers over temporary storage with
//! the model-free hashed embedder.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use docseek::domain::models::{ExtractedDocument, LoadReport};
use docseek::infrastructure::storage::CorpusStore;
use docseek::infrastructure::vector::HashedEmbeddingService;
use docseek::services::CorpusManager;
use tempfile::TempDir;

/// Embedding dimension used across integration tests.
pub const TEST_DIMENSION: usize = 96;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Call at the start of tests whose log output is useful when they fail.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Store with the default file names inside `dir`.
pub fn store_in(dir: &Path) -> CorpusStore {
    CorpusStore::new(dir.join("data.json"), dir.join("index.bin"))
}

/// Open (or reopen) the corpus persisted in `dir`.
pub async fn open_corpus(dir: &Path) -> (CorpusManager, LoadReport) {
    let provider = Arc::new(HashedEmbeddingService::new(TEST_DIMENSION));
    CorpusManager::open(provider, store_in(dir))
        .await
        .expect("Failed to open corpus")
}

pub fn doc(name: &str, text: &str) -> ExtractedDocument {
    ExtractedDocument::new(name, text)
}
