//! On-disk persistence of the chunk list and index.

pub mod corpus_store;

pub use corpus_store::CorpusStore;
