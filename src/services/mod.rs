pub mod corpus_manager;

pub use corpus_manager::CorpusManager;
