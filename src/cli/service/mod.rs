//! Wiring between the CLI and the corpus service.

pub mod corpus_session;

pub use corpus_session::CorpusSession;
