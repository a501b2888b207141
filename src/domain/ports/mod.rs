//! Port trait definitions (Hexagonal Architecture)
//!
//! - EmbeddingProvider: text to vector conversion
//!
//! Keeps the corpus logic independent of any particular model runtime.

pub mod embedding;

pub use embedding::EmbeddingProvider;
