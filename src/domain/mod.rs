//! Domain layer for docseek
//!
//! Core models, errors, and the ports infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{CorpusError, CorpusResult, ExtractionError, IndexError};
