//! Infrastructure layer module
//!
//! Adapters behind the domain ports plus the ambient plumbing:
//! - Configuration management (figment)
//! - Logging (tracing)
//! - Embedding backends and the exact L2 vector index
//! - Flat-file corpus persistence
//! - Text extraction from uploaded files

pub mod config;
pub mod extraction;
pub mod logging;
pub mod storage;
pub mod vector;
