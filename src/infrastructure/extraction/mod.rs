//! Text extraction from uploaded files.

pub mod extractor;

pub use extractor::{extract_bytes, extract_file, DocumentKind};
