use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::search::DEFAULT_RESULTS;

/// Main configuration structure for docseek
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Persisted file locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedding backend configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Query defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the two persisted corpus files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// JSON array of chunk strings
    #[serde(default = "default_chunks_path")]
    pub chunks_path: PathBuf,

    /// Binary vector index blob
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
}

fn default_chunks_path() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("index.bin")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chunks_path: default_chunks_path(),
            index_path: default_index_path(),
        }
    }
}

/// Which embedder turns text into vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Local ONNX sentence-transformer
    #[default]
    FastEmbed,
    /// Deterministic feature hashing, no model required
    Hashed,
}

impl std::fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FastEmbed => write!(f, "fastembed"),
            Self::Hashed => write!(f, "hashed"),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Backend: fastembed or hashed
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// FastEmbed model name such as `AllMiniLML6V2`; all-MiniLM-L6-v2 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Vector dimension for the hashed backend
    #[serde(default = "default_hashed_dimension")]
    pub dimension: usize,
}

const fn default_hashed_dimension() -> usize {
    384
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model: None,
            dimension: default_hashed_dimension(),
        }
    }
}

/// Query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Result count used when a query does not pass one (1-10)
    #[serde(default = "default_k")]
    pub default_k: usize,
}

const fn default_k() -> usize {
    DEFAULT_RESULTS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Rotation policy for file logs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Directory for rolling JSON log files (console only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// File rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "warn".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}
