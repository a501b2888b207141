use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::{Config, EmbeddingBackend};
use crate::domain::models::{MAX_RESULTS, MIN_RESULTS};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("storage.chunks_path cannot be empty")]
    EmptyChunksPath,

    #[error("storage.index_path cannot be empty")]
    EmptyIndexPath,

    #[error("storage.chunks_path and storage.index_path must differ (both are {0})")]
    SamePaths(String),

    #[error("Invalid search.default_k: {0}. Must be between {MIN_RESULTS} and {MAX_RESULTS}")]
    InvalidDefaultK(usize),

    #[error("Invalid embedding.dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("embedding.backend is fastembed but docseek was built without the `fastembed` feature")]
    FastEmbedUnavailable,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .docseek/config.yaml (project config)
    /// 3. .docseek/local.yaml (local overrides, optional)
    /// 4. Environment variables (DOCSEEK_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".docseek/config.yaml"))
            .merge(Yaml::file(".docseek/local.yaml"))
            .merge(Env::prefixed("DOCSEEK_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// The file replaces the project config layers; environment variables
    /// still apply on top.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("DOCSEEK_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let storage = &config.storage;
        if storage.chunks_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyChunksPath);
        }
        if storage.index_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyIndexPath);
        }
        if storage.chunks_path == storage.index_path {
            return Err(ConfigError::SamePaths(
                storage.chunks_path.display().to_string(),
            ));
        }

        if !(MIN_RESULTS..=MAX_RESULTS).contains(&config.search.default_k) {
            return Err(ConfigError::InvalidDefaultK(config.search.default_k));
        }

        match config.embedding.backend {
            EmbeddingBackend::Hashed if config.embedding.dimension == 0 => {
                return Err(ConfigError::InvalidDimension(0));
            }
            EmbeddingBackend::FastEmbed if !cfg!(feature = "fastembed") => {
                return Err(ConfigError::FastEmbedUnavailable);
            }
            _ => {}
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
