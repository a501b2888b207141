//! FastEmbed sentence-transformer backend
//!
//! Runs a local ONNX model (default `all-MiniLM-L6-v2`, 384 dimensions).
//! Model files are downloaded to the fastembed cache on first use; loading
//! is expensive, so callers go through [`super::model_cache`] to do it once.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, ModelTrait, TextEmbedding, TextInitOptions};
use tracing::{debug, info};

use crate::domain::errors::{CorpusError, CorpusResult};
use crate::domain::ports::EmbeddingProvider;

/// Model used when no override is configured. Not `EmbeddingModel::default()`,
/// which is bge-small-en-v1.5.
pub const DEFAULT_MODEL: EmbeddingModel = EmbeddingModel::AllMiniLML6V2;

/// Map a configured model name (an `EmbeddingModel` variant, any case) to a
/// fastembed model.
pub fn resolve_model(code: Option<&str>) -> CorpusResult<EmbeddingModel> {
    match code {
        Some(code) => EmbeddingModel::from_str(code).map_err(|err| {
            CorpusError::Embedding(format!("unknown fastembed model '{code}': {err}"))
        }),
        None => Ok(DEFAULT_MODEL),
    }
}

/// Embedding provider backed by a local FastEmbed model.
pub struct FastEmbedService {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: EmbeddingModel,
    dimension: usize,
}

impl FastEmbedService {
    /// Load a model, downloading it if needed.
    ///
    /// `model_override` takes a fastembed model name; [`DEFAULT_MODEL`] is
    /// used when it is `None`.
    pub async fn load(model_override: Option<String>) -> CorpusResult<Self> {
        let model_name = resolve_model(model_override.as_deref())?;

        info!(model = %model_name, "loading fastembed model");

        let options = TextInitOptions::new(model_name.clone()).with_show_download_progress(true);
        let model_for_task = model_name.clone();

        let (model, dimension) = tokio::task::spawn_blocking(move || -> CorpusResult<_> {
            let model = TextEmbedding::try_new(options).map_err(|err| {
                CorpusError::Embedding(format!("initialising fastembed model: {err}"))
            })?;
            let info = EmbeddingModel::get_model_info(&model_for_task).ok_or_else(|| {
                CorpusError::Embedding(format!(
                    "fastembed model metadata missing for {model_for_task}"
                ))
            })?;
            Ok((model, info.dim))
        })
        .await
        .map_err(|err| CorpusError::Embedding(format!("joining model load task: {err}")))??;

        debug!(model = %model_name, dimension, "fastembed model ready");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            model_name,
            dimension,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedService {
    fn name(&self) -> &'static str {
        "fastembed"
    }

    fn model(&self) -> Option<String> {
        Some(self.model_name.to_string())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> CorpusResult<Vec<f32>> {
        self.embed_batch(&[text.to_owned()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CorpusError::Embedding("fastembed returned no embedding".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> CorpusResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Inference is CPU bound; keep it off the async workers.
        let model = Arc::clone(&self.model);
        let inputs = texts.to_vec();
        let embeddings = tokio::task::spawn_blocking(move || {
            let mut guard = model.lock().unwrap_or_else(PoisonError::into_inner);
            guard.embed(inputs, None)
        })
        .await
        .map_err(|err| CorpusError::Embedding(format!("joining embedding task: {err}")))?
        .map_err(|err| {
            CorpusError::Embedding(format!("generating fastembed batch embeddings: {err}"))
        })?;

        if embeddings.len() != texts.len() {
            return Err(CorpusError::Embedding(format!(
                "fastembed returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_model_resolves_to_minilm() {
        assert_eq!(resolve_model(None).unwrap(), EmbeddingModel::AllMiniLML6V2);
    }

    #[test]
    fn test_model_name_is_case_insensitive() {
        assert_eq!(
            resolve_model(Some("bgesmallenv15")).unwrap(),
            EmbeddingModel::BGESmallENV15
        );
    }

    #[test]
    fn test_unknown_model_code_is_rejected() {
        let err = resolve_model(Some("not-a-model")).unwrap_err();
        assert!(err.to_string().contains("not-a-model"));
    }
}
