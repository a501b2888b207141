//! Process-wide embedder cache
//!
//! Constructing an embedder can mean downloading and loading an ONNX model,
//! so a process builds it once and reuses it. The first caller's
//! configuration wins; later calls get the cached instance regardless of the
//! config they pass. Concurrent first use is serialized by the `OnceCell`.

use std::sync::{Arc, LazyLock};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::errors::CorpusResult;
use crate::domain::models::{EmbeddingBackend, EmbeddingConfig};
use crate::domain::ports::EmbeddingProvider;

use super::embedding_service::HashedEmbeddingService;

static SHARED_PROVIDER: LazyLock<OnceCell<Arc<dyn EmbeddingProvider>>> =
    LazyLock::new(OnceCell::new);

/// Build a new embedder for `config`, bypassing the cache.
pub async fn create_provider(config: &EmbeddingConfig) -> CorpusResult<Arc<dyn EmbeddingProvider>> {
    match config.backend {
        EmbeddingBackend::Hashed => {
            info!(dimension = config.dimension, "using hashed embedder");
            Ok(Arc::new(HashedEmbeddingService::new(config.dimension)))
        }
        EmbeddingBackend::FastEmbed => load_fastembed(config).await,
    }
}

/// Return the process-wide embedder, initializing it on first use.
pub async fn shared_provider(config: &EmbeddingConfig) -> CorpusResult<Arc<dyn EmbeddingProvider>> {
    let provider = SHARED_PROVIDER
        .get_or_try_init(|| create_provider(config))
        .await?;
    debug!(provider = provider.name(), "reusing cached embedder");
    Ok(Arc::clone(provider))
}

#[cfg(feature = "fastembed")]
async fn load_fastembed(config: &EmbeddingConfig) -> CorpusResult<Arc<dyn EmbeddingProvider>> {
    let service = super::fastembed_service::FastEmbedService::load(config.model.clone()).await?;
    Ok(Arc::new(service))
}

#[cfg(not(feature = "fastembed"))]
async fn load_fastembed(_config: &EmbeddingConfig) -> CorpusResult<Arc<dyn EmbeddingProvider>> {
    Err(crate::domain::errors::CorpusError::Embedding(
        "docseek was built without the `fastembed` feature; set embedding.backend to `hashed`"
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hashed(dimension: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            backend: EmbeddingBackend::Hashed,
            model: None,
            dimension,
        }
    }

    #[tokio::test]
    async fn test_create_provider_hashed() {
        let provider = create_provider(&hashed(16)).await.unwrap();
        assert_eq!(provider.name(), "hashed");
        assert_eq!(provider.dimension(), 16);
    }

    #[tokio::test]
    async fn test_shared_provider_is_initialized_once() {
        let first = shared_provider(&hashed(24)).await.unwrap();
        // A different config does not replace the cached instance.
        let second = shared_provider(&hashed(48)).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.dimension(), 24);
    }
}
