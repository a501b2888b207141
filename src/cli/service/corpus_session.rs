//! Opens the configured corpus for a CLI invocation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::output::{spinner, ProgressBarExt};
use crate::domain::models::{Config, LoadReport};
use crate::infrastructure::storage::CorpusStore;
use crate::infrastructure::vector::shared_provider;
use crate::services::CorpusManager;

/// A corpus opened for one CLI process, plus the settings commands need.
pub struct CorpusSession {
    pub manager: CorpusManager,
    pub default_k: usize,
    pub load_report: LoadReport,
}

impl CorpusSession {
    /// Load the embedder (once per process) and open the persisted corpus.
    pub async fn open(config: &Config, json_mode: bool) -> Result<Self> {
        let progress = spinner("Loading embedding model...", json_mode);
        let provider = match shared_provider(&config.embedding).await {
            Ok(provider) => provider,
            Err(err) => {
                progress.finish_error("Embedding model failed to load");
                return Err(err).context("Failed to initialize embedder");
            }
        };
        progress.set_message("Opening corpus...");

        let store = CorpusStore::from_config(&config.storage);
        let opened = CorpusManager::open(provider, store).await;
        progress.finish_and_clear();

        let (manager, load_report) = opened.with_context(|| {
            format!(
                "Failed to open corpus at {}",
                config.storage.chunks_path.display()
            )
        })?;

        info!(
            chunks = load_report.chunks,
            reconciliation = %load_report.reconciliation,
            "corpus session ready"
        );

        Ok(Self {
            manager,
            default_k: config.search.default_k,
            load_report,
        })
    }
}
