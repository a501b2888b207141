//! Corpus manager: keeps the chunk list and its vector index in lockstep.
//!
//! Every mutation follows the same sequence:
//!
//! 1. derive the new chunk list from the current one;
//! 2. re-embed the whole list and build a fresh index over it;
//! 3. persist both files;
//! 4. swap the new list and index into memory.
//!
//! Nothing is committed until step 4, so a failure anywhere before it leaves
//! the in-memory corpus exactly as it was, and a crash leaves the last
//! persisted snapshot on disk. While steps 1-3 run the corpus is
//! `Rebuilding` and refuses other mutations and searches with
//! [`CorpusError::Busy`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{CorpusError, CorpusResult, IndexError};
use crate::domain::models::{
    clamp_k, relevance_score, AddReport, CorpusState, CorpusStatus, DocumentChunk,
    ExtractedDocument, LoadReport, Reconciliation, RemoveReport, SearchHit,
};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::storage::CorpusStore;
use crate::infrastructure::vector::FlatL2Index;

/// In-memory corpus and the index built over it. Replaced wholesale.
#[derive(Debug, Default)]
struct Snapshot {
    chunks: Vec<DocumentChunk>,
    index: Option<FlatL2Index>,
}

/// Owns the corpus, its index, and their persisted copies.
pub struct CorpusManager {
    provider: Arc<dyn EmbeddingProvider>,
    store: CorpusStore,
    snapshot: RwLock<Snapshot>,
    rebuilding: AtomicBool,
}

/// Clears the rebuilding flag when a mutation ends, including by cancellation.
struct RebuildGuard<'a>(&'a AtomicBool);

impl Drop for RebuildGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CorpusManager {
    /// Load persisted state and reconcile it with the active embedder.
    ///
    /// The index is rebuilt (and the result persisted) when it is missing,
    /// unreadable, or disagrees with the chunk list or the embedder's
    /// dimension.
    #[instrument(skip_all, fields(chunks_path = %store.chunks_path().display()))]
    pub async fn open(
        provider: Arc<dyn EmbeddingProvider>,
        store: CorpusStore,
    ) -> CorpusResult<(Self, LoadReport)> {
        let chunks = store.load_chunks().await?;

        let mut manager = Self {
            provider,
            store,
            snapshot: RwLock::new(Snapshot::default()),
            rebuilding: AtomicBool::new(false),
        };

        if chunks.is_empty() {
            debug!("opened empty corpus");
            let report = LoadReport {
                chunks: 0,
                reconciliation: Reconciliation::Empty,
            };
            return Ok((manager, report));
        }

        let embedder_dim = manager.provider.dimension();
        let reconciliation = match manager.store.load_index().await {
            Ok(Some(index)) if index.row_count() != chunks.len() => {
                Reconciliation::RebuiltRowMismatch {
                    index_rows: index.row_count(),
                    chunks: chunks.len(),
                }
            }
            Ok(Some(index)) if index.dimension() != embedder_dim => {
                Reconciliation::RebuiltDimensionMismatch {
                    index_dim: index.dimension(),
                    embedder_dim,
                }
            }
            Ok(Some(index)) => {
                let report = LoadReport {
                    chunks: chunks.len(),
                    reconciliation: Reconciliation::Consistent,
                };
                *manager.snapshot.get_mut().unwrap_or_else(PoisonError::into_inner) = Snapshot {
                    chunks,
                    index: Some(index),
                };
                info!(chunks = report.chunks, "opened corpus");
                return Ok((manager, report));
            }
            Ok(None) => Reconciliation::RebuiltMissingIndex,
            Err(CorpusError::Index(err)) => {
                warn!(error = %err, "persisted index is unreadable");
                Reconciliation::RebuiltUnreadableIndex
            }
            Err(err) => return Err(err),
        };

        warn!(%reconciliation, chunks = chunks.len(), "persisted index out of sync, rebuilding");
        let index = manager.build_index(&chunks).await?;
        manager.store.save(&chunks, index.as_ref()).await?;

        let report = LoadReport {
            chunks: chunks.len(),
            reconciliation,
        };
        *manager.snapshot.get_mut().unwrap_or_else(PoisonError::into_inner) =
            Snapshot { chunks, index };
        info!(chunks = report.chunks, "opened corpus after rebuild");
        Ok((manager, report))
    }

    /// Append the extracted documents, rebuild the index, persist.
    ///
    /// Documents with no text are dropped and listed in the report. When
    /// nothing is left to add the corpus is not touched.
    #[instrument(skip_all, fields(files = documents.len()))]
    pub async fn add_documents(
        &self,
        documents: Vec<ExtractedDocument>,
    ) -> CorpusResult<AddReport> {
        let files_received = documents.len();
        let mut new_chunks = Vec::with_capacity(files_received);
        let mut dropped = Vec::new();

        for document in documents {
            let file_name = document.file_name.clone();
            match document.into_chunk() {
                Some(chunk) => new_chunks.push(chunk),
                None => {
                    debug!(file = %file_name, "no text extracted, dropping");
                    dropped.push(file_name);
                }
            }
        }

        if new_chunks.is_empty() {
            return Ok(AddReport {
                files_received,
                chunks_added: 0,
                dropped,
                corpus_len: self.len(),
            });
        }

        let _guard = self.begin_rebuild()?;

        let mut chunks = self.read().chunks.clone();
        let chunks_added = new_chunks.len();
        chunks.extend(new_chunks);

        let index = self.build_index(&chunks).await?;
        self.store.save(&chunks, index.as_ref()).await?;

        let corpus_len = chunks.len();
        self.commit(chunks, index);

        info!(files_received, chunks_added, corpus_len, "documents added");
        Ok(AddReport {
            files_received,
            chunks_added,
            dropped,
            corpus_len,
        })
    }

    /// Remove the chunk at `row_id`, rebuild the index, persist.
    ///
    /// Later rows shift down by one.
    #[instrument(skip(self))]
    pub async fn remove_document(&self, row_id: usize) -> CorpusResult<RemoveReport> {
        let _guard = self.begin_rebuild()?;

        let mut chunks = self.read().chunks.clone();
        if row_id >= chunks.len() {
            return Err(CorpusError::RowOutOfRange {
                row: row_id,
                len: chunks.len(),
            });
        }
        let removed = chunks.remove(row_id);

        let index = self.build_index(&chunks).await?;
        self.store.save(&chunks, index.as_ref()).await?;

        let corpus_len = chunks.len();
        self.commit(chunks, index);

        let source = removed.source_name().to_string();
        info!(row_id, source = %source, corpus_len, "document removed");
        Ok(RemoveReport {
            row_id,
            source,
            corpus_len,
        })
    }

    /// Rank chunks by similarity to `query`.
    ///
    /// `k` is clamped to 1-10. Fewer than `k` hits come back when the corpus
    /// is smaller than `k`.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn search(&self, query: &str, k: usize) -> CorpusResult<Vec<SearchHit>> {
        if self.rebuilding.load(Ordering::Acquire) {
            return Err(CorpusError::Busy);
        }
        if self.read().index.is_none() {
            return Err(CorpusError::EmptyCorpus);
        }

        let k = clamp_k(k);
        let query_vector = self.provider.embed(query).await?;

        let snapshot = self.read();
        let index = snapshot.index.as_ref().ok_or(CorpusError::EmptyCorpus)?;
        let neighbors = index.search(&query_vector, k)?;

        let hits: Vec<SearchHit> = neighbors
            .iter()
            .filter_map(|(distance, row_id)| {
                let row_id = usize::try_from(row_id).ok()?;
                let chunk = snapshot.chunks.get(row_id)?;
                Some((distance, row_id, chunk))
            })
            .enumerate()
            .map(|(position, (distance, row_id, chunk))| SearchHit {
                rank: position + 1,
                row_id,
                source: chunk.source_name().to_string(),
                chunk: chunk.clone(),
                distance,
                relevance: relevance_score(distance),
            })
            .collect();

        debug!(k, hits = hits.len(), "search complete");
        Ok(hits)
    }

    /// Persist the current corpus and index.
    ///
    /// Refused with [`CorpusError::Busy`] while a mutation is in flight, so a
    /// stale snapshot can never be written over the mutation's files.
    pub async fn save(&self) -> CorpusResult<()> {
        let _guard = self.begin_rebuild()?;
        let (chunks, index) = {
            let snapshot = self.read();
            (snapshot.chunks.clone(), snapshot.index.clone())
        };
        self.store.save(&chunks, index.as_ref()).await
    }

    /// A copy of every chunk in corpus order.
    pub fn chunks(&self) -> Vec<DocumentChunk> {
        self.read().chunks.clone()
    }

    pub fn chunk(&self, row_id: usize) -> CorpusResult<DocumentChunk> {
        let snapshot = self.read();
        snapshot
            .chunks
            .get(row_id)
            .cloned()
            .ok_or(CorpusError::RowOutOfRange {
                row: row_id,
                len: snapshot.chunks.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.read().chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().chunks.is_empty()
    }

    /// Row count of the current index, `None` when there is no index.
    pub fn index_rows(&self) -> Option<usize> {
        self.read().index.as_ref().map(FlatL2Index::row_count)
    }

    pub fn state(&self) -> CorpusState {
        if self.rebuilding.load(Ordering::Acquire) {
            CorpusState::Rebuilding
        } else {
            CorpusState::Idle
        }
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    pub fn status(&self) -> CorpusStatus {
        let snapshot = self.read();
        let index = snapshot.index.as_ref();
        CorpusStatus {
            chunks: snapshot.chunks.len(),
            index_rows: index.map(FlatL2Index::row_count),
            index_dimension: index.map(FlatL2Index::dimension),
            index_built_at: index.map(FlatL2Index::built_at),
            embedder: self.provider.name().to_string(),
            embedding_model: self.provider.model(),
            embedding_dimension: self.provider.dimension(),
            state: self.state(),
            chunks_path: self.store.chunks_path().to_path_buf(),
            index_path: self.store.index_path().to_path_buf(),
        }
    }

    fn begin_rebuild(&self) -> CorpusResult<RebuildGuard<'_>> {
        self.rebuilding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CorpusError::Busy)?;
        Ok(RebuildGuard(&self.rebuilding))
    }

    /// Embed every chunk in order and build a fresh index over them.
    async fn build_index(&self, chunks: &[DocumentChunk]) -> CorpusResult<Option<FlatL2Index>> {
        if chunks.is_empty() {
            return Ok(None);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text().to_owned()).collect();
        let vectors = self.provider.embed_batch(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(CorpusError::Embedding(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                texts.len()
            )));
        }

        let expected = self.provider.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: bad.len(),
            }
            .into());
        }

        let index = FlatL2Index::build(&vectors)?;
        debug!(rows = chunks.len(), dimension = expected, "index rebuilt");
        Ok(index)
    }

    fn commit(&self, chunks: Vec<DocumentChunk>, index: Option<FlatL2Index>) {
        *self.write() = Snapshot { chunks, index };
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }
}
