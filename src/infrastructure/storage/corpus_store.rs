//! Flat-file persistence for the corpus
//!
//! Two files:
//! - the chunk list, a human-readable JSON array of strings (4-space indent,
//!   non-ASCII written verbatim), in corpus order;
//! - the index blob, written by [`FlatL2Index::to_bytes`].
//!
//! Each file is written to a sibling `.tmp` file and renamed into place, so a
//! single file is never left half-written. The pair is NOT written atomically:
//! a crash between the two renames leaves a new chunk list next to an old
//! index. Readers must reconcile (see `CorpusManager::open`).

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::errors::{CorpusError, CorpusResult};
use crate::domain::models::{DocumentChunk, StorageConfig};
use crate::infrastructure::vector::FlatL2Index;

/// Reads and writes the persisted chunk list and index.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    chunks_path: PathBuf,
    index_path: PathBuf,
}

impl CorpusStore {
    pub fn new(chunks_path: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            chunks_path: chunks_path.into(),
            index_path: index_path.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.chunks_path, &config.index_path)
    }

    pub fn chunks_path(&self) -> &Path {
        &self.chunks_path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Load the chunk list and, when it is non-empty, the index.
    ///
    /// A missing chunk file yields an empty corpus and no index. Row counts
    /// are not cross-checked here.
    pub async fn load(&self) -> CorpusResult<(Vec<DocumentChunk>, Option<FlatL2Index>)> {
        let chunks = self.load_chunks().await?;
        if chunks.is_empty() {
            return Ok((chunks, None));
        }
        let index = self.load_index().await?;
        Ok((chunks, index))
    }

    /// Read the chunk list; empty when the file does not exist.
    pub async fn load_chunks(&self) -> CorpusResult<Vec<DocumentChunk>> {
        let Some(bytes) = read_if_exists(&self.chunks_path).await? else {
            debug!(path = %self.chunks_path.display(), "no chunk list on disk");
            return Ok(Vec::new());
        };

        let chunks: Vec<DocumentChunk> = serde_json::from_slice(&bytes)?;
        debug!(path = %self.chunks_path.display(), chunks = chunks.len(), "loaded chunk list");
        Ok(chunks)
    }

    /// Read the index blob; `None` when the file does not exist.
    pub async fn load_index(&self) -> CorpusResult<Option<FlatL2Index>> {
        let Some(bytes) = read_if_exists(&self.index_path).await? else {
            debug!(path = %self.index_path.display(), "no index on disk");
            return Ok(None);
        };

        let index = FlatL2Index::from_bytes(&bytes)?;
        debug!(
            path = %self.index_path.display(),
            rows = index.row_count(),
            dimension = index.dimension(),
            "loaded index"
        );
        Ok(Some(index))
    }

    /// Persist the corpus.
    ///
    /// The chunk list is written only when non-empty and the index only when
    /// present. Saving an empty corpus deletes both files instead, so a later
    /// load cannot bring back removed chunks.
    pub async fn save(
        &self,
        chunks: &[DocumentChunk],
        index: Option<&FlatL2Index>,
    ) -> CorpusResult<()> {
        if chunks.is_empty() {
            remove_if_exists(&self.chunks_path).await?;
            remove_if_exists(&self.index_path).await?;
            info!("corpus empty, removed persisted files");
            return Ok(());
        }

        write_atomic(&self.chunks_path, &to_indented_json(chunks)?).await?;

        if let Some(index) = index {
            write_atomic(&self.index_path, &index.to_bytes()?).await?;
        }

        info!(
            chunks = chunks.len(),
            index_rows = index.map_or(0, FlatL2Index::row_count),
            chunks_path = %self.chunks_path.display(),
            index_path = %self.index_path.display(),
            "corpus saved"
        );
        Ok(())
    }
}

fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> CorpusResult<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

async fn read_if_exists(path: &Path) -> CorpusResult<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(CorpusError::io(path, err)),
    }
}

async fn remove_if_exists(path: &Path) -> CorpusResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(CorpusError::io(path, err)),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> CorpusResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| CorpusError::io(parent, err))?;
    }

    let tmp_path = tmp_path_for(path);
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|err| CorpusError::io(&tmp_path, err))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|err| CorpusError::io(path, err))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> CorpusStore {
        CorpusStore::new(dir.path().join("data.json"), dir.path().join("index.bin"))
    }

    fn chunk(name: &str, text: &str) -> DocumentChunk {
        DocumentChunk::from_upload(name, text).unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_files_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (chunks, index) = store(&dir).load().await.unwrap();
        assert!(chunks.is_empty());
        assert!(index.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let chunks = vec![chunk("a.txt", "hello"), chunk("b.txt", "world")];
        let index = FlatL2Index::build(&[vec![1.0, 0.0], vec![0.0, 1.0]])
            .unwrap()
            .unwrap();

        store.save(&chunks, Some(&index)).await.unwrap();
        let (loaded_chunks, loaded_index) = store.load().await.unwrap();

        assert_eq!(loaded_chunks, chunks);
        assert_eq!(loaded_index, Some(index));
    }

    #[tokio::test]
    async fn test_chunk_file_is_indented_json_with_verbatim_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store
            .save(&[chunk("báo cáo.txt", "doanh thu")], None)
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.chunks_path()).unwrap();
        assert_eq!(
            raw,
            "[\n    \"--- Source: báo cáo.txt ---\\ndoanh thu\"\n]"
        );
    }

    #[tokio::test]
    async fn test_index_not_read_when_chunk_list_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        std::fs::write(store.chunks_path(), "[]").unwrap();
        std::fs::write(store.index_path(), b"garbage").unwrap();

        let (chunks, index) = store.load().await.unwrap();
        assert!(chunks.is_empty());
        assert!(index.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.save(&[chunk("a.txt", "x")], None).await.unwrap();
        std::fs::write(store.index_path(), b"garbage").unwrap();

        assert!(matches!(store.load().await, Err(CorpusError::Index(_))));
    }

    #[tokio::test]
    async fn test_save_empty_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let index = FlatL2Index::build(&[vec![1.0]]).unwrap().unwrap();
        store.save(&[chunk("a.txt", "x")], Some(&index)).await.unwrap();
        assert!(store.index_path().exists());

        store.save(&[], None).await.unwrap();
        assert!(!store.chunks_path().exists());
        assert!(!store.index_path().exists());
        assert!(store.load().await.unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(
            dir.path().join("nested/data.json"),
            dir.path().join("nested/index.bin"),
        );
        store.save(&[chunk("a.txt", "x")], None).await.unwrap();

        assert!(store.chunks_path().exists());
        assert!(!dir.path().join("nested/data.json.tmp").exists());
    }

    #[test]
    fn test_tmp_path_for() {
        assert_eq!(
            tmp_path_for(Path::new("dir/index.bin")),
            PathBuf::from("dir/index.bin.tmp")
        );
    }
}
