//! Index persistence and the active-index handle

use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::store::ScoredChunk;
use super::store::VectorIndex;
use crate::embeddings::EmbeddingService;
use crate::errors::DocRagError;
use crate::errors::Result;
use crate::models::Chunk;

const INDEX_FILE: &str = "index.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct PersistedIndex {
    version: u32,
    index: VectorIndex,
}

#[derive(Serialize)]
struct PersistedIndexRef<'a> {
    version: u32,
    index: &'a VectorIndex,
}

/// Owns the active index and its on-disk copy.
///
/// A rebuild is embedded and written in full before it replaces the active
/// index, so a failed rebuild leaves the previous index in place.
pub struct IndexStore {
    persist_dir: PathBuf,
    current: Option<Arc<VectorIndex>>,
}

impl IndexStore {
    pub fn new(persist_dir: impl Into<PathBuf>) -> Self {
        Self {
            persist_dir: persist_dir.into(),
            current: None,
        }
    }

    pub fn persist_dir(&self) -> &Path {
        &self.persist_dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.persist_dir.join(INDEX_FILE)
    }

    /// The active index, if one has been built or loaded
    pub fn current(&self) -> Option<Arc<VectorIndex>> {
        self.current.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    /// Embed chunks, persist the result and make it the active index
    pub async fn build(
        &mut self,
        chunks: Vec<Chunk>,
        embeddings: &EmbeddingService,
        fingerprint: &str,
    ) -> Result<Arc<VectorIndex>> {
        let index = VectorIndex::build(chunks, embeddings, fingerprint).await?;
        self.save(&index)?;

        let index = Arc::new(index);
        self.current = Some(index.clone());
        Ok(index)
    }

    /// Search the active index
    ///
    /// # Errors
    /// - `IndexUnavailable` if no index has been built or loaded
    pub async fn search(
        &self,
        embeddings: &EmbeddingService,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let index = self.current.as_ref().ok_or(DocRagError::IndexUnavailable)?;
        index.search(embeddings, query, k).await
    }

    /// Load the persisted index if it was built from the same corpus and model.
    /// Returns whether an index was loaded.
    pub fn load_if_fresh(&mut self, fingerprint: &str, model: &str) -> Result<bool> {
        let path = self.index_path();
        if !path.exists() {
            debug!("No persisted index at {}", path.display());
            return Ok(false);
        }

        let index = match Self::read(&path) {
            Ok(index) => index,
            Err(e) => {
                warn!("Ignoring unreadable index at {}: {}", path.display(), e);
                return Ok(false);
            }
        };

        if index.fingerprint() != fingerprint || index.model() != model {
            info!("Persisted index is stale, it will be rebuilt");
            return Ok(false);
        }

        info!(
            "Reusing persisted index from {} ({} chunks, built {})",
            path.display(),
            index.len(),
            index.created_at()
        );
        self.current = Some(Arc::new(index));
        Ok(true)
    }

    fn read(path: &Path) -> Result<VectorIndex> {
        let file = std::fs::File::open(path)?;
        let persisted: PersistedIndex = serde_json::from_reader(BufReader::new(file))?;
        if persisted.version != FORMAT_VERSION {
            return Err(DocRagError::ProcessingError(format!(
                "Unsupported index format version {}",
                persisted.version
            )));
        }
        Ok(persisted.index)
    }

    /// Write to a temp file in the same directory, then rename over the old copy
    fn save(&self, index: &VectorIndex) -> Result<()> {
        std::fs::create_dir_all(&self.persist_dir)?;

        let tmp = NamedTempFile::new_in(&self.persist_dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(
                &mut writer,
                &PersistedIndexRef {
                    version: FORMAT_VERSION,
                    index,
                },
            )?;
            writer.flush()?;
        }
        tmp.persist(self.index_path())
            .map_err(|e| DocRagError::Io(e.error))?;

        debug!("Persisted index to {}", self.index_path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::NgramEmbedder;
    use crate::models::DocumentMetadata;

    fn chunks() -> Vec<Chunk> {
        ["pump maintenance schedule", "invoice payment terms", "pump pressure limits"]
            .iter()
            .enumerate()
            .map(|(i, text)| Chunk {
                content: (*text).to_string(),
                metadata: DocumentMetadata {
                    source: "ops.pdf".to_string(),
                    page: i as u32,
                },
                chunk_index: 0,
                start_char: 0,
            })
            .collect()
    }

    fn service() -> EmbeddingService {
        EmbeddingService::new(Arc::new(NgramEmbedder::new(128)))
    }

    #[tokio::test]
    async fn test_search_before_build_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path());
        let err = store.search(&service(), "pump", 3).await.unwrap_err();
        assert!(matches!(err, DocRagError::IndexUnavailable));
    }

    #[tokio::test]
    async fn test_build_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let embeddings = service();

        let mut store = IndexStore::new(dir.path().join("db"));
        let built = store.build(chunks(), &embeddings, "fp-1").await.unwrap();
        assert_eq!(built.len(), 3);
        assert!(store.index_path().exists());

        let results = store.search(&embeddings, "pump maintenance", 1).await.unwrap();
        assert_eq!(results[0].chunk.content, "pump maintenance schedule");

        let mut reopened = IndexStore::new(dir.path().join("db"));
        assert!(reopened.load_if_fresh("fp-1", embeddings.model()).unwrap());
        assert_eq!(reopened.current().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_stale_fingerprint_not_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let embeddings = service();
        let mut store = IndexStore::new(dir.path());
        store.build(chunks(), &embeddings, "fp-1").await.unwrap();

        let mut reopened = IndexStore::new(dir.path());
        assert!(!reopened.load_if_fresh("fp-2", embeddings.model()).unwrap());
        assert!(!reopened.load_if_fresh("fp-1", "another-model").unwrap());
        assert!(!reopened.is_ready());
    }

    #[test]
    fn test_corrupt_index_file_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), "{ not json").unwrap();
        let mut store = IndexStore::new(dir.path());
        assert!(!store.load_if_fresh("fp", "m").unwrap());
    }
}
