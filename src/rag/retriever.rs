//! Top-k chunk retrieval

use tracing::debug;

use crate::embeddings::EmbeddingService;
use crate::errors::DocRagError;
use crate::errors::Result;
use crate::index::IndexStore;
use crate::index::ScoredChunk;
use crate::models::Chunk;

/// Default number of chunks retrieved per question
pub const DEFAULT_TOP_K: usize = 3;

/// Validate a caller-supplied `k`. Zero and negative values are rejected.
pub fn validate_k(k: i64) -> Result<usize> {
    if k <= 0 {
        return Err(DocRagError::InvalidArgument(format!(
            "k must be a positive integer, got {k}"
        )));
    }
    usize::try_from(k).map_err(|_| DocRagError::InvalidArgument(format!("k is too large: {k}")))
}

/// Semantic retriever over the active index
#[derive(Clone)]
pub struct Retriever {
    embeddings: EmbeddingService,
}

impl Retriever {
    pub const fn new(embeddings: EmbeddingService) -> Self {
        Self { embeddings }
    }

    /// The `k` nearest chunks with their distances, closest first
    ///
    /// # Errors
    /// - `InvalidArgument` if `k` is zero, before any embedding call
    /// - `IndexUnavailable` if nothing has been indexed
    /// - `UpstreamError` if the question cannot be embedded
    pub async fn retrieve_scored(
        &self,
        store: &IndexStore,
        question: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(DocRagError::InvalidArgument(
                "k must be a positive integer, got 0".to_string(),
            ));
        }

        debug!("Retrieving top {} chunks for: {}", k, question);
        let results = store.search(&self.embeddings, question, k).await?;
        debug!("Retrieved {} chunks", results.len());
        Ok(results)
    }

    /// The `k` nearest chunks, closest first
    pub async fn retrieve(&self, store: &IndexStore, question: &str, k: usize) -> Result<Vec<Chunk>> {
        Ok(self
            .retrieve_scored(store, question, k)
            .await?
            .into_iter()
            .map(|scored| scored.chunk)
            .collect())
    }

    pub const fn embeddings(&self) -> &EmbeddingService {
        &self.embeddings
    }
}
