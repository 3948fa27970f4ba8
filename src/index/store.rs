//! Flat cosine-distance index

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::embeddings::EmbeddingService;
use crate::errors::DocRagError;
use crate::errors::Result;
use crate::models::Chunk;

/// One chunk and its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// A chunk returned by search with its distance to the query (lower is closer)
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub distance: f32,
}

/// Immutable collection of (chunk, vector) pairs in ingestion order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    model: String,
    fingerprint: String,
    created_at: DateTime<Utc>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed every chunk and build an index
    ///
    /// # Errors
    /// - `UpstreamError` if the embedding provider fails
    pub async fn build(
        chunks: Vec<Chunk>,
        embeddings: &EmbeddingService,
        fingerprint: impl Into<String>,
    ) -> Result<Self> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let vectors = embeddings.embed_documents(&texts).await?;
        let index = Self::from_parts(chunks, vectors, embeddings.model(), fingerprint)?;

        info!(
            "Built vector index: {} chunks, model {}",
            index.len(),
            index.model
        );
        Ok(index)
    }

    /// Assemble an index from precomputed vectors
    ///
    /// # Errors
    /// - `ProcessingError` if the number of vectors differs from the number of chunks
    pub fn from_parts(
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
        model: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(DocRagError::ProcessingError(format!(
                "Got {} embeddings for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        Ok(Self {
            model: model.into(),
            fingerprint: fingerprint.into(),
            created_at: Utc::now(),
            entries: chunks
                .into_iter()
                .zip(vectors)
                .map(|(chunk, vector)| IndexEntry { chunk, vector })
                .collect(),
        })
    }

    /// The `k` entries closest to `query` by cosine distance.
    /// Equal distances keep ingestion order.
    pub fn search_by_vector(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_distance(query, &entry.vector)))
            .collect();

        // Stable sort: ties stay in ingestion order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        scored
            .into_iter()
            .take(k)
            .map(|(position, distance)| ScoredChunk {
                chunk: self.entries[position].chunk.clone(),
                distance,
            })
            .collect()
    }

    /// Embed the query text and search
    pub async fn search(
        &self,
        embeddings: &EmbeddingService,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let query_vector = embeddings.embed_query(query).await?;
        let results = self.search_by_vector(&query_vector, k);
        debug!("Search returned {} of {} chunks", results.len(), self.len());
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 1 - cosine similarity. Zero or mismatched vectors are treated as orthogonal.
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}
