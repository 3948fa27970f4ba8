//! Embedding generation service with preprocessing and batch processing

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;

use super::client::EmbeddingClient;
use super::client::EmbeddingProvider;
use super::local::NgramEmbedder;
use super::preprocess_text_for_embedding;
use super::Embedder;
use super::MAX_BATCH_SIZE;
use crate::config::AppConfig;
use crate::config::EmbeddingProviderKind;
use crate::errors::DocRagError;
use crate::errors::Result;

/// Service for generating embeddings over any `Embedder`
#[derive(Clone)]
pub struct EmbeddingService {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl EmbeddingService {
    /// Wrap an embedder with the default batch size
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Set the number of texts sent per request
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Build the configured provider
    ///
    /// # Errors
    /// - `ConfigError` when a hosted provider needs a key that was not supplied
    pub fn from_app_config(config: &AppConfig, api_key: Option<&str>) -> Result<Self> {
        let settings = &config.embeddings;
        let timeout = Duration::from_secs(config.llm.timeout_secs);

        let embedder: Arc<dyn Embedder> = match settings.provider {
            EmbeddingProviderKind::Local => Arc::new(NgramEmbedder::new(settings.dimension)),
            EmbeddingProviderKind::OpenAI => Arc::new(EmbeddingClient::new(
                EmbeddingProvider::OpenAI,
                settings.model.clone(),
                settings.endpoint.clone(),
                Some(
                    api_key
                        .ok_or_else(|| {
                            DocRagError::ConfigError("OpenAI API key not provided".to_string())
                        })?
                        .to_string(),
                ),
                timeout,
            )?),
            EmbeddingProviderKind::Ollama => Arc::new(EmbeddingClient::new(
                EmbeddingProvider::Ollama,
                settings.model.clone(),
                settings.endpoint.clone(),
                None,
                timeout,
            )?),
        };

        info!(
            "Embedding provider: {:?} ({})",
            settings.provider,
            embedder.model_name()
        );
        Ok(Self::new(embedder).with_batch_size(settings.batch_size))
    }

    /// Embed a query string
    ///
    /// # Errors
    /// - `InvalidArgument` when the query is blank
    /// - `UpstreamError` from the provider
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let processed = preprocess_text_for_embedding(text).ok_or_else(|| {
            DocRagError::InvalidArgument("question must not be empty".to_string())
        })?;
        self.embedder.embed(&processed).await
    }

    /// Embed chunk texts in input order. Blank texts get zero vectors without a provider call.
    pub async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Preprocess texts and track the positions of the blank ones
        let mut processed_texts = Vec::with_capacity(texts.len());
        let mut empty_positions = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            match preprocess_text_for_embedding(text) {
                Some(processed) => processed_texts.push(processed),
                None => empty_positions.push(i),
            }
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for (batch_no, batch) in processed_texts.chunks(self.batch_size).enumerate() {
            debug!("Embedding batch {} ({} texts)", batch_no + 1, batch.len());
            let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
            let vectors = self.embedder.embed_batch(&refs).await?;
            if vectors.len() != refs.len() {
                return Err(DocRagError::UpstreamError(format!(
                    "Embedder returned {} vectors for {} texts",
                    vectors.len(),
                    refs.len()
                )));
            }
            embeddings.extend(vectors);
        }

        // Insert zero vectors for blank texts at their original positions
        let dimension = embeddings.first().map_or(0, Vec::len);
        for pos in empty_positions {
            embeddings.insert(pos, vec![0.0; dimension]);
        }

        Ok(embeddings)
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        self.embedder.model_name()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;

    use super::*;

    /// Embeds text as [len, calls-so-far] and counts batches
    #[derive(Default)]
    struct CountingEmbedder {
        batches: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.chars().count() as f32, 1.0])
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| vec![t.chars().count() as f32, 1.0])
                .collect())
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_blank_texts_get_zero_vectors_in_place() {
        let embedder = Arc::new(CountingEmbedder::default());
        let service = EmbeddingService::new(embedder.clone());

        let vectors = service
            .embed_documents(&["", "hello", "  \n", "hi\nthere"])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 4);
        assert_eq!(vectors[0], vec![0.0, 0.0]);
        assert_eq!(vectors[1], vec![5.0, 1.0]);
        assert_eq!(vectors[2], vec![0.0, 0.0]);
        // newline flattened to a space before embedding
        assert_eq!(vectors[3], vec![8.0, 1.0]);
        assert_eq!(embedder.batches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_batches_respect_batch_size() {
        let embedder = Arc::new(CountingEmbedder::default());
        let service = EmbeddingService::new(embedder.clone()).with_batch_size(2);
        let texts = ["a", "b", "c", "d", "e"];

        let vectors = service.embed_documents(&texts).await.unwrap();
        assert_eq!(vectors.len(), 5);
        assert_eq!(embedder.batches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_blank_query_rejected_without_call() {
        let embedder = Arc::new(CountingEmbedder::default());
        let service = EmbeddingService::new(embedder.clone());

        let err = service.embed_query("   ").await.unwrap_err();
        assert!(matches!(err, DocRagError::InvalidArgument(_)));
        assert_eq!(embedder.batches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let mut config = AppConfig::default();
        config.embeddings.provider = EmbeddingProviderKind::Local;
        config.embeddings.dimension = 64;

        let service = EmbeddingService::from_app_config(&config, None).unwrap();
        assert_eq!(service.model(), "local-ngram-64");
    }

    #[test]
    fn test_openai_provider_needs_key() {
        let config = AppConfig::default();
        assert!(EmbeddingService::from_app_config(&config, None).is_err());
    }
}
