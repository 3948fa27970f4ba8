//! Embedding API clients for hosted providers

use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::Embedder;
use crate::errors::DocRagError;
use crate::errors::Result;

/// Hosted embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// `OpenAI` embeddings API
    OpenAI,
    /// Ollama local embeddings
    Ollama,
}

/// Ollama has no batch endpoint; requests are fanned out this wide instead
const OLLAMA_CONCURRENCY: usize = 8;

/// HTTP client for generating embeddings from a hosted provider
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - `ConfigError` if the HTTP client cannot be built or an OpenAI client has no key
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        if provider == EmbeddingProvider::OpenAI && api_key.is_none() {
            return Err(DocRagError::ConfigError(
                "OpenAI API key not provided".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocRagError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub const fn provider(&self) -> EmbeddingProvider {
        self.provider
    }

    /// Generate embeddings in batch using `OpenAI` API
    async fn generate_batch_openai(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            input: &'a [&'a str],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            index: usize,
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI embeddings API: {} items", texts.len());

        let request = OpenAIRequest {
            input: texts,
            model: &self.model,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocRagError::UpstreamError(format!(
                "OpenAI embeddings API error ({status}): {error_text}"
            )));
        }

        let mut result: OpenAIResponse = response.json().await.map_err(|e| {
            DocRagError::UpstreamError(format!("Failed to parse embeddings response: {e}"))
        })?;

        if result.data.len() != texts.len() {
            return Err(DocRagError::UpstreamError(format!(
                "Embeddings API returned {} vectors for {} inputs",
                result.data.len(),
                texts.len()
            )));
        }

        // The API tags each vector with its input position
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocRagError::UpstreamError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response.json().await.map_err(|e| {
            DocRagError::UpstreamError(format!("Failed to parse Ollama response: {e}"))
        })?;

        Ok(result.embedding)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self.provider {
            EmbeddingProvider::OpenAI => {
                let mut vectors = self.generate_batch_openai(&[text]).await?;
                vectors.pop().ok_or_else(|| {
                    DocRagError::UpstreamError("No embedding in response".to_string())
                })
            }
            EmbeddingProvider::Ollama => self.generate_ollama(text).await,
        }
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        match self.provider {
            EmbeddingProvider::OpenAI => self.generate_batch_openai(texts).await,
            EmbeddingProvider::Ollama => {
                let concurrency = texts.len().clamp(1, OLLAMA_CONCURRENCY);
                let owned: Vec<String> = texts.iter().map(|text| (*text).to_string()).collect();
                let results: Vec<Result<Vec<f32>>> = stream::iter(owned)
                    .map(|text| async move { self.generate_ollama(&text).await })
                    .buffered(concurrency)
                    .collect()
                    .await;

                results.into_iter().collect()
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
