//! Embeddings generation module
//!
//! This module turns chunk and query text into vectors using one of several providers:
//! - OpenAI (text-embedding-ada-002, text-embedding-3-small, etc.)
//! - Ollama (local models)
//! - Local character n-gram hashing (offline, no credential needed)
//!
//! # Examples
//!
//! ```rust,no_run
//! use docrag::config::AppConfig;
//! use docrag::embeddings::EmbeddingService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::from_app_config(&config, Some("sk-..."))?;
//!
//!     let embedding = service.embed_query("What is the warranty period?").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;
pub mod local;
pub mod text_preprocessing;

use async_trait::async_trait;
pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;
pub use local::NgramEmbedder;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::errors::Result;

/// Default embedding dimension for OpenAI text-embedding-ada-002
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Maximum batch size for a single embedding request
pub const MAX_BATCH_SIZE: usize = 100;

/// A function from text to a fixed-dimension vector
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts, returning vectors in input order
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Model identifier, recorded alongside persisted indexes
    fn model_name(&self) -> &str;
}
