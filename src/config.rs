use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::DocRagError;

/// Environment variable holding the hosted model/embedding API credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    #[serde(default = "default_documents_directory")]
    pub directory: PathBuf,
    /// File extension matched during the recursive scan (case-insensitive)
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_documents_directory() -> PathBuf {
    PathBuf::from("./pdfs")
}

fn default_pattern() -> String {
    "pdf".to_string()
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            directory: default_documents_directory(),
            pattern: default_pattern(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

pub(crate) fn default_chunk_size() -> usize {
    1000
}

pub(crate) fn default_chunk_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_persist_directory")]
    pub persist_directory: PathBuf,
    /// Load the persisted index on startup when the corpus fingerprint still matches
    #[serde(default = "default_true")]
    pub reuse_persisted: bool,
}

fn default_persist_directory() -> PathBuf {
    PathBuf::from("./chroma_db")
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            persist_directory: default_persist_directory(),
            reuse_persisted: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

pub(crate) fn default_top_k() -> usize {
    crate::rag::DEFAULT_TOP_K
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    OpenAI,
    Ollama,
    /// Offline character n-gram hashing, no network access
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProviderKind,
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_embedding_provider() -> EmbeddingProviderKind {
    EmbeddingProviderKind::OpenAI
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

pub(crate) fn default_embedding_dimension() -> usize {
    crate::embeddings::DEFAULT_EMBEDDING_DIM
}

pub(crate) fn default_batch_size() -> usize {
    100
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            endpoint: default_openai_endpoint(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// USD per 1K prompt tokens
    #[serde(default = "default_prompt_cost")]
    pub prompt_cost_per_1k: f64,
    /// USD per 1K completion tokens
    #[serde(default = "default_completion_cost")]
    pub completion_cost_per_1k: f64,
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    120
}

pub(crate) fn default_prompt_cost() -> f64 {
    0.0005
}

pub(crate) fn default_completion_cost() -> f64 {
    0.0015
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_openai_endpoint(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
            prompt_cost_per_1k: default_prompt_cost(),
            completion_cost_per_1k: default_completion_cost(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: bool,
    /// Ingest before binding; when false the first request triggers ingestion
    #[serde(default = "default_true")]
    pub eager_ingest: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: false,
            eager_ingest: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub backtrace: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            backtrace: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DocRagError::ConfigError(format!(
                "Failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default config file path
    pub fn load() -> crate::Result<Self> {
        // Try config.toml first, then config.example.toml, then built-in defaults
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            tracing::debug!("No config file found, using built-in defaults");
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Reject parameter combinations the pipeline cannot honour
    pub fn validate(&self) -> crate::Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(DocRagError::ConfigError(
                "chunking.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(DocRagError::ConfigError(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(DocRagError::ConfigError(
                "retrieval.top_k must be a positive integer".to_string(),
            ));
        }
        if self.embeddings.batch_size == 0 {
            return Err(DocRagError::ConfigError(
                "embeddings.batch_size must be greater than zero".to_string(),
            ));
        }
        for (name, endpoint) in [
            ("embeddings.endpoint", &self.embeddings.endpoint),
            ("llm.endpoint", &self.llm.endpoint),
        ] {
            url::Url::parse(endpoint).map_err(|e| {
                DocRagError::ConfigError(format!("{name} is not a valid URL ({endpoint}): {e}"))
            })?;
        }
        Ok(())
    }

    /// Read the API credential from the environment (after `.env` is loaded)
    pub fn api_key(&self) -> crate::Result<String> {
        api_key_from(std::env::var(API_KEY_ENV).ok())
    }

    /// Get document directory
    pub fn documents_dir(&self) -> &Path {
        &self.documents.directory
    }

    /// Get index persistence directory
    pub fn persist_dir(&self) -> &Path {
        &self.index.persist_directory
    }

    /// Get chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunking.chunk_size
    }

    /// Get chunk overlap in characters
    pub fn chunk_overlap(&self) -> usize {
        self.chunking.chunk_overlap
    }

    /// Get default number of retrieved chunks
    pub fn top_k(&self) -> usize {
        self.retrieval.top_k
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }
}

/// Resolve the credential value, treating blank values as missing
pub(crate) fn api_key_from(value: Option<String>) -> crate::Result<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(DocRagError::ConfigError(format!(
            "{API_KEY_ENV} not found. Please set {API_KEY_ENV} in your environment or .env file"
        ))),
    }
}
