//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::*;
    use crate::errors::ErrorKind;

    // ====== Default Value Tests ======

    #[test]
    fn test_default_chunking() {
        let config = AppConfig::default();
        assert_eq!(config.chunk_size(), 1000);
        assert_eq!(config.chunk_overlap(), 200);
        assert_eq!(default_chunk_size(), 1000);
        assert_eq!(default_chunk_overlap(), 200);
    }

    #[test]
    fn test_default_retrieval_and_paths() {
        let config = AppConfig::default();
        assert_eq!(config.top_k(), 3);
        assert_eq!(config.documents_dir(), Path::new("./pdfs"));
        assert_eq!(config.persist_dir(), Path::new("./chroma_db"));
        assert_eq!(config.documents.pattern, "pdf");
    }

    #[test]
    fn test_default_llm() {
        let config = AppConfig::default();
        assert_eq!(config.llm_model(), "gpt-3.5-turbo");
        assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
        assert!(config.llm.max_tokens.is_none());
        assert!((default_prompt_cost() - 0.0005).abs() < f64::EPSILON);
        assert!((default_completion_cost() - 0.0015).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_embeddings() {
        let config = AppConfig::default();
        assert_eq!(config.embeddings.provider, EmbeddingProviderKind::OpenAI);
        assert_eq!(config.embedding_model(), "text-embedding-ada-002");
        assert_eq!(default_embedding_dimension(), 1536);
        assert_eq!(default_batch_size(), 100);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    // ====== TOML Parsing Tests ======

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.chunk_size(), 1000);
        assert_eq!(config.server.port, 5000);
        assert!(config.server.eager_ingest);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
[documents]
directory = "/data/manuals"

[chunking]
chunk_size = 500
chunk_overlap = 50

[embeddings]
provider = "local"
dimension = 256

[llm]
model = "gpt-4o-mini"
max_tokens = 512

[server]
port = 8080
cors = true
"#,
        )
        .unwrap();

        assert_eq!(config.documents_dir(), Path::new("/data/manuals"));
        assert_eq!(config.chunk_size(), 500);
        assert_eq!(config.chunk_overlap(), 50);
        assert_eq!(config.embeddings.provider, EmbeddingProviderKind::Local);
        assert_eq!(config.embeddings.dimension, 256);
        assert_eq!(config.llm_model(), "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, Some(512));
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors);
        // untouched sections keep their defaults
        assert_eq!(config.top_k(), 3);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = AppConfig::from_toml_str("[chunking\nchunk_size = 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    // ====== Validation Tests ======

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = 1000;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("chunk_overlap"));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = AppConfig::default();
        config.chunking.chunk_size = 0;
        config.chunking.chunk_overlap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut config = AppConfig::default();
        config.llm.endpoint = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.endpoint"));
    }

    // ====== Credential Tests ======

    #[test]
    fn test_api_key_missing() {
        let err = api_key_from(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_api_key_blank_is_missing() {
        assert!(api_key_from(Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_api_key_trimmed() {
        assert_eq!(api_key_from(Some(" sk-test \n".to_string())).unwrap(), "sk-test");
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file("/definitely/not/here/config.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
