//! RAG session: Uninitialized -> Loaded -> Indexed

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use tracing::info;

use crate::chunker::TextSplitter;
use crate::config::AppConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::DocRagError;
use crate::errors::Result;
use crate::index::corpus_fingerprint;
use crate::index::IndexStore;
use crate::llm::CompletionClient;
use crate::llm::OpenAiChatClient;
use crate::llm::Pricing;
use crate::loader::DocumentLoader;
use crate::models::Chunk;
use crate::models::Document;
use crate::models::QueryResult;
use crate::models::SessionState;
use crate::rag::ContextAssembler;
use crate::rag::Mode;
use crate::rag::PromptComposer;
use crate::rag::Retriever;
use crate::rag::DEFAULT_INSTRUCTION;

/// Owns the loaded documents, the active index and the system instruction.
///
/// Mutating operations take `&mut self`; front ends that share a session wrap
/// it in a lock.
pub struct RagSession {
    loader: DocumentLoader,
    splitter: TextSplitter,
    retriever: Retriever,
    completion: Arc<dyn CompletionClient>,
    pricing: Pricing,
    context: ContextAssembler,
    index: IndexStore,
    documents: Vec<Document>,
    files: Vec<PathBuf>,
    instruction: String,
    state: SessionState,
    top_k: usize,
    reuse_persisted: bool,
}

impl RagSession {
    /// Build a session against the configured hosted services
    ///
    /// # Errors
    /// - `ConfigError` for invalid chunking settings or HTTP client setup failure
    pub fn new(config: &AppConfig, api_key: &str) -> Result<Self> {
        let embeddings = EmbeddingService::from_app_config(config, Some(api_key))?;
        let completion = Arc::new(OpenAiChatClient::new(&config.llm, api_key)?);
        Self::from_parts(
            config,
            DocumentLoader::with_extractor(
                config.documents_dir(),
                config.documents.pattern.clone(),
                Box::new(crate::loader::PdfExtractor),
            ),
            embeddings,
            completion,
        )
    }

    /// Build a session from explicit components
    ///
    /// # Errors
    /// - `ConfigError` if the chunking settings are invalid
    pub fn from_parts(
        config: &AppConfig,
        loader: DocumentLoader,
        embeddings: EmbeddingService,
        completion: Arc<dyn CompletionClient>,
    ) -> Result<Self> {
        let splitter = TextSplitter::new(config.chunk_size(), config.chunk_overlap())
            .map_err(|e| DocRagError::ConfigError(e.to_string()))?;

        Ok(Self {
            loader,
            splitter,
            retriever: Retriever::new(embeddings),
            completion,
            pricing: Pricing::from_config(&config.llm),
            context: ContextAssembler::default(),
            index: IndexStore::new(config.persist_dir()),
            documents: Vec::new(),
            files: Vec::new(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            state: SessionState::Uninitialized,
            top_k: config.top_k(),
            reuse_persisted: config.index.reuse_persisted,
        })
    }

    /// Start with a custom instruction instead of the default one
    #[must_use]
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Whether `process` may reuse a persisted index with a matching fingerprint
    pub fn set_reuse_persisted(&mut self, reuse: bool) {
        self.reuse_persisted = reuse;
    }

    /// Read every page under the document directory.
    ///
    /// Reloading an indexed session refreshes the documents but keeps the
    /// current index active until the next `process`.
    ///
    /// # Errors
    /// - `ConfigError` if the directory is missing or holds no matching files
    /// - `ProcessingError` if a file cannot be parsed
    pub fn load(&mut self) -> Result<usize> {
        let files = self.loader.discover_files()?;
        let documents = self.loader.load()?;

        self.files = files;
        self.documents = documents;
        if self.state == SessionState::Uninitialized {
            self.state = SessionState::Loaded;
        }

        info!(
            "Loaded {} pages from {}",
            self.documents.len(),
            self.loader.directory().display()
        );
        Ok(self.documents.len())
    }

    /// Chunk and index the loaded documents, returning the number of chunks.
    ///
    /// A persisted index with a matching corpus fingerprint is reused when
    /// enabled. Otherwise a new index is built and only replaces the current
    /// one once it is complete.
    ///
    /// # Errors
    /// - `NotInitialized` if `load` has not run
    /// - `ProcessingError` wrapping any chunking, embedding or persistence failure
    pub async fn process(&mut self) -> Result<usize> {
        if self.state == SessionState::Uninitialized {
            return Err(DocRagError::NotInitialized);
        }

        let fingerprint = corpus_fingerprint(
            &self.files,
            self.splitter.chunk_size(),
            self.splitter.chunk_overlap(),
            self.retriever.embeddings().model(),
        )
        .map_err(DocRagError::into_processing)?;

        if self.reuse_persisted
            && self
                .index
                .load_if_fresh(&fingerprint, self.retriever.embeddings().model())
                .map_err(DocRagError::into_processing)?
        {
            self.state = SessionState::Indexed;
            return Ok(self.chunk_count());
        }

        let chunks = self.splitter.split_documents(&self.documents);
        debug!(
            "Split {} documents into {} chunks",
            self.documents.len(),
            chunks.len()
        );

        let index = self
            .index
            .build(chunks, self.retriever.embeddings(), &fingerprint)
            .await
            .map_err(DocRagError::into_processing)?;

        self.state = SessionState::Indexed;
        info!("Indexed {} chunks", index.len());
        Ok(index.len())
    }

    /// `load` followed by `process`
    pub async fn ingest(&mut self) -> Result<usize> {
        self.load()?;
        self.process().await
    }

    /// Answer a question with the default `k`
    pub async fn query(&self, question: &str) -> Result<QueryResult> {
        self.query_with_k(question, self.top_k).await
    }

    /// Retrieve `k` chunks, ask the model and account for usage
    ///
    /// # Errors
    /// - `NotInitialized` unless the session is indexed
    /// - `InvalidArgument` for `k == 0` or a blank question
    /// - `UpstreamError` if embedding or completion fails
    pub async fn query_with_k(&self, question: &str, k: usize) -> Result<QueryResult> {
        self.ensure_indexed()?;

        let source_chunks = self.retriever.retrieve(&self.index, question, k).await?;
        let context = self.context.assemble(&source_chunks);
        let messages = PromptComposer::compose(&self.instruction, &context, question);

        let completion = self.completion.complete(&messages).await?;
        let cost = self.pricing.cost(&completion.usage);

        info!(
            "Answered with {} sources, {} tokens (${:.4})",
            source_chunks.len(),
            completion.usage.total_tokens,
            cost
        );

        Ok(QueryResult {
            response: completion.text,
            source_chunks,
            tokens_used: completion.usage,
            cost,
        })
    }

    /// The chunks a query would use, without calling the model
    pub async fn relevant_chunks(&self, question: &str, k: usize) -> Result<Vec<Chunk>> {
        self.ensure_indexed()?;
        self.retriever.retrieve(&self.index, question, k).await
    }

    /// Replace the system instruction used by later queries
    pub fn switch_mode(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
        debug!("System instruction set to {} mode", self.mode_name());
    }

    /// Switch to a built-in preset
    pub fn set_mode(&mut self, mode: Mode) {
        self.switch_mode(mode.instruction());
    }

    pub fn system_instruction(&self) -> &str {
        &self.instruction
    }

    /// Name of the active preset, or "custom"
    pub fn mode_name(&self) -> &'static str {
        Mode::from_instruction(&self.instruction).map_or("custom", Mode::name)
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn chunk_count(&self) -> usize {
        self.index.current().map_or(0, |index| index.len())
    }

    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    fn ensure_indexed(&self) -> Result<()> {
        if self.state == SessionState::Indexed {
            Ok(())
        } else {
            Err(DocRagError::NotInitialized)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::embeddings::NgramEmbedder;
    use crate::errors::ErrorKind;
    use crate::llm::ChatMessage;
    use crate::llm::Completion;
    use crate::loader::PageExtractor;
    use crate::models::TokenUsage;

    struct FormFeedExtractor;

    impl PageExtractor for FormFeedExtractor {
        fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
            let text = fs::read_to_string(path)?;
            Ok(text.split('\u{c}').map(str::to_string).collect())
        }
    }

    /// Answers with the instruction length and records every call
    #[derive(Default)]
    struct RecordingClient {
        calls: AtomicUsize,
        last: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = messages.to_vec();
            Ok(Completion {
                text: format!("answer under a {}-char instruction", messages[0].content.len()),
                usage: TokenUsage::new(100, 20),
            })
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn session(dir: &Path, client: Arc<RecordingClient>) -> RagSession {
        let docs = dir.join("pdfs");
        if !docs.exists() {
            fs::create_dir_all(&docs).unwrap();
            fs::write(
                docs.join("manual.pdf"),
                "The pump must be serviced every 90 days.\u{c}Invoices are due within 30 days.",
            )
            .unwrap();
        }

        let mut config = AppConfig::default();
        config.documents.directory = docs.clone();
        config.index.persist_directory = dir.join("db");
        config.chunking.chunk_size = 40;
        config.chunking.chunk_overlap = 10;

        RagSession::from_parts(
            &config,
            DocumentLoader::with_extractor(&docs, "pdf", Box::new(FormFeedExtractor)),
            EmbeddingService::new(Arc::new(NgramEmbedder::new(256))),
            client,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), Arc::new(RecordingClient::default()));
        assert_eq!(session.state(), SessionState::Uninitialized);

        assert_eq!(session.load().unwrap(), 2);
        assert_eq!(session.state(), SessionState::Loaded);

        let chunks = session.process().await.unwrap();
        assert!(chunks >= 2);
        assert_eq!(session.state(), SessionState::Indexed);
    }

    #[tokio::test]
    async fn test_query_before_process_is_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(RecordingClient::default());
        let mut session = session(dir.path(), client.clone());

        let err = session.query("pump?").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);

        session.load().unwrap();
        let err = session.query("pump?").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_process_before_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), Arc::new(RecordingClient::default()));
        let err = session.process().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);
    }

    #[tokio::test]
    async fn test_query_composes_instruction_context_and_question() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(RecordingClient::default());
        let mut session = session(dir.path(), client.clone());
        session.ingest().await.unwrap();

        let result = session.query("When is the pump serviced?").await.unwrap();
        assert!(!result.source_chunks.is_empty());
        assert!(result.source_chunks.len() <= 3);
        assert_eq!(result.tokens_used.total_tokens, 120);
        assert!((result.cost - (0.1 * 0.0005 + 0.02 * 0.0015)).abs() < 1e-12);

        let sent = client.last.lock().unwrap().clone();
        assert_eq!(sent[0].content, DEFAULT_INSTRUCTION);
        assert!(sent[1].content.starts_with("Context: "));
        assert!(sent[1].content.contains("Question: When is the pump serviced?"));
    }

    #[tokio::test]
    async fn test_switch_mode_keeps_state_and_prior_results() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(RecordingClient::default());
        let mut session = session(dir.path(), client.clone());
        session.ingest().await.unwrap();

        session.set_mode(Mode::Technical);
        let before = session.query("pump").await.unwrap();
        let before_text = before.response.clone();

        session.set_mode(Mode::Summary);
        assert_eq!(session.state(), SessionState::Indexed);
        assert_eq!(session.mode_name(), "summary");
        assert_eq!(before.response, before_text);

        let after = session.query("pump").await.unwrap();
        assert_ne!(before.response, after.response);
        assert_eq!(
            client.last.lock().unwrap()[0].content,
            Mode::Summary.instruction()
        );

        session.switch_mode("Answer in French.");
        assert_eq!(session.mode_name(), "custom");
        assert_eq!(session.system_instruction(), "Answer in French.");
    }

    #[tokio::test]
    async fn test_zero_k_rejected_without_calls() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(RecordingClient::default());
        let mut session = session(dir.path(), client.clone());
        session.ingest().await.unwrap();

        let err = session.query_with_k("pump", 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_question_rejected_without_calls() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(RecordingClient::default());
        let mut session = session(dir.path(), client.clone());
        session.ingest().await.unwrap();

        for question in ["", "   \n\t"] {
            let err = session.query(question).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_relevant_chunks_skips_model() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(RecordingClient::default());
        let mut session = session(dir.path(), client.clone());
        session.ingest().await.unwrap();

        let chunks = session.relevant_chunks("invoices due", 1).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_persisted_index_reused() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = session(dir.path(), Arc::new(RecordingClient::default()));
        let built = first.ingest().await.unwrap();

        let mut second = session(dir.path(), Arc::new(RecordingClient::default()));
        assert_eq!(second.ingest().await.unwrap(), built);
        assert_eq!(
            second.index.current().unwrap().created_at(),
            first.index.current().unwrap().created_at()
        );
        assert!(dir.path().join("db").join("index.json").exists());
    }

    #[tokio::test]
    async fn test_missing_directory_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.documents.directory = dir.path().join("absent");
        let mut session = RagSession::from_parts(
            &config,
            DocumentLoader::new(dir.path().join("absent")),
            EmbeddingService::new(Arc::new(NgramEmbedder::new(16))),
            Arc::new(RecordingClient::default()),
        )
        .unwrap();

        let err = session.load().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(session.state(), SessionState::Uninitialized);
    }
}
