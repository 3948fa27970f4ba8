//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use docrag::config::EmbeddingProviderKind;
use docrag::embeddings::Embedder;
use docrag::embeddings::EmbeddingService;
use docrag::embeddings::NgramEmbedder;
use docrag::llm::ChatMessage;
use docrag::llm::Completion;
use docrag::llm::CompletionClient;
use docrag::loader::DocumentLoader;
use docrag::models::TokenUsage;
use docrag::AppConfig;
use docrag::DocRagError;
use docrag::RagSession;
use docrag::Result;
use lopdf::content::Content;
use lopdf::content::Operation;
use lopdf::dictionary;
use lopdf::Object;
use lopdf::Stream;

/// Completion client that answers from the prompt it was given and records calls
#[derive(Default)]
pub struct FakeCompletion {
    pub calls: AtomicUsize,
    pub messages: Mutex<Vec<Vec<ChatMessage>>>,
    pub fail: bool,
}

impl FakeCompletion {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system_message(&self) -> Option<String> {
        self.messages
            .lock()
            .unwrap()
            .last()
            .map(|messages| messages[0].content.clone())
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(DocRagError::UpstreamError(
                "429 Too Many Requests".to_string(),
            ));
        }

        let prompt_tokens = messages
            .iter()
            .map(|m| m.content.split_whitespace().count() as u32)
            .sum();
        Ok(Completion {
            text: format!("Answer ({} chars of instruction)", messages[0].content.len()),
            usage: TokenUsage::new(prompt_tokens, 12),
        })
    }

    fn model_name(&self) -> &str {
        "fake-chat"
    }
}

/// Offline embedder whose batch calls fail once `fail_batches` is set.
/// Single-text calls keep working so queries still succeed.
pub struct FlakyBatchEmbedder {
    inner: NgramEmbedder,
    pub fail_batches: AtomicBool,
}

impl FlakyBatchEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            inner: NgramEmbedder::new(dimension),
            fail_batches: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Embedder for FlakyBatchEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(DocRagError::UpstreamError("429 Too Many Requests".to_string()));
        }
        self.inner.embed_batch(texts).await
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

/// Write a PDF with one line of Courier text per page
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![36.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Two-page maintenance manual under `<root>/pdfs`
pub fn write_manual(root: &Path) {
    let pdfs = root.join("pdfs");
    std::fs::create_dir_all(&pdfs).unwrap();
    write_pdf(
        &pdfs.join("manual.pdf"),
        &[
            "The X-200 pump must be serviced every 90 days. Replace the seals annually.",
            "Warranty claims are accepted within 24 months of purchase with a receipt.",
        ],
    );
}

/// Config rooted in a temp dir using the offline embedder
pub fn test_config(root: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.documents.directory = root.join("pdfs");
    config.index.persist_directory = root.join("chroma_db");
    config.embeddings.provider = EmbeddingProviderKind::Local;
    config.embeddings.dimension = 256;
    config
}

pub fn test_session(config: &AppConfig, completion: Arc<FakeCompletion>) -> RagSession {
    let embeddings = EmbeddingService::from_app_config(config, None).unwrap();
    RagSession::from_parts(
        config,
        DocumentLoader::new(config.documents_dir()),
        embeddings,
        completion,
    )
    .unwrap()
}

pub fn test_session_with_embedder(
    config: &AppConfig,
    embedder: Arc<dyn Embedder>,
    completion: Arc<FakeCompletion>,
) -> RagSession {
    RagSession::from_parts(
        config,
        DocumentLoader::new(config.documents_dir()),
        EmbeddingService::new(embedder),
        completion,
    )
    .unwrap()
}
