//! RAG (Retrieval-Augmented Generation) module
//!
//! This module answers questions over a directory of PDFs:
//! - Semantic retrieval of the closest chunks from the vector index
//! - Context assembly from retrieved chunks
//! - Prompt composition with a switchable system instruction
//! - LLM-based answer generation with token and cost accounting
//!
//! # Examples
//!
//! ```rust,no_run
//! use docrag::config::AppConfig;
//! use docrag::rag::RagSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let api_key = config.api_key()?;
//!     let mut session = RagSession::new(&config, &api_key)?;
//!     session.ingest().await?;
//!
//!     let result = session.query("What is the warranty period?").await?;
//!     println!("Answer: {}", result.response);
//!     println!("Sources: {} chunks", result.source_chunks.len());
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod prompts;
pub mod retriever;
pub mod session;

pub use context::ContextAssembler;
pub use prompts::build_document_qa_prompt;
pub use prompts::ChatMessage;
pub use prompts::Mode;
pub use prompts::PromptComposer;
pub use prompts::Role;
pub use prompts::DEFAULT_INSTRUCTION;
pub use retriever::validate_k;
pub use retriever::Retriever;
pub use retriever::DEFAULT_TOP_K;
pub use session::RagSession;
