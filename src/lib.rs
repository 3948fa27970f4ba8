pub mod api;
pub mod chunker;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod index;
pub mod llm;
pub mod loader;
pub mod logging;
pub mod models;
pub mod rag;

#[cfg(test)]
mod config_tests;

pub use config::AppConfig;
pub use errors::*;
pub use rag::RagSession;
