//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `docrag` CLI

use std::io;
use std::io::Write;

use crate::models::Chunk;
use crate::models::QueryResult;
use crate::models::SourcePreview;
use crate::AppConfig;
pub use crate::models::truncate_str;

/// Write an answer, its sources and usage
pub fn write_query_result(out: &mut impl Write, result: &QueryResult) -> io::Result<()> {
    writeln!(out, "\nResponse: {}", result.response)?;

    writeln!(out, "\nSource Documents:")?;
    for (i, source) in result.source_previews().iter().enumerate() {
        write_source(out, i + 1, source)?;
    }

    let usage = &result.tokens_used;
    writeln!(out, "\nTokens Used:")?;
    writeln!(out, "  Prompt tokens: {}", usage.prompt_tokens)?;
    writeln!(out, "  Completion tokens: {}", usage.completion_tokens)?;
    writeln!(out, "  Total tokens: {}", usage.total_tokens)?;
    writeln!(out, "  Cost: ${:.4}", result.cost)?;
    Ok(())
}

/// Write retrieved chunks without an answer
pub fn write_chunks(out: &mut impl Write, chunks: &[Chunk]) -> io::Result<()> {
    if chunks.is_empty() {
        writeln!(out, "No relevant chunks found")?;
    }
    for (i, chunk) in chunks.iter().enumerate() {
        write_source(out, i + 1, &SourcePreview::from_chunk(chunk))?;
    }
    Ok(())
}

fn write_source(out: &mut impl Write, number: usize, source: &SourcePreview) -> io::Result<()> {
    writeln!(out, "\nSource {number}:")?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "Content: {}", source.content)?;
    writeln!(out, "Source: {}", source.source)?;
    writeln!(out, "Page: {}", source.page)?;
    Ok(())
}

/// Print the effective configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 docrag Configuration:");
    println!();

    println!("📄 Documents:");
    println!("  Directory: {}", config.documents_dir().display());
    println!("  Extension: .{}", config.documents.pattern);
    println!();

    println!("✂️  Chunking:");
    println!("  Chunk size: {}", config.chunk_size());
    println!("  Overlap: {}", config.chunk_overlap());
    println!();

    println!("🗂️  Index:");
    println!("  Persist directory: {}", config.persist_dir().display());
    println!("  Reuse persisted: {}", config.index.reuse_persisted);
    println!("  Top k: {}", config.top_k());
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {:?}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embedding_model());
    println!("  Batch size: {}", config.embeddings.batch_size);
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  Model: {}", config.llm_model());
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Timeout: {}s", config.llm.timeout_secs);
    println!(
        "  Pricing: ${}/1K prompt, ${}/1K completion",
        config.llm.prompt_cost_per_1k, config.llm.completion_cost_per_1k
    );
    println!(
        "  Key: {}",
        if config.api_key().is_ok() { "set" } else { "missing" }
    );
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.cors);
    println!("  Eager ingest: {}", config.server.eager_ingest);
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}
