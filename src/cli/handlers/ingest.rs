//! Ingestion handler

use std::time::Instant;

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::rag::RagSession;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ingest(config: &AppConfig, api_key: &str, force: bool) -> Result<()> {
    let mut session = RagSession::new(config, api_key)?;
    if force {
        session.set_reuse_persisted(false);
    }

    print_info(&format!(
        "📄 Loading documents from {}",
        config.documents_dir().display()
    ));
    let pages = session.load()?;
    println!("   ✓ {pages} pages");

    print_info("🧠 Chunking and embedding...");
    let started = Instant::now();
    let chunks = session.process().await?;

    print_success(&format!(
        "Indexed {chunks} chunks into {} in {:.1}s",
        config.persist_dir().display(),
        started.elapsed().as_secs_f64()
    ));
    Ok(())
}
