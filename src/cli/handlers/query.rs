//! One-shot question handler

use std::io;

use crate::cli::output::print_info;
use crate::cli::output::write_chunks;
use crate::cli::output::write_query_result;
use crate::rag::validate_k;
use crate::rag::Mode;
use crate::rag::RagSession;
use crate::AppConfig;
use crate::Result;

pub async fn handle_query(
    config: &AppConfig,
    api_key: &str,
    question: String,
    k: Option<i64>,
    no_answer: bool,
    mode: Option<Mode>,
) -> Result<()> {
    // Reject a bad k before any ingestion or network traffic
    let k = k.map(validate_k).transpose()?.unwrap_or_else(|| config.top_k());

    let mut session = RagSession::new(config, api_key)?;
    if let Some(mode) = mode {
        session.set_mode(mode);
    }
    session.ingest().await?;

    print_info(&format!("🤖 Question: \"{question}\""));
    let mut out = io::stdout().lock();

    if no_answer {
        let chunks = session.relevant_chunks(&question, k).await?;
        write_chunks(&mut out, &chunks)?;
    } else {
        let result = session.query_with_k(&question, k).await?;
        write_query_result(&mut out, &result)?;
    }

    Ok(())
}
