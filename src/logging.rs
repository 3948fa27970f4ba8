//! Logging configuration for DocRAG

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{
    self,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::AppConfig;
use crate::Result;

const LOGS_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "docrag.log";

/// Initialize logging using the level from configuration
pub fn init_logging_with_config(config: &AppConfig) -> Result<()> {
    if config.logging.backtrace && std::env::var_os("RUST_BACKTRACE").is_none() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }
    init_logging_with_level(&config.logging.level)
}

/// Initialize logging with a custom log level, console and file output
pub fn init_logging_with_level(level: &str) -> Result<()> {
    let logs_dir = Path::new(LOGS_DIR);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    // RUST_LOG wins over the configured level when it is set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let file_appender = tracing_appender::rolling::daily(LOGS_DIR, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized with level: {}", level);
    tracing::debug!("Log files will be saved to: {}/{}.YYYY-MM-DD", LOGS_DIR, LOG_FILE_PREFIX);

    // The writer must outlive every log call in the process
    std::mem::forget(guard);

    Ok(())
}

/// Initialize simple console-only logging for tests and tools
pub fn init_simple_logging() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
    Ok(())
}

fn filter_directive(level: &str) -> String {
    format!("{level},docrag={level}")
}
