//! API server handlers

use crate::api::serve_api;
use crate::rag::RagSession;
use crate::AppConfig;
use crate::Result;

pub async fn handle_serve_api(
    config: &AppConfig,
    api_key: &str,
    host: Option<String>,
    port: Option<u16>,
    cors: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    // CLI flag takes priority over config
    let cors = cors || config.server.cors;

    println!("🚀 Starting docrag API Server");
    println!("==============================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!("🌐 CORS: {}", if cors { "Enabled" } else { "Disabled" });
    println!("📄 Documents: {}", config.documents_dir().display());
    println!();

    let session = RagSession::new(config, api_key)?;
    serve_api(config, session, host, port, cors).await
}
