//! HTTP server implementation

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::rag::RagSession;
use crate::Result;

/// Router with tracing, compression and optional CORS
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut app = routes::api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
///
/// With `eager_ingest` the documents are indexed before the listener binds, so
/// the first request never waits on ingestion and startup fails loudly on bad
/// input. Otherwise the first `/query` triggers ingestion.
pub async fn serve_api(
    config: &AppConfig,
    mut session: RagSession,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("🚀 Starting docrag API server...");

    if config.server.eager_ingest {
        let chunks = session.ingest().await?;
        info!("📚 Index ready: {} chunks", chunks);
    } else {
        info!("Ingestion deferred until the first query");
    }

    let app = build_app(AppState::new(session), enable_cors);

    // Start server
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health       - Health check");
    info!("  POST /query        - Ask a question");
    info!("  POST /switch-mode  - Switch to the technical or summary instruction");
    info!("  GET  /mode         - Active instruction");

    axum::serve(listener, app).await?;

    Ok(())
}
