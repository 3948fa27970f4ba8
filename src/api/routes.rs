//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create the question-answering router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Browser UI
        .route("/", get(handlers::home))
        .route("/static/js/main.js", get(handlers::main_script))
        // Health check
        .route("/health", get(handlers::health))
        // Question answering
        .route("/query", post(handlers::query))
        // System instruction
        .route("/switch-mode", post(handlers::switch_mode))
        .route("/mode", get(handlers::get_mode))
        .with_state(state)
}
