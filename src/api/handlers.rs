//! API request handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tokio::sync::RwLock;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::api::types::*;
use crate::errors::DocRagError;
use crate::models::SessionState;
use crate::rag::validate_k;
use crate::rag::Mode;
use crate::rag::RagSession;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<RagSession>>,
}

impl AppState {
    pub fn new(session: RagSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }
}

/// A failed request: status plus the error it carries
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: DocRagError,
}

impl ApiError {
    /// Malformed request, reported as 400
    pub fn bad_request(error: DocRagError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl From<DocRagError> for ApiError {
    /// Session failures are reported as 500
    fn from(error: DocRagError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.error);
        } else {
            warn!("Rejected request: {}", self.error);
        }
        (self.status, Json(ErrorResponse::from(&self.error))).into_response()
    }
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        ApiError::bad_request(DocRagError::InvalidArgument(rejection.body_text()))
    })
}

/// Ingest on first use if startup ingestion was skipped
async fn ensure_indexed(state: &AppState) -> Result<(), ApiError> {
    if state.session.read().await.state() == SessionState::Indexed {
        return Ok(());
    }

    let mut session = state.session.write().await;
    // Another request may have finished ingestion while we waited
    if session.state() != SessionState::Indexed {
        info!("Index not ready, ingesting documents");
        session.ingest().await?;
    }
    Ok(())
}

/// Browser front page
pub async fn home() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub async fn main_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        include_str!("../../static/js/main.js"),
    )
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let session_state = state.session.read().await.state();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        state: session_state,
    })
}

/// Answer a question from the indexed documents
pub async fn query(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let request = parse_body(body)?;
    let question = request
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| {
            ApiError::bad_request(DocRagError::InvalidArgument(
                "question must not be empty".to_string(),
            ))
        })?;
    let k = request
        .k
        .map(validate_k)
        .transpose()
        .map_err(ApiError::bad_request)?;

    info!("POST /query: {}", question);
    ensure_indexed(&state).await?;

    let session = state.session.read().await;
    let k = k.unwrap_or_else(|| session.top_k());
    let result = session.query_with_k(&question, k).await?;

    Ok(Json(QueryResponse::from(result)))
}

/// Switch the system instruction to a preset
pub async fn switch_mode(
    State(state): State<AppState>,
    body: Result<Json<SwitchModeRequest>, JsonRejection>,
) -> Result<Json<SwitchModeResponse>, ApiError> {
    let request = parse_body(body)?;
    let mode: Mode = request
        .mode
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(ApiError::bad_request)?;

    info!("POST /switch-mode: {}", mode);
    state.session.write().await.set_mode(mode);

    Ok(Json(SwitchModeResponse {
        success: true,
        mode: mode.name().to_string(),
    }))
}

/// Report the active system instruction
pub async fn get_mode(State(state): State<AppState>) -> Json<ModeResponse> {
    let session = state.session.read().await;
    Json(ModeResponse {
        mode: session.mode_name().to_string(),
        instruction: session.system_instruction().to_string(),
    })
}
