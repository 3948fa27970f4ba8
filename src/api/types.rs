//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::errors::DocRagError;
use crate::models::QueryResult;
use crate::models::SessionState;
use crate::models::SourcePreview;
use crate::models::TokenUsage;

/// `POST /query` body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub question: Option<String>,
    /// Overrides the configured number of retrieved chunks
    #[serde(default)]
    pub k: Option<i64>,
}

/// `POST /switch-mode` body
#[derive(Debug, Deserialize)]
pub struct SwitchModeRequest {
    #[serde(default)]
    pub mode: Option<String>,
}

/// `POST /query` success body
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    pub sources: Vec<SourcePreview>,
    pub tokens: TokenUsage,
    pub cost: f64,
}

impl From<QueryResult> for QueryResponse {
    fn from(result: QueryResult) -> Self {
        Self {
            sources: result.source_previews(),
            response: result.response,
            tokens: result.tokens_used,
            cost: result.cost,
        }
    }
}

/// `POST /switch-mode` success body
#[derive(Debug, Serialize, Deserialize)]
pub struct SwitchModeResponse {
    pub success: bool,
    pub mode: String,
}

/// `GET /mode` body
#[derive(Debug, Serialize, Deserialize)]
pub struct ModeResponse {
    /// "technical", "summary" or "custom"
    pub mode: String,
    pub instruction: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub state: SessionState,
}

/// Error body for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&DocRagError> for ErrorResponse {
    fn from(err: &DocRagError) -> Self {
        Self {
            error: err.to_string(),
            code: err.kind().code().to_string(),
        }
    }
}
