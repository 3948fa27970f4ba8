//! Chat completion clients
//!
//! Answers are generated by a `CompletionClient`. The production
//! implementation talks to an OpenAI-compatible `/chat/completions` endpoint;
//! tests substitute their own.

pub mod client;
pub mod pricing;

use std::fmt;

use async_trait::async_trait;
pub use client::OpenAiChatClient;
pub use pricing::Pricing;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;
use crate::models::TokenUsage;

/// Chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Chat message for conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Generated text and the tokens it cost
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// Anything that can turn a message list into a completion
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate one completion for the conversation
    ///
    /// # Errors
    /// - `UpstreamError` on transport failure, non-success status or a malformed response
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion>;

    fn model_name(&self) -> &str;
}
