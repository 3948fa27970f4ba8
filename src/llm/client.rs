//! OpenAI-compatible chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatMessage;
use super::Completion;
use super::CompletionClient;
use crate::config::LlmConfig;
use crate::errors::DocRagError;
use crate::errors::Result;
use crate::models::TokenUsage;

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Client for `/chat/completions`. Each call is a single attempt bounded by the
/// configured timeout.
pub struct OpenAiChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiChatClient {
    /// # Errors
    /// - `ConfigError` if the HTTP client cannot be built
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocRagError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl CompletionClient for OpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion> {
        let request = ChatCompletionsRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Sending {} messages to {} ({})",
            messages.len(),
            self.url(),
            self.model
        );

        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocRagError::UpstreamError(format!(
                "Chat completion failed ({status}): {body}"
            )));
        }

        let parsed: ChatCompletionsResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                DocRagError::UpstreamError("No choices in chat completion response".to_string())
            })?;

        let usage = parsed.usage.map_or_else(TokenUsage::default, |u| {
            TokenUsage::new(u.prompt_tokens, u.completion_tokens)
        });
        debug!(
            "Completion used {} prompt + {} completion tokens",
            usage.prompt_tokens, usage.completion_tokens
        );

        Ok(Completion { text, usage })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
