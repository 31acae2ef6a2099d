//! OpenAI completion backend
//!
//! This module implements [`CompletionBackend`] against the OpenAI Responses
//! API (or any compatible endpoint). The system prompt is sent as the first
//! input item, followed by the user/assistant history. Output text is
//! collected from the response's message items; a response with no text
//! yields an empty string.

use crate::config::OpenAiConfig;
use crate::error::{Result, TemporalError};
use crate::providers::{CompletionBackend, PromptMessage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI Responses API backend
///
/// # Examples
///
/// ```no_run
/// use temporal_selves::config::OpenAiConfig;
/// use temporal_selves::providers::{CompletionBackend, OpenAiBackend, PromptMessage};
///
/// # async fn example() -> temporal_selves::error::Result<()> {
/// let config = OpenAiConfig {
///     api_key: "sk-test".to_string(),
///     ..Default::default()
/// };
/// let backend = OpenAiBackend::new(config)?;
/// let reply = backend
///     .complete("You are a helpful assistant", &[PromptMessage::user("Hello!")])
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct OpenAiBackend {
    client: Client,
    config: OpenAiConfig,
}

/// Request structure for the Responses API
#[derive(Debug, Serialize)]
struct ResponsesRequest {
    model: String,
    input: Vec<ResponsesInputItem>,
}

/// Input item for the Responses API
#[derive(Debug, Serialize)]
struct ResponsesInputItem {
    role: String,
    content: String,
}

/// Response structure from the Responses API
#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<ResponsesOutputItem>,
}

/// Output item in a Responses API response
#[derive(Debug, Deserialize)]
struct ResponsesOutputItem {
    #[serde(default)]
    r#type: String,
    #[serde(default)]
    content: Vec<ResponsesContentPart>,
}

/// Content part of an output message
#[derive(Debug, Deserialize)]
struct ResponsesContentPart {
    #[serde(default)]
    r#type: String,
    #[serde(default)]
    text: String,
}

impl OpenAiBackend {
    /// Create a new OpenAI backend instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("temporal-selves/0.2.0")
            .build()
            .map_err(|e| {
                TemporalError::Completion(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!("Initialized OpenAI backend: model={}", config.model);

        Ok(Self { client, config })
    }

    /// The completion endpoint URL, honoring the `api_base` override
    fn endpoint(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!("{}/responses", base)
    }

    /// Collect the output text from a Responses API payload
    ///
    /// Returns an empty string when the response carries no text parts.
    fn output_text(response: &ResponsesResponse) -> String {
        response
            .output
            .iter()
            .filter(|item| item.r#type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.r#type == "output_text")
            .map(|part| part.text.as_str())
            .collect()
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, system_prompt: &str, messages: &[PromptMessage]) -> Result<String> {
        let mut input = Vec::with_capacity(messages.len() + 1);
        input.push(ResponsesInputItem {
            role: "system".to_string(),
            content: system_prompt.to_string(),
        });
        input.extend(messages.iter().map(|m| ResponsesInputItem {
            role: m.role.to_string(),
            content: m.content.clone(),
        }));

        let request = ResponsesRequest {
            model: self.config.model.clone(),
            input,
        };

        tracing::debug!(
            "Sending completion request: {} messages, model={}",
            request.input.len(),
            request.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {}", e);
                TemporalError::Completion(format!("Completion request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Completion API returned error {}: {}", status, error_text);
            return Err(TemporalError::Completion(format!(
                "Completion API returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let payload: ResponsesResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completion response: {}", e);
            TemporalError::Completion(format!("Failed to parse completion response: {}", e))
        })?;

        Ok(Self::output_text(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with_base(base: &str) -> OpenAiBackend {
        OpenAiBackend::new(OpenAiConfig {
            api_key: "sk-test".to_string(),
            api_base: Some(base.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_default_base() {
        let backend = OpenAiBackend::new(OpenAiConfig {
            api_key: "sk-test".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(backend.endpoint(), "https://api.openai.com/v1/responses");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = backend_with_base("http://localhost:9999/");
        assert_eq!(backend.endpoint(), "http://localhost:9999/responses");
    }

    #[test]
    fn test_output_text_collects_message_parts() {
        let payload: ResponsesResponse = serde_json::from_value(serde_json::json!({
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "Hello "},
                    {"type": "output_text", "text": "there."}
                ]}
            ]
        }))
        .unwrap();
        assert_eq!(OpenAiBackend::output_text(&payload), "Hello there.");
    }

    #[test]
    fn test_output_text_empty_when_no_text() {
        let payload: ResponsesResponse =
            serde_json::from_value(serde_json::json!({ "output": [] })).unwrap();
        assert_eq!(OpenAiBackend::output_text(&payload), "");
    }
}
