//! Completion backend abstraction
//!
//! This module contains the completion backend trait and the OpenAI-style
//! HTTP implementation. The backend is a black-box text-completion function:
//! it receives a system prompt plus an ordered user/assistant history and
//! returns generated text. No streaming, no retries.

pub mod openai;

pub use openai::OpenAiBackend;

use crate::config::OpenAiConfig;
use crate::error::Result;
use crate::session::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A role-tagged message sent to the completion backend
///
/// This is the wire shape of the proxy contract: roles are constrained to
/// user/assistant, and the system prompt travels separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Role of the message sender
    pub role: Role,
    /// Message text
    pub content: String,
}

impl PromptMessage {
    /// Creates a user prompt message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant prompt message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Trait for completion backends
///
/// Implementations forward the system prompt and message history to an
/// upstream completion API and return the generated text. Upstream failures
/// are surfaced as errors, never masked as empty completions.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Generate a completion for the given system prompt and history
    ///
    /// # Arguments
    ///
    /// * `system_prompt` - Instruction prompt injected as the first message
    /// * `messages` - Ordered user/assistant history, oldest first
    ///
    /// # Returns
    ///
    /// The generated text; an empty string when the upstream response
    /// carries no text.
    async fn complete(&self, system_prompt: &str, messages: &[PromptMessage]) -> Result<String>;
}

/// Create a completion backend from configuration
///
/// # Errors
///
/// Returns an error if HTTP client initialization fails
pub fn create_backend(config: &OpenAiConfig) -> Result<Box<dyn CompletionBackend>> {
    Ok(Box::new(OpenAiBackend::new(config.clone())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_message_constructors() {
        let user = PromptMessage::user("hi");
        assert_eq!(user.role, Role::User);
        let assistant = PromptMessage::assistant("hello");
        assert_eq!(assistant.role, Role::Assistant);
    }

    #[test]
    fn test_prompt_message_wire_format() {
        let msg = PromptMessage::user("I’m scared about finals");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "I’m scared about finals");
    }

    #[test]
    fn test_prompt_message_rejects_unknown_role() {
        let raw = serde_json::json!({"role": "system", "content": "sneaky"});
        assert!(serde_json::from_value::<PromptMessage>(raw).is_err());
    }

    #[test]
    fn test_create_backend() {
        let config = OpenAiConfig {
            api_key: "sk-test".to_string(),
            ..Default::default()
        };
        assert!(create_backend(&config).is_ok());
    }
}
