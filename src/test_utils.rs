//! Shared test utilities
//!
//! Provides a fake completion backend that records every request it
//! receives, so orchestration tests can assert on outbound prompts and
//! message windows without a network.

use crate::error::{Result, TemporalError};
use crate::providers::{CompletionBackend, PromptMessage};
use async_trait::async_trait;
use std::sync::Mutex;

/// A recorded call: the system prompt and the outbound messages
pub type RecordedCall = (String, Vec<PromptMessage>);

/// Fake completion backend with a canned outcome
pub struct FakeBackend {
    reply: std::result::Result<String, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeBackend {
    /// A backend that always succeeds with the given reply
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend that always fails with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All calls recorded so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    async fn complete(&self, system_prompt: &str, messages: &[PromptMessage]) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), messages.to_vec()));

        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(TemporalError::Completion(message.clone()).into()),
        }
    }
}
