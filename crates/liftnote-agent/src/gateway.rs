//! The gateway capability: one system prompt plus one user text in, one
//! text answer out.
//!
//! Consumers depend on the [`Gateway`] trait, never on [`LlmGateway`]
//! directly, so tests can substitute a deterministic double.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::{ChatRequest, LlmClient, Message};

/// Anything that can answer a single prompt.
///
/// Implementations perform at most one round trip per call and never retry;
/// retry policy belongs to the caller.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send `system_prompt` and `user_text` and return the non-empty answer.
    ///
    /// `user_text` is expected to be trimmed and non-empty.
    async fn call(&self, system_prompt: &str, user_text: &str) -> Result<String>;
}

/// The production gateway, backed by an HTTP [`LlmClient`].
#[derive(Debug, Clone)]
pub struct LlmGateway {
    client: LlmClient,
}

impl LlmGateway {
    /// Wrap an existing client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Model identifier requests are sent with.
    pub fn model(&self) -> &str {
        &self.client.config().model
    }
}

#[async_trait]
impl Gateway for LlmGateway {
    async fn call(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let config = self.client.config();
        let request = ChatRequest {
            model: config.model.clone(),
            messages: vec![Message::system(system_prompt), Message::user(user_text)],
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
        };

        let response = self.client.chat(&request).await?;
        Ok(response.text)
    }
}
