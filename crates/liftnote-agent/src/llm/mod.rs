//! LLM integration layer.
//!
//! - [`types`] -- Provider-agnostic messages, requests and responses.
//! - [`client`] -- HTTP client for the OpenAI and Anthropic chat APIs.

pub mod client;
pub mod types;

pub use client::LlmClient;
pub use types::{ChatRequest, LlmResponse, Message, Role, Usage};
