//! Language-model gateway for liftnote.
//!
//! This crate is the only place that talks to the outside model:
//!
//! - [`config`] -- [`GatewayConfig`], resolved once at startup.
//! - [`llm`] -- HTTP client for OpenAI-compatible and Anthropic chat APIs.
//! - [`gateway`] -- The [`Gateway`] capability trait and its HTTP-backed
//!   implementation [`LlmGateway`].
//! - [`error`] -- [`GatewayError`].

pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;

pub use config::{GatewayConfig, LlmProvider};
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, LlmGateway};
pub use llm::{ChatRequest, LlmClient, LlmResponse, Message, Role, Usage};
