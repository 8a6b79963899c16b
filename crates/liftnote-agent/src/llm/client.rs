//! Multi-provider LLM client.
//!
//! Speaks the **OpenAI Chat Completions API** (including OpenAI-compatible
//! endpoints such as Moonshot, Ollama and vLLM) and the **Anthropic Messages
//! API**, non-streaming.  One call is one HTTP round trip; nothing here
//! retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::config::{GatewayConfig, LlmProvider};
use crate::error::{GatewayError, Result};
use crate::llm::types::{ChatRequest, LlmResponse, Message, Role, Usage};

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Upper bound on how much of an error body is kept in [`GatewayError::ApiStatus`].
const MAX_ERROR_BODY_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// An LLM client bound to one provider endpoint.
///
/// Cheap to clone: the configuration is shared behind an `Arc` and the
/// underlying `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: Arc<GatewayConfig>,
    http: reqwest::Client,
}

impl LlmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Self::from_shared(Arc::new(config))
    }

    /// Create a client from an already shared configuration.
    pub fn from_shared(config: Arc<GatewayConfig>) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send a chat request and return the model's text answer.
    pub async fn chat(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let provider = self.config.provider;
        let (url, body) = match provider {
            LlmProvider::OpenAI => (
                format!("{}/chat/completions", self.base_url()),
                self.build_openai_request_body(request),
            ),
            LlmProvider::Anthropic => (
                format!("{}/v1/messages", self.base_url()),
                self.build_anthropic_request_body(request),
            ),
        };
        let headers = self.headers()?;

        tracing::debug!(url = %url, model = %body["model"], provider = provider.as_str(), "sending LLM request");

        let resp = self
            .http
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(GatewayError::ApiStatus {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let v: Value = serde_json::from_str(&text).map_err(|e| GatewayError::MalformedResponse {
            reason: format!("invalid JSON response: {e}"),
        })?;

        let response = match provider {
            LlmProvider::OpenAI => parse_openai_response(&v)?,
            LlmProvider::Anthropic => parse_anthropic_response(&v)?,
        };

        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "LLM response received"
        );
        Ok(response)
    }

    // -- Request building ----------------------------------------------------

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn model_for<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        if request.model.is_empty() {
            &self.config.model
        } else {
            &request.model
        }
    }

    /// Build the JSON body for the OpenAI Chat Completions API.
    fn build_openai_request_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({ "role": role_label(m.role), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": self.model_for(request),
            "max_tokens": request.max_tokens.unwrap_or(self.config.max_tokens),
            "messages": messages,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        body
    }

    /// Build the JSON body for the Anthropic Messages API.
    ///
    /// Anthropic takes the system prompt as a top-level field rather than as
    /// an entry in `messages`.
    fn build_anthropic_request_body(&self, request: &ChatRequest) -> Value {
        let (system, messages) = messages_to_anthropic(&request.messages);

        let mut body = json!({
            "model": self.model_for(request),
            "max_tokens": request.max_tokens.unwrap_or(self.config.max_tokens),
            "messages": messages,
        });

        if let Some(system) = system {
            body["system"] = json!(system);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        body
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let key = &self.config.api_key;

        match self.config.provider {
            LlmProvider::OpenAI => {
                let auth = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                    GatewayError::Config {
                        reason: format!("invalid authorization header: {e}"),
                    }
                })?;
                headers.insert(AUTHORIZATION, auth);
            }
            LlmProvider::Anthropic => {
                let value = HeaderValue::from_str(key).map_err(|e| GatewayError::Config {
                    reason: format!("invalid API key header: {e}"),
                })?;
                headers.insert("x-api-key", value);
                headers.insert(
                    "anthropic-version",
                    HeaderValue::from_static(ANTHROPIC_VERSION),
                );
            }
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else {
            GatewayError::RequestFailed {
                reason: e.to_string(),
            }
        }
    }
}

// ===========================================================================
// Wire format conversion (free functions)
// ===========================================================================

fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Split system messages out and convert the rest to Anthropic wire format.
fn messages_to_anthropic(messages: &[Message]) -> (Option<String>, Vec<Value>) {
    let mut system: Option<String> = None;
    let mut wire = Vec::with_capacity(messages.len());

    for msg in messages {
        match msg.role {
            Role::System => match &mut system {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(&msg.content);
                }
                None => system = Some(msg.content.clone()),
            },
            Role::User | Role::Assistant => {
                wire.push(json!({ "role": role_label(msg.role), "content": msg.content }));
            }
        }
    }

    (system, wire)
}

/// Parse a non-streaming OpenAI Chat Completions response.
///
/// A missing `choices[0].message` is malformed; a present message whose
/// content is null or blank is an empty response.
pub fn parse_openai_response(v: &Value) -> Result<LlmResponse> {
    let message = &v["choices"][0]["message"];
    if message.is_null() {
        return Err(GatewayError::MalformedResponse {
            reason: "missing `choices[0].message` in response".into(),
        });
    }

    let text = message["content"].as_str().unwrap_or_default();
    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }

    let usage = Usage {
        input_tokens: token_count(&v["usage"]["prompt_tokens"]),
        output_tokens: token_count(&v["usage"]["completion_tokens"]),
    };

    Ok(LlmResponse {
        text: text.to_owned(),
        usage,
    })
}

/// Parse a non-streaming Anthropic Messages response.
pub fn parse_anthropic_response(v: &Value) -> Result<LlmResponse> {
    let content = v["content"]
        .as_array()
        .ok_or_else(|| GatewayError::MalformedResponse {
            reason: "missing `content` array in response".into(),
        })?;

    let text: String = content
        .iter()
        .filter(|block| block["type"].as_str() == Some("text"))
        .filter_map(|block| block["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }

    let usage = Usage {
        input_tokens: token_count(&v["usage"]["input_tokens"]),
        output_tokens: token_count(&v["usage"]["output_tokens"]),
    };

    Ok(LlmResponse { text, usage })
}

fn token_count(v: &Value) -> u32 {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
