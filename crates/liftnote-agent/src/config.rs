//! Gateway configuration.
//!
//! [`GatewayConfig`] is built once at startup and handed to
//! [`LlmClient`](crate::LlmClient) behind an `Arc`; nothing mutates it
//! afterwards.  Values resolve in three layers: built-in defaults, then an
//! optional TOML (or JSON) file, then `LIFTNOTE_*` environment variables.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GatewayError, Result};

/// Default base URL: the OpenAI-compatible Moonshot endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.ai/v1";

/// Default Anthropic API base URL.
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "kimi-k2.5";

/// Default maximum tokens per response.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Provider enum
// ---------------------------------------------------------------------------

/// Identifies which wire protocol the client should speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI Chat Completions API (also covers OpenAI-compatible endpoints).
    #[default]
    OpenAI,
    /// Anthropic Messages API.
    Anthropic,
}

impl LlmProvider {
    /// Lowercase label used in logs and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "openai-compatible" | "moonshot" | "kimi" => Ok(Self::OpenAI),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(GatewayError::Config {
                reason: format!("unknown provider `{other}`"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Connection settings for the language-model endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Which provider protocol to use.
    pub provider: LlmProvider,
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API (e.g. `https://api.moonshot.ai/v1`).
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Maximum tokens per response.
    pub max_tokens: u32,
    /// Sampling temperature.  `None` leaves the provider default.
    pub temperature: Option<f32>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: Some(0.0),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// The API key never reaches log output.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a configuration for any OpenAI-compatible endpoint.
    pub fn openai_compatible(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    /// Create a configuration for the Anthropic Messages API.
    pub fn anthropic(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            api_key: api_key.into(),
            base_url: ANTHROPIC_BASE_URL.to_owned(),
            model: model.into(),
            ..Self::default()
        }
    }

    /// Resolve the full configuration: defaults, then `path` (if given), then
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let config = base.with_env(|key| std::env::var(key).ok());
        debug!(config = ?config, "gateway configuration resolved");
        Ok(config)
    }

    /// Load configuration from a TOML file, or JSON when the extension is
    /// `.json`.  Keys absent from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GatewayError::Config {
            reason: format!("failed to read config file {}: {e}", path.display()),
        })?;

        let config: Self = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(|e| GatewayError::Config {
                reason: format!("failed to parse JSON config: {e}"),
            })?
        } else {
            toml::from_str(&content).map_err(|e| GatewayError::Config {
                reason: format!("failed to parse TOML config: {e}"),
            })?
        };

        info!(path = %path.display(), "configuration loaded from file");
        Ok(config)
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Empty values are ignored.  `KIMI_API_KEY` is accepted when
    /// `LIFTNOTE_API_KEY` is unset.  Unparseable provider or timeout values
    /// are logged and skipped.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        if let Some(raw) = get("LIFTNOTE_PROVIDER") {
            match raw.parse::<LlmProvider>() {
                Ok(provider) => {
                    if provider == LlmProvider::Anthropic && self.base_url == DEFAULT_BASE_URL {
                        self.base_url = ANTHROPIC_BASE_URL.to_owned();
                    }
                    self.provider = provider;
                }
                Err(e) => tracing::warn!(error = %e, "ignoring LIFTNOTE_PROVIDER"),
            }
        }
        if let Some(key) = get("LIFTNOTE_API_KEY").or_else(|| get("KIMI_API_KEY")) {
            self.api_key = key;
        }
        if let Some(url) = get("LIFTNOTE_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = get("LIFTNOTE_MODEL") {
            self.model = model;
        }
        if let Some(raw) = get("LIFTNOTE_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring LIFTNOTE_TIMEOUT_SECS"),
            }
        }
        self
    }

    /// Check that the configuration can be used to build a client.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(GatewayError::MissingApiKey {
                provider: self.provider.as_str().into(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(GatewayError::Config {
                reason: "base_url must not be empty".into(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(GatewayError::Config {
                reason: "model must not be empty".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(GatewayError::Config {
                reason: "timeout_secs must be at least 1".into(),
            });
        }
        Ok(())
    }
}
