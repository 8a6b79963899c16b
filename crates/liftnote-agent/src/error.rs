//! Gateway error types.
//!
//! Every failure of the language-model boundary surfaces as a
//! [`GatewayError`].  Transport failures and "no usable content" failures are
//! separate variants so callers can tell them apart.

/// Unified error type for the model gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // -- Transport -----------------------------------------------------------
    /// The HTTP request could not be sent or its body could not be read.
    #[error("llm request failed: {reason}")]
    RequestFailed { reason: String },

    /// The request did not complete within the configured timeout.
    #[error("llm request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The provider answered with a non-success HTTP status.
    #[error("llm api returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    // -- Content -------------------------------------------------------------
    /// The provider answered, but not in the shape its API documents.
    #[error("llm response malformed: {reason}")]
    MalformedResponse { reason: String },

    /// The provider answered with no text content.
    #[error("llm returned empty response")]
    EmptyResponse,

    // -- Configuration -------------------------------------------------------
    /// The API key is missing for a provider that requires one.
    #[error("missing api key for provider: {provider}")]
    MissingApiKey { provider: String },

    /// Configuration validation or loading failed.
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl GatewayError {
    /// Whether the failure happened before any content came back.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed { .. } | Self::Timeout { .. } | Self::ApiStatus { .. }
        )
    }
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_content_failures_are_distinguishable() {
        assert!(GatewayError::RequestFailed { reason: "refused".into() }.is_transport());
        assert!(GatewayError::Timeout { secs: 5 }.is_transport());
        assert!(!GatewayError::EmptyResponse.is_transport());
        assert!(!GatewayError::MalformedResponse { reason: "x".into() }.is_transport());
    }

    #[test]
    fn empty_response_message() {
        assert_eq!(
            GatewayError::EmptyResponse.to_string(),
            "llm returned empty response"
        );
    }
}
