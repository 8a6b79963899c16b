//! Parser error types.
//!
//! [`ValidationError`] describes what is wrong with a model response;
//! [`ParserError`] is what the pipeline returns.  Gateway and validation
//! failures pass through [`ParserError`] with their own message intact; only
//! failures that fit neither are reported as [`ParserError::Internal`].

use liftnote_agent::GatewayError;

/// The model answered, but the answer is not a valid exercise list.
///
/// Every variant that concerns one element carries its zero-based `index`
/// and, where relevant, the offending `field`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The sanitized text is not parseable JSON.
    #[error("invalid JSON: {reason}")]
    InvalidJson { reason: String },

    /// The top-level JSON value is not an array.
    #[error("expected a JSON array of exercises, found {found}")]
    NotAnArray { found: &'static str },

    /// An array element is not an object.
    #[error("exercise[{index}]: expected an object, found {found}")]
    NotAnObject { index: usize, found: &'static str },

    /// A required field is absent.
    #[error("exercise[{index}]: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// A field holds a value of the wrong JSON type.
    #[error("exercise[{index}].{field}: expected {expected}, found {found}")]
    WrongType {
        index: usize,
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A numeric field is outside its allowed range.
    #[error("exercise[{index}].{field}: {constraint}, got {value}")]
    OutOfRange {
        index: usize,
        field: &'static str,
        constraint: &'static str,
        value: String,
    },

    /// `exercise` is present but blank.
    #[error("exercise[{index}].{field}: must not be blank")]
    Blank { index: usize, field: &'static str },
}

impl ValidationError {
    /// Name of the offending field, when the error concerns one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. }
            | Self::WrongType { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::Blank { field, .. } => Some(field),
            Self::InvalidJson { .. } | Self::NotAnArray { .. } | Self::NotAnObject { .. } => None,
        }
    }

    /// Index of the offending array element, when the error concerns one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::NotAnObject { index, .. }
            | Self::MissingField { index, .. }
            | Self::WrongType { index, .. }
            | Self::OutOfRange { index, .. }
            | Self::Blank { index, .. } => Some(*index),
            Self::InvalidJson { .. } | Self::NotAnArray { .. } => None,
        }
    }
}

/// Unified error type for the parsing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// The model call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The model answer failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Catch-all for failures that are neither of the above.
    #[error("parser error: {reason}")]
    Internal {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ParserError {
    /// Build an [`ParserError::Internal`] without an underlying cause.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
            source: None,
        }
    }

    /// Short machine-readable classification: `gateway`, `validation` or
    /// `internal`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Gateway(_) => "gateway",
            Self::Validation(_) => "validation",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Convenience alias used throughout the parser crate.
pub type Result<T> = std::result::Result<T, ParserError>;
