//! Workout text parsing for liftnote.
//!
//! This crate provides:
//!
//! - **Prompt**: the fixed system prompt describing the output contract
//!   via [`prompt::system_prompt`].
//! - **Sanitizer**: code-fence stripping for model answers via
//!   [`sanitize::clean`].
//! - **Validator**: strict JSON-to-record conversion via
//!   [`validate::validate`].
//! - **Pipeline**: the end-to-end flow via [`pipeline::WorkoutParser`].

pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod sanitize;
pub mod validate;

pub use error::{ParserError, Result, ValidationError};
pub use pipeline::{WorkoutParser, parse_workout};
pub use prompt::{PromptConfig, build_system_prompt, system_prompt};
pub use record::{ExerciseRecord, format_records};
pub use sanitize::clean;
pub use validate::validate;
