//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers.  It is read-only after startup.

use liftnote_parser::WorkoutParser;

/// Shared state accessible from every Axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The parser every request goes through.
    pub parser: WorkoutParser,

    /// Model identifier reported by `/api/status`.
    pub model: String,
}
