//! Editor error types.

use crate::line::LineId;

/// Unified error type for the line editor.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// No line with this id exists in the collection.
    #[error("line not found: {id}")]
    LineNotFound { id: LineId },

    /// A line number given by the user is outside the collection.
    #[error("no line {position} (note has {len} lines)")]
    PositionOutOfRange { position: usize, len: usize },
}

/// Convenience alias used throughout the editor crate.
pub type Result<T> = std::result::Result<T, EditorError>;
