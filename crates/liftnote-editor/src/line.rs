//! A single workout line and its parsing lifecycle.
//!
//! ```text
//!            commit (non-blank)           success
//!  Editing ───────────────────> Processing ───────> Parsed
//!     ^                            │  ^               │
//!     │                    failure │  └── commit ─────┤
//!     │                            v                  │
//!     │                          Error ── commit ─────┘
//! ```
//!
//! Transitions are pure: they take `&self` and hand back a new line, leaving
//! the caller to swap it into its collection.  Every accepted commit bumps
//! the line's generation so a late completion for an older commit can be
//! recognised and dropped.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use liftnote_parser::{ExerciseRecord, format_records};

// ---------------------------------------------------------------------------
// LineId
// ---------------------------------------------------------------------------

/// Stable identity of a workout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LineId(Uuid);

impl LineId {
    /// Allocate a fresh, time-ordered id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where a line is in its lifecycle.  Each variant carries only the data
/// that is valid for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LineState {
    /// Initial state; the user is typing.
    Editing,
    /// A parse is in flight.
    Processing,
    /// The last parse succeeded.
    Parsed { records: Vec<ExerciseRecord> },
    /// The last parse failed.
    Error { message: String },
}

impl LineState {
    /// Lowercase state name, as shown to users.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Processing => "processing",
            Self::Parsed { .. } => "parsed",
            Self::Error { .. } => "error",
        }
    }
}

/// Result of offering text to a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// The line moved to [`LineState::Processing`]; parse `text` and report
    /// back with `generation`.
    Started {
        line: WorkoutLine,
        text: String,
        generation: u64,
    },
    /// The text was blank.  The line is unchanged.
    Blank,
    /// A parse is already in flight for this line.
    Busy,
}

// ---------------------------------------------------------------------------
// WorkoutLine
// ---------------------------------------------------------------------------

/// One user-editable row of raw text and its parse state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutLine {
    id: LineId,
    raw_text: String,
    #[serde(flatten)]
    state: LineState,
    #[serde(skip)]
    generation: u64,
}

impl WorkoutLine {
    /// A fresh, empty line in [`LineState::Editing`].
    pub fn new() -> Self {
        Self {
            id: LineId::new(),
            raw_text: String::new(),
            state: LineState::Editing,
            generation: 0,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    /// The text most recently committed, verbatim.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn state(&self) -> &LineState {
        &self.state
    }

    /// Number of commits this line has accepted.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, LineState::Processing)
    }

    /// An untouched `Editing` line with no text.
    pub fn is_blank(&self) -> bool {
        matches!(self.state, LineState::Editing) && self.raw_text.trim().is_empty()
    }

    /// Text to prefill when the user reopens the line: the record summary
    /// for a parsed line, the raw text otherwise.
    pub fn edit_text(&self) -> String {
        match &self.state {
            LineState::Parsed { records } => format_records(records),
            _ => self.raw_text.clone(),
        }
    }

    // -- Transitions --------------------------------------------------------

    /// Offer `text` to the line.
    ///
    /// Non-blank text moves any non-processing line to `Processing` and
    /// stores `text` verbatim.  Blank text changes nothing.
    pub fn commit(&self, text: &str) -> Commit {
        if self.is_processing() {
            return Commit::Busy;
        }
        if text.trim().is_empty() {
            return Commit::Blank;
        }

        let generation = self.generation + 1;
        Commit::Started {
            line: Self {
                id: self.id,
                raw_text: text.to_owned(),
                state: LineState::Processing,
                generation,
            },
            text: text.to_owned(),
            generation,
        }
    }

    /// Settle an in-flight parse.
    ///
    /// Returns `None` when the completion is stale: the line is not
    /// processing, or `generation` belongs to an earlier commit.
    pub fn resolve(
        &self,
        generation: u64,
        result: Result<Vec<ExerciseRecord>, String>,
    ) -> Option<Self> {
        if !self.is_processing() || generation != self.generation {
            return None;
        }

        let state = match result {
            Ok(records) => LineState::Parsed { records },
            Err(message) => LineState::Error { message },
        };
        Some(Self {
            state,
            raw_text: self.raw_text.clone(),
            ..*self
        })
    }

    // -- Rendering ----------------------------------------------------------

    pub fn view(&self) -> LineView<'_> {
        match &self.state {
            LineState::Editing => LineView::Editable {
                text: &self.raw_text,
            },
            LineState::Processing => LineView::Busy {
                text: &self.raw_text,
            },
            LineState::Parsed { records } => LineView::Parsed {
                summary: format_records(records),
            },
            LineState::Error { message } => LineView::Failed {
                text: &self.raw_text,
                message,
            },
        }
    }
}

impl Default for WorkoutLine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// LineView
// ---------------------------------------------------------------------------

/// How a line should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineView<'a> {
    /// Editable input holding the current text.
    Editable { text: &'a str },
    /// Read-only, with a busy marker.
    Busy { text: &'a str },
    /// The structured records.
    Parsed { summary: String },
    /// The raw text next to the error message.
    Failed { text: &'a str, message: &'a str },
}

impl LineView<'_> {
    /// Whether the user may type into the line.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Busy { .. })
    }
}

impl fmt::Display for LineView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editable { text } => f.write_str(text),
            Self::Busy { text } => write!(f, "{text} (parsing...)"),
            Self::Parsed { summary } => f.write_str(summary),
            Self::Failed { text, message } => write!(f, "{text} [error: {message}]"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
