//! Workout line editor for liftnote.
//!
//! A note is an ordered list of [`WorkoutLine`]s.  Committing text to a line
//! parses it in the background; the line moves through
//! `editing -> processing -> parsed | error` as the parse settles.
//!
//! - [`line`] -- [`WorkoutLine`], its pure state transitions and rendering.
//! - [`editor`] -- [`Editor`], the line collection and outcome channel.
//! - [`note`] -- [`Note`], a titled editor with timestamps.

pub mod editor;
pub mod error;
pub mod line;
pub mod note;

pub use editor::{CommitOutcome, Editor, ParseOutcome, Settled};
pub use error::{EditorError, Result};
pub use line::{Commit, LineId, LineState, LineView, WorkoutLine};
pub use note::Note;
