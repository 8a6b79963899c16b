//! The ordered collection of workout lines.
//!
//! [`Editor`] owns the lines and is the only writer.  Commits spawn a
//! background tokio task per line; finished parses come back over an
//! [`tokio::sync::mpsc`] channel and are applied by the owner, one at a
//! time, via [`Editor::poll_outcomes`] or [`Editor::next_settled`].
//!
//! Observers get [`Arc<[WorkoutLine]>`] snapshots.  Every change replaces
//! the whole slice, so a snapshot never changes under its holder.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use liftnote_parser::{ExerciseRecord, ParserError, WorkoutParser};

use crate::error::{EditorError, Result};
use crate::line::{Commit, LineId, WorkoutLine};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What happened when text was committed to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A parse was started for the line.
    Started { generation: u64 },
    /// The text was blank; no parse was started.
    Blank,
    /// The line already has a parse in flight; the commit was ignored.
    Busy,
}

/// A finished parse, sent from the background task to the editor.
#[derive(Debug)]
pub struct ParseOutcome {
    pub line: LineId,
    pub generation: u64,
    pub result: std::result::Result<Vec<ExerciseRecord>, ParserError>,
}

/// A line whose parse has just been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    /// 1-based position of the line at the time it settled.
    pub position: usize,
    pub line: WorkoutLine,
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// Owner of an ordered list of [`WorkoutLine`]s.
pub struct Editor {
    lines: Arc<[WorkoutLine]>,
    parser: WorkoutParser,
    /// Parses spawned whose outcome has not been received yet.
    in_flight: usize,
    outcome_rx: mpsc::UnboundedReceiver<ParseOutcome>,
    outcome_tx: mpsc::UnboundedSender<ParseOutcome>,
}

impl Editor {
    /// Create an editor holding one empty line.
    pub fn new(parser: WorkoutParser) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            lines: Arc::from(vec![WorkoutLine::new()]),
            parser,
            in_flight: 0,
            outcome_rx,
            outcome_tx,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Snapshot of all lines, in order.
    pub fn lines(&self) -> Arc<[WorkoutLine]> {
        Arc::clone(&self.lines)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: LineId) -> Result<&WorkoutLine> {
        self.lines
            .iter()
            .find(|l| l.id() == id)
            .ok_or(EditorError::LineNotFound { id })
    }

    /// Line at 1-based `position`.
    pub fn line_at(&self, position: usize) -> Result<&WorkoutLine> {
        position
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .ok_or(EditorError::PositionOutOfRange {
                position,
                len: self.lines.len(),
            })
    }

    /// The last line, where new text is typed.
    pub fn current(&self) -> &WorkoutLine {
        // The collection is never empty: `new` seeds one line and `remove`
        // refills it.
        &self.lines[self.lines.len() - 1]
    }

    /// Number of parses whose outcome has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    // -- Mutation -----------------------------------------------------------

    /// Commit `text` to line `id`.
    ///
    /// Non-blank text starts a background parse.  Unless the line is busy,
    /// a fresh empty line is appended for the next entry, blank text
    /// included.
    pub fn commit(&mut self, id: LineId, text: &str) -> Result<CommitOutcome> {
        let index = self.index_of(id)?;

        let outcome = match self.lines[index].commit(text) {
            Commit::Busy => {
                debug!(line = %id, "commit ignored, parse in flight");
                return Ok(CommitOutcome::Busy);
            }
            Commit::Blank => CommitOutcome::Blank,
            Commit::Started {
                line,
                text,
                generation,
            } => {
                self.update(|lines| lines[index] = line);
                self.spawn_parse(id, generation, text);
                CommitOutcome::Started { generation }
            }
        };

        self.append_empty();
        Ok(outcome)
    }

    /// Commit `text` to the line at 1-based `position`.
    pub fn commit_at(&mut self, position: usize, text: &str) -> Result<CommitOutcome> {
        let id = self.line_at(position)?.id();
        self.commit(id, text)
    }

    /// Append an empty `Editing` line and return its id.
    pub fn append_empty(&mut self) -> LineId {
        let line = WorkoutLine::new();
        let id = line.id();
        self.update(|lines| lines.push(line));
        id
    }

    /// Remove line `id`.  A parse still in flight for it is discarded when
    /// it arrives.  Removing the last remaining line leaves one empty line.
    pub fn remove(&mut self, id: LineId) -> Result<WorkoutLine> {
        let index = self.index_of(id)?;
        let removed = self.lines[index].clone();
        self.update(|lines| {
            lines.remove(index);
            if lines.is_empty() {
                lines.push(WorkoutLine::new());
            }
        });
        debug!(line = %id, "line removed");
        Ok(removed)
    }

    // -- Outcomes -----------------------------------------------------------

    /// Apply a finished parse.
    ///
    /// Returns the settled line, or `None` if the outcome is stale (the
    /// line was removed or re-committed since).
    pub fn apply(&mut self, outcome: ParseOutcome) -> Option<Settled> {
        let ParseOutcome {
            line: id,
            generation,
            result,
        } = outcome;

        let Ok(index) = self.index_of(id) else {
            debug!(line = %id, generation, "dropping outcome for removed line");
            return None;
        };

        let result = result.map_err(|e| e.to_string());
        let Some(settled) = self.lines[index].resolve(generation, result) else {
            debug!(
                line = %id,
                generation,
                current = self.lines[index].generation(),
                "dropping stale outcome"
            );
            return None;
        };

        info!(line = %id, state = settled.state().name(), "line settled");
        self.update(|lines| lines[index] = settled.clone());
        Some(Settled {
            position: index + 1,
            line: settled,
        })
    }

    /// Apply every outcome that has already arrived, without waiting.
    ///
    /// Returns the lines that settled.
    pub fn poll_outcomes(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            settled.extend(self.apply(outcome));
        }
        settled
    }

    /// Wait for the next outcome that actually changes a line.
    ///
    /// Returns `None` once nothing is in flight.
    pub async fn next_settled(&mut self) -> Option<Settled> {
        while self.in_flight > 0 {
            let outcome = self.outcome_rx.recv().await?;
            self.in_flight -= 1;
            if let Some(settled) = self.apply(outcome) {
                return Some(settled);
            }
        }
        None
    }

    /// Wait until every in-flight parse has been applied or dropped.
    pub async fn settle_all(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Some(s) = self.next_settled().await {
            settled.push(s);
        }
        settled
    }

    // -- Internals ----------------------------------------------------------

    fn index_of(&self, id: LineId) -> Result<usize> {
        self.lines
            .iter()
            .position(|l| l.id() == id)
            .ok_or(EditorError::LineNotFound { id })
    }

    /// Replace the line slice with an edited copy.
    fn update(&mut self, edit: impl FnOnce(&mut Vec<WorkoutLine>)) {
        let mut lines = self.lines.to_vec();
        edit(&mut lines);
        self.lines = Arc::from(lines);
    }

    fn spawn_parse(&mut self, id: LineId, generation: u64, text: String) {
        let parser = self.parser.clone();
        let tx = self.outcome_tx.clone();
        self.in_flight += 1;

        debug!(line = %id, generation, "spawning parse");
        tokio::spawn(async move {
            let result = parser.parse(&text).await;
            let _ = tx.send(ParseOutcome {
                line: id,
                generation,
                result,
            });
        });
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("lines", &self.lines)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use liftnote_agent::Gateway;

    use super::*;
    use crate::line::LineState;

    struct Echo;

    #[async_trait]
    impl Gateway for Echo {
        async fn call(&self, _: &str, user_text: &str) -> liftnote_agent::Result<String> {
            Ok(format!(r#"[{{"exercise":"{user_text}"}}]"#))
        }
    }

    fn editor() -> Editor {
        Editor::new(WorkoutParser::new(Arc::new(Echo)))
    }

    #[tokio::test]
    async fn starts_with_one_blank_line() {
        let ed = editor();
        assert_eq!(ed.len(), 1);
        assert!(ed.current().is_blank());
        assert_eq!(ed.in_flight(), 0);
    }

    #[tokio::test]
    async fn blank_commit_still_appends_a_line() {
        let mut ed = editor();
        let id = ed.current().id();
        assert_eq!(ed.commit(id, "  ").unwrap(), CommitOutcome::Blank);
        assert_eq!(ed.len(), 2);
        assert_eq!(ed.in_flight(), 0);
        assert!(ed.line(id).unwrap().is_blank());
        assert_ne!(ed.current().id(), id);
    }

    #[tokio::test]
    async fn busy_commit_appends_nothing() {
        let mut ed = editor();
        let id = ed.current().id();
        ed.commit(id, "Squat").unwrap();
        assert_eq!(ed.len(), 2);
        assert_eq!(ed.commit(id, "Bench").unwrap(), CommitOutcome::Busy);
        assert_eq!(ed.len(), 2);
        ed.settle_all().await;
    }

    #[tokio::test]
    async fn commit_then_settle() {
        let mut ed = editor();
        let id = ed.current().id();

        let outcome = ed.commit(id, "Squat").unwrap();
        assert_eq!(outcome, CommitOutcome::Started { generation: 1 });
        assert!(ed.line(id).unwrap().is_processing());
        assert_eq!(ed.len(), 2);

        let settled = ed.next_settled().await.unwrap();
        assert_eq!(settled.position, 1);
        assert_eq!(
            settled.line.state(),
            &LineState::Parsed {
                records: vec![ExerciseRecord::new("Squat")]
            }
        );
        assert!(ed.next_settled().await.is_none());
    }

    #[tokio::test]
    async fn snapshots_are_not_mutated() {
        let mut ed = editor();
        let before = ed.lines();
        let id = ed.current().id();
        ed.commit(id, "Squat").unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].state(), &LineState::Editing);
        assert!(ed.lines()[0].is_processing());
        ed.settle_all().await;
    }

    #[tokio::test]
    async fn unknown_line_is_error() {
        let mut ed = editor();
        let err = ed.commit(LineId::new(), "Squat").unwrap_err();
        assert!(matches!(err, EditorError::LineNotFound { .. }));
        assert!(matches!(
            ed.line_at(0),
            Err(EditorError::PositionOutOfRange { position: 0, len: 1 })
        ));
        assert!(ed.line_at(2).is_err());
    }

    #[tokio::test]
    async fn removing_only_line_leaves_a_blank_one() {
        let mut ed = editor();
        let id = ed.current().id();
        ed.remove(id).unwrap();
        assert_eq!(ed.len(), 1);
        assert_ne!(ed.current().id(), id);
        assert!(ed.current().is_blank());
    }
}
