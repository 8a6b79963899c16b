//! A titled workout note.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use liftnote_parser::WorkoutParser;

use crate::editor::{CommitOutcome, Editor, Settled};
use crate::error::Result;
use crate::line::{LineId, WorkoutLine};

/// A workout note: a title and the lines typed under it.
///
/// Every change to the lines bumps `updated_at`.
#[derive(Debug)]
pub struct Note {
    id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    editor: Editor,
}

impl Note {
    /// A new note with one empty line.
    pub fn new(title: impl Into<String>, parser: WorkoutParser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            editor: Editor::new(parser),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Read access to the lines.
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    // -- Line operations ----------------------------------------------------

    pub fn commit(&mut self, id: LineId, text: &str) -> Result<CommitOutcome> {
        let outcome = self.editor.commit(id, text)?;
        if outcome != CommitOutcome::Busy {
            self.touch();
        }
        Ok(outcome)
    }

    /// Commit to the line at 1-based `position`.
    pub fn commit_at(&mut self, position: usize, text: &str) -> Result<CommitOutcome> {
        let id = self.editor.line_at(position)?.id();
        self.commit(id, text)
    }

    /// Commit to the last line.
    pub fn commit_current(&mut self, text: &str) -> Result<CommitOutcome> {
        let id = self.editor.current().id();
        self.commit(id, text)
    }

    pub fn remove_at(&mut self, position: usize) -> Result<WorkoutLine> {
        let id = self.editor.line_at(position)?.id();
        let removed = self.editor.remove(id)?;
        self.touch();
        Ok(removed)
    }

    pub fn poll_outcomes(&mut self) -> Vec<Settled> {
        let settled = self.editor.poll_outcomes();
        if !settled.is_empty() {
            self.touch();
        }
        settled
    }

    pub async fn next_settled(&mut self) -> Option<Settled> {
        let settled = self.editor.next_settled().await;
        if settled.is_some() {
            self.touch();
        }
        settled
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use liftnote_agent::Gateway;

    use super::*;

    struct Empty;

    #[async_trait]
    impl Gateway for Empty {
        async fn call(&self, _: &str, _: &str) -> liftnote_agent::Result<String> {
            Ok("[]".into())
        }
    }

    fn note() -> Note {
        Note::new("Leg day", WorkoutParser::new(Arc::new(Empty)))
    }

    #[tokio::test]
    async fn new_note_has_one_blank_line() {
        let n = note();
        assert_eq!(n.title(), "Leg day");
        assert_eq!(n.created_at(), n.updated_at());
        assert_eq!(n.editor().len(), 1);
        assert!(n.editor().current().is_blank());
    }

    #[tokio::test]
    async fn changes_bump_updated_at() {
        let mut n = note();
        let created = n.updated_at();

        n.commit_current("squat 225 5x5").unwrap();
        let after_commit = n.updated_at();
        assert!(after_commit >= created);

        n.next_settled().await.unwrap();
        assert!(n.updated_at() >= after_commit);

        n.remove_at(1).unwrap();
        assert!(n.updated_at() >= after_commit);
        assert_eq!(n.editor().len(), 1);
    }
}
