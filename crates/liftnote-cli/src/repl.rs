//! Subcommand: `liftnote edit` -- line-by-line note editor.
//!
//! Each line typed on stdin is committed to the note's current line.  Parses
//! run in the background and their outcomes are printed as they settle, so
//! the user can keep typing while earlier lines are still processing.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use liftnote_editor::{CommitOutcome, EditorError, LineState, Note, Settled, WorkoutLine};
use liftnote_parser::WorkoutParser;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    /// Plain text for the current line.
    Text(&'a str),
    /// `:lines`
    Lines,
    /// `:edit N TEXT`, or `:edit N` to show the line's text
    Edit { position: usize, text: &'a str },
    /// `:rm N`
    Remove { position: usize },
    /// `:help`
    Help,
    /// `:quit`
    Quit,
    /// A `:` command that could not be understood.
    Invalid(String),
}

/// Classify one line of input.
pub fn parse_command(input: &str) -> ReplCommand<'_> {
    let Some(rest) = input.trim_start().strip_prefix(':') else {
        return ReplCommand::Text(input);
    };

    let (name, args) = rest
        .trim()
        .split_once(char::is_whitespace)
        .map_or((rest.trim(), ""), |(n, a)| (n, a.trim()));

    match name {
        "lines" | "ls" => ReplCommand::Lines,
        "help" | "h" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        "rm" => match args.parse() {
            Ok(position) => ReplCommand::Remove { position },
            Err(_) => ReplCommand::Invalid("usage: :rm N".into()),
        },
        "edit" | "e" => {
            let (n, text) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            match n.parse() {
                Ok(position) => ReplCommand::Edit {
                    position,
                    text: text.trim(),
                },
                Err(_) => ReplCommand::Invalid("usage: :edit N TEXT".into()),
            }
        }
        other => ReplCommand::Invalid(format!("unknown command :{other} (try :help)")),
    }
}

const HELP: &str = "\
  <text>          commit text to the current line
  :lines          list all lines
  :edit N TEXT    re-commit line N with TEXT
  :edit N         show line N's text for editing
  :rm N           remove line N
  :quit           exit";

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Run the editor until `:quit` or end of input.
pub async fn cmd_edit(parser: WorkoutParser, title: String) -> Result<()> {
    let mut note = Note::new(title, parser);
    info!(note = %note.id(), title = %note.title(), "note opened");

    println!();
    println!("  {}", note.title());
    println!("  Type a workout line and press Enter. :help for commands.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            settled = note.next_settled(), if note.editor().in_flight() > 0 => {
                if let Some(settled) = settled {
                    print_settled(&settled);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                if !handle_input(&mut note, &line) {
                    break;
                }
            }
        }
    }

    // Let parses already in flight finish before leaving.
    while let Some(settled) = note.next_settled().await {
        print_settled(&settled);
    }
    info!(note = %note.id(), lines = note.editor().len(), "note closed");
    Ok(())
}

/// Apply one line of input.  Returns `false` when the user asked to quit.
fn handle_input(note: &mut Note, input: &str) -> bool {
    let result = match parse_command(input) {
        ReplCommand::Quit => return false,
        ReplCommand::Help => {
            println!("{HELP}");
            return true;
        }
        ReplCommand::Lines => {
            print_lines(note);
            return true;
        }
        ReplCommand::Invalid(msg) => {
            println!("  {msg}");
            return true;
        }
        ReplCommand::Text(text) => {
            let position = note.editor().len();
            note.commit_current(text).map(|o| (position, o))
        }
        ReplCommand::Edit { position, text: "" } => {
            match prefill(note, position) {
                Ok(text) => {
                    println!("  [{position}] {text}");
                    println!("  re-commit with :edit {position} TEXT");
                }
                Err(e) => println!("  {e}"),
            }
            return true;
        }
        ReplCommand::Edit { position, text } => {
            note.commit_at(position, text).map(|o| (position, o))
        }
        ReplCommand::Remove { position } => match note.remove_at(position) {
            Ok(line) => {
                println!("  removed [{position}] {}", line.raw_text());
                return true;
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok((position, CommitOutcome::Started { .. })) => println!("  [{position}] parsing..."),
        Ok((position, CommitOutcome::Busy)) => {
            println!("  [{position}] still parsing, try again when it settles");
        }
        Ok((_, CommitOutcome::Blank)) => {}
        Err(e) => println!("  {e}"),
    }
    true
}

/// Text to start from when reopening line `position`: the record summary
/// once parsed, the raw text otherwise.
fn prefill(note: &Note, position: usize) -> Result<String, EditorError> {
    note.editor().line_at(position).map(WorkoutLine::edit_text)
}

fn print_settled(settled: &Settled) {
    println!("  [{}] {}", settled.position, describe(&settled.line));
}

fn print_lines(note: &Note) {
    for (i, line) in note.editor().lines().iter().enumerate() {
        if line.is_blank() {
            println!("  {:>3} {:<10} (empty)", i + 1, line.state().name());
        } else {
            println!("  {:>3} {:<10} {}", i + 1, line.state().name(), line.view());
        }
    }
}

fn describe(line: &WorkoutLine) -> String {
    match line.state() {
        LineState::Parsed { records } if records.is_empty() => "no exercises found".into(),
        LineState::Error { message } => format!("error: {message}"),
        _ => line.view().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use liftnote_agent::Gateway;

    use super::*;

    #[test]
    fn plain_text_is_text() {
        assert_eq!(parse_command("squat 225 5x5"), ReplCommand::Text("squat 225 5x5"));
        assert_eq!(parse_command(""), ReplCommand::Text(""));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command(":lines"), ReplCommand::Lines);
        assert_eq!(parse_command(" :quit "), ReplCommand::Quit);
        assert_eq!(parse_command(":q"), ReplCommand::Quit);
        assert_eq!(parse_command(":help"), ReplCommand::Help);
    }

    #[test]
    fn edit_takes_position_and_text() {
        assert_eq!(
            parse_command(":edit 2 bench 135 3x10"),
            ReplCommand::Edit {
                position: 2,
                text: "bench 135 3x10"
            }
        );
        assert_eq!(
            parse_command(":edit 3"),
            ReplCommand::Edit {
                position: 3,
                text: ""
            }
        );
        assert!(matches!(parse_command(":edit x squat"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn rm_takes_position() {
        assert_eq!(parse_command(":rm 4"), ReplCommand::Remove { position: 4 });
        assert!(matches!(parse_command(":rm"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(parse_command(":frobnicate"), ReplCommand::Invalid(_)));
    }

    struct Squat;

    #[async_trait]
    impl Gateway for Squat {
        async fn call(&self, _: &str, _: &str) -> liftnote_agent::Result<String> {
            Ok(r#"[{"exercise":"Barbell Back Squat","weight":225,"sets":5,"reps":5,"duration":null}]"#.into())
        }
    }

    #[tokio::test]
    async fn reopening_a_line_prefills_its_summary() {
        let mut note = Note::new("Legs", WorkoutParser::new(Arc::new(Squat)));
        note.commit_current("squat 225 5x5").unwrap();
        assert_eq!(prefill(&note, 1).unwrap(), "squat 225 5x5");

        note.next_settled().await.unwrap();
        assert_eq!(prefill(&note, 1).unwrap(), "Barbell Back Squat - 225 lbs - 5x5");
        assert_eq!(prefill(&note, 2).unwrap(), "");
        assert!(matches!(
            prefill(&note, 9),
            Err(EditorError::PositionOutOfRange { position: 9, .. })
        ));
    }

    #[tokio::test]
    async fn bare_edit_does_not_commit() {
        let mut note = Note::new("Legs", WorkoutParser::new(Arc::new(Squat)));
        note.commit_current("squat 225 5x5").unwrap();
        note.next_settled().await.unwrap();

        assert!(handle_input(&mut note, ":edit 1"));
        assert_eq!(note.editor().in_flight(), 0);
        assert!(matches!(
            note.editor().line_at(1).unwrap().state(),
            LineState::Parsed { .. }
        ));
    }
}
