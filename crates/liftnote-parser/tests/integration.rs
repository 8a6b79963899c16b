//! Integration tests for the parsing pipeline.
//!
//! A scripted gateway stands in for the model so every test is
//! deterministic and offline.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use liftnote_agent::{Gateway, GatewayError};
use liftnote_parser::{
    ExerciseRecord, ParserError, ValidationError, WorkoutParser, clean, format_records,
    system_prompt, validate,
};

// ── helpers ──────────────────────────────────────────────────────────────────

/// Replies with a fixed answer and records what it was asked.
struct Scripted {
    answer: String,
    calls: AtomicUsize,
    last_input: Mutex<Option<(String, String)>>,
}

impl Scripted {
    fn new(answer: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.into(),
            calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_input(&self) -> Option<(String, String)> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for Scripted {
    async fn call(&self, system_prompt: &str, user_text: &str) -> liftnote_agent::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some((system_prompt.to_owned(), user_text.to_owned()));
        Ok(self.answer.clone())
    }
}

async fn parse_with(answer: &str, input: &str) -> Result<Vec<ExerciseRecord>, ParserError> {
    WorkoutParser::new(Scripted::new(answer)).parse(input).await
}

fn assert_rejected(result: Result<Vec<ExerciseRecord>, ParserError>) -> ValidationError {
    match result {
        Err(ParserError::Validation(e)) => e,
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ── scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bench_press_line() {
    let gw = Scripted::new(
        r#"[{"exercise":"Barbell Bench Press","weight":135,"sets":3,"reps":10,"duration":null}]"#,
    );
    let records = WorkoutParser::new(gw.clone())
        .parse("bench press 135 3x10")
        .await
        .unwrap();

    assert_eq!(
        records,
        vec![
            ExerciseRecord::new("Barbell Bench Press")
                .with_weight(135)
                .with_sets(3)
                .with_reps(10)
        ]
    );

    let (prompt, user) = gw.last_input().unwrap();
    assert_eq!(prompt, system_prompt());
    assert_eq!(user, "bench press 135 3x10");
}

#[tokio::test]
async fn timed_exercise_keeps_duration() {
    let records = parse_with(
        r#"[{"exercise":"Plank","weight":0,"sets":3,"reps":null,"duration":30}]"#,
        "plank 3x30s",
    )
    .await
    .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reps, None);
    assert_eq!(records[0].duration, Some(30));
    assert_eq!(records[0].weight, Some(0));
}

#[tokio::test]
async fn two_exercises_keep_source_order() {
    let records = parse_with(
        r#"[
            {"exercise":"Barbell Back Squat","weight":225,"sets":3,"reps":8,"duration":null},
            {"exercise":"Lat Pulldown","weight":120,"sets":4,"reps":10,"duration":null}
        ]"#,
        "squat 225 3x8\nlat pulldown 120 4x10",
    )
    .await
    .unwrap();

    let names: Vec<_> = records.iter().map(|r| r.exercise.as_str()).collect();
    assert_eq!(names, ["Barbell Back Squat", "Lat Pulldown"]);
    assert_eq!(
        format_records(&records),
        "Barbell Back Squat - 225 lbs - 3x8, Lat Pulldown - 120 lbs - 4x10"
    );
}

// ── properties ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn whitespace_inputs_return_empty_without_calling() {
    let gw = Scripted::new("this would fail validation");
    let parser = WorkoutParser::new(gw.clone());

    for input in ["", " ", "\t", "\n\n", "  \r\n  "] {
        assert!(parser.parse(input).await.unwrap().is_empty(), "{input:?}");
    }
    assert_eq!(gw.calls(), 0);
}

#[tokio::test]
async fn repeated_parses_agree() {
    let answer = r#"```json
[{"exercise":"Deadlift","weight":315,"sets":1,"reps":5,"duration":null}]
```"#;
    let parser = WorkoutParser::new(Scripted::new(answer));

    let first = parser.parse("dl 315 1x5").await.unwrap();
    for _ in 0..5 {
        assert_eq!(parser.parse("dl 315 1x5").await.unwrap(), first);
    }

    let parser = WorkoutParser::new(Scripted::new(r#"[{"sets":3}]"#));
    for _ in 0..3 {
        let err = assert_rejected(parser.parse("dl").await);
        assert!(matches!(err, ValidationError::MissingField { field: "exercise", .. }));
    }
}

#[tokio::test]
async fn fenced_and_bare_answers_agree() {
    let bare = r#"[{"exercise":"Push-ups","weight":0,"sets":3,"reps":20,"duration":null}]"#;

    for fenced in [
        format!("```json\n{bare}\n```"),
        format!("```\n{bare}\n```"),
        format!("  ```JSON\n{bare}\n```\n"),
    ] {
        assert_eq!(validate(clean(&fenced)), validate(clean(bare)));
        assert_eq!(
            parse_with(&fenced, "pushups 3x20").await.unwrap(),
            parse_with(bare, "pushups 3x20").await.unwrap()
        );
    }
}

#[tokio::test]
async fn missing_exercise_discards_batch() {
    let err = assert_rejected(
        parse_with(
            r#"[{"exercise":"Squat","sets":3},{"weight":135,"sets":3,"reps":10,"duration":null}]"#,
            "squat 3 sets, something 135 3x10",
        )
        .await,
    );
    assert_eq!(err.index(), Some(1));
    assert_eq!(err.field(), Some("exercise"));
}

#[tokio::test]
async fn string_weight_discards_batch() {
    let err = assert_rejected(
        parse_with(
            r#"[{"exercise":"Bench Press","weight":"heavy","sets":3,"reps":10,"duration":null}]"#,
            "bench heavy 3x10",
        )
        .await,
    );
    assert!(matches!(err, ValidationError::WrongType { field: "weight", .. }));
}

#[tokio::test]
async fn zero_sets_discards_batch() {
    let err = assert_rejected(
        parse_with(
            r#"[{"exercise":"Bench Press","weight":135,"sets":0,"reps":10,"duration":null}]"#,
            "bench 135 0x10",
        )
        .await,
    );
    assert!(matches!(err, ValidationError::OutOfRange { field: "sets", .. }));
}

#[tokio::test]
async fn empty_array_is_success() {
    let records = parse_with("[]", "went to the grocery store").await.unwrap();
    assert!(records.is_empty());

    let records = parse_with("```json\n[]\n```", "123 456").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn prose_answer_is_invalid_json() {
    let err = assert_rejected(parse_with("Sure! Here is your workout.", "squat").await);
    assert!(matches!(err, ValidationError::InvalidJson { .. }));
}

#[tokio::test]
async fn gateway_failure_is_not_reclassified() {
    struct Down;

    #[async_trait]
    impl Gateway for Down {
        async fn call(&self, _: &str, _: &str) -> liftnote_agent::Result<String> {
            Err(GatewayError::RequestFailed {
                reason: "connection refused".into(),
            })
        }
    }

    let err = WorkoutParser::new(Arc::new(Down)).parse("squat").await.unwrap_err();
    assert_eq!(err.kind(), "gateway");
    assert!(err.to_string().contains("connection refused"));
}
