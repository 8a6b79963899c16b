//! System prompt for the workout parser.
//!
//! The prompt is assembled once from [`PromptConfig::DEFAULT`] and reused for
//! every request, so the model always sees the same output contract.

use std::fmt::Write as _;
use std::sync::LazyLock;

/// Static inputs to the system prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptConfig {
    /// Gym shorthand and what it expands to.
    pub abbreviations: &'static [(&'static str, &'static str)],
    /// Multiplier applied to kilogram loads.
    pub kg_to_lbs: f64,
    /// Converted loads are rounded to the nearest multiple of this.
    pub round_to_lbs: u32,
    /// Worked examples: raw input and the exact expected output.
    pub examples: &'static [(&'static str, &'static str)],
}

impl PromptConfig {
    /// The configuration the parser ships with.
    pub const DEFAULT: Self = Self {
        abbreviations: ABBREVIATIONS,
        kg_to_lbs: 2.2,
        round_to_lbs: 5,
        examples: EXAMPLES,
    };
}

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("db", "Dumbbell"),
    ("bb", "Barbell"),
    ("kb", "Kettlebell"),
    ("ez", "EZ-Bar"),
    ("inc", "Incline"),
    ("dec", "Decline"),
    ("ohp", "Overhead Press"),
    ("rdl", "Romanian Deadlift"),
    ("dl", "Deadlift"),
    ("sldl", "Stiff-Leg Deadlift"),
    ("cgbp", "Close-Grip Bench Press"),
    ("hammy", "Hamstring"),
    ("lat", "Lat"),
    ("bw", "bodyweight"),
    ("1rm", "one-rep max"),
    ("pr", "personal record"),
];

const EXAMPLES: &[(&str, &str)] = &[
    (
        "db bench 100 2x5",
        r#"[{"exercise": "Dumbbell Bench Press", "weight": 100, "sets": 2, "reps": 5, "duration": null}]"#,
    ),
    (
        "squat 225 3x8\nlat pulldown 120 4x10",
        r#"[{"exercise": "Barbell Back Squat", "weight": 225, "sets": 3, "reps": 8, "duration": null}, {"exercise": "Lat Pulldown", "weight": 120, "sets": 4, "reps": 10, "duration": null}]"#,
    ),
    (
        "pushups 3x20",
        r#"[{"exercise": "Push-ups", "weight": 0, "sets": 3, "reps": 20, "duration": null}]"#,
    ),
    (
        "plank 3x30s",
        r#"[{"exercise": "Plank", "weight": 0, "sets": 3, "reps": null, "duration": 30}]"#,
    ),
    (
        "squat 60kg 5x5",
        r#"[{"exercise": "Barbell Back Squat", "weight": 130, "sets": 5, "reps": 5, "duration": null}]"#,
    ),
    (
        "hit a 315 squat PR",
        r#"[{"exercise": "Barbell Back Squat", "weight": 315, "sets": 1, "reps": 1, "duration": null}]"#,
    ),
    (
        "front squat 315",
        r#"[{"exercise": "Front Squat", "weight": 315, "sets": null, "reps": null, "duration": null}]"#,
    ),
    ("went to the grocery store", "[]"),
];

static SYSTEM_PROMPT: LazyLock<String> =
    LazyLock::new(|| build_system_prompt(&PromptConfig::DEFAULT));

/// The system prompt sent with every parse request.
pub fn system_prompt() -> &'static str {
    &SYSTEM_PROMPT
}

/// Assemble the instruction text for `config`.  Pure: equal configs give
/// equal prompts.
pub fn build_system_prompt(config: &PromptConfig) -> String {
    let mut p = String::with_capacity(4096);

    p.push_str(
        "You are a workout parser. Convert informal workout notes into structured JSON.\n\n\
         INPUT: Free-text workout notes, possibly several exercises separated by newlines or commas.\n\n\
         OUTPUT: A JSON array only. No markdown, no code fences, no explanation, no prose.\n\n",
    );

    p.push_str(
        "Each array element is an object with exactly these keys:\n\
         - \"exercise\": full canonical name (e.g. \"Dumbbell Bench Press\", not \"db bench\")\n\
         - \"weight\": integer pounds, 0 for bodyweight exercises, null if unknown\n\
         - \"sets\": integer >= 1, or null if unknown\n\
         - \"reps\": integer >= 1 per set, or null for timed exercises or if unknown\n\
         - \"duration\": integer seconds >= 1 for timed exercises, otherwise null\n\n",
    );

    p.push_str("ABBREVIATIONS:\n");
    for (short, long) in config.abbreviations {
        let _ = writeln!(p, "- {short} = {long}");
    }
    p.push('\n');

    let _ = write!(
        p,
        "RULES:\n\
         - Assume pounds unless a unit is given. Convert kilograms with lbs = kg x {factor}, \
         then round to the nearest {step} lbs.\n\
         - \"AxB\" means A sets of B reps. If the order is ambiguous, keep the first number as sets.\n\
         - \"N sets\" without reps: sets = N, reps = null.\n\
         - \"for N\" or \"N reps of\" without sets: sets = 1, reps = N.\n\
         - PR, max, 1rm, one rep max: sets = 1, reps = 1.\n\
         - Times like \"30s\", \"60 sec\" or \"1 min\" go in duration as seconds; reps = null.\n\
         - Plates: one plate per side is 135 lbs, two plates 225, three plates 315.\n\
         - Bodyweight movements (push-ups, pull-ups, dips, planks) without added load: weight = 0.\n\
         - \"+N\" or \"weighted ... N\" on a bodyweight movement: weight = N.\n\
         - Ignore chatter that is not an exercise. Text with no recognizable exercise yields [].\n\
         - Numbers with no exercise name yield [].\n\
         - Keep exercises in the order they appear. Do not merge or deduplicate.\n\n",
        factor = config.kg_to_lbs,
        step = config.round_to_lbs,
    );

    p.push_str("EXAMPLES:\n\n");
    for (input, output) in config.examples {
        let _ = writeln!(p, "Input: \"{input}\"\nOutput: {output}\n");
    }

    p.push_str("Return ONLY the JSON array. No other text.");
    p
}
