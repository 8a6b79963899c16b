//! The structured form of one parsed exercise.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One validated exercise entry.
///
/// Field ranges (`weight >= 0`, everything else `>= 1`) are enforced by
/// [`validate`](crate::validate::validate); `reps` and `duration` may both
/// be set or both be unset.  Serialization always writes every key, with
/// `null` for unknown values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Canonical exercise name, e.g. `"Barbell Bench Press"`.
    pub exercise: String,
    /// Load in pounds; `0` for bodyweight movements.
    pub weight: Option<u32>,
    /// Number of sets.
    pub sets: Option<u32>,
    /// Repetitions per set.
    pub reps: Option<u32>,
    /// Hold or carry time in seconds.
    pub duration: Option<u32>,
}

impl ExerciseRecord {
    /// A record with only the exercise name known.
    pub fn new(exercise: impl Into<String>) -> Self {
        Self {
            exercise: exercise.into(),
            weight: None,
            sets: None,
            reps: None,
            duration: None,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_sets(mut self, sets: u32) -> Self {
        self.sets = Some(sets);
        self
    }

    pub fn with_reps(mut self, reps: u32) -> Self {
        self.reps = Some(reps);
        self
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Renders `"Barbell Bench Press - 135 lbs - 3x10"`, `"Plank - 0 lbs - 3 sets - 30s"`.
impl fmt::Display for ExerciseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exercise)?;
        if let Some(weight) = self.weight {
            write!(f, " - {weight} lbs")?;
        }
        match (self.sets, self.reps) {
            (Some(sets), Some(reps)) => write!(f, " - {sets}x{reps}")?,
            (Some(sets), None) => write!(f, " - {sets} sets")?,
            (None, Some(reps)) => write!(f, " - {reps} reps")?,
            (None, None) => {}
        }
        if let Some(duration) = self.duration {
            write!(f, " - {duration}s")?;
        }
        Ok(())
    }
}

/// One-line summary of a record list, records joined by `", "`.
pub fn format_records(records: &[ExerciseRecord]) -> String {
    records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
