//! Validator: sanitized model text in, typed records out.
//!
//! Validation is all-or-nothing.  The first violation rejects the whole
//! response; no element that happened to validate is kept.

use serde_json::{Map, Number, Value};

use crate::error::ValidationError;
use crate::record::ExerciseRecord;

/// Largest float that still represents every integer exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Parse `text` as a JSON array of exercise records.
///
/// A valid empty array yields an empty list.  Element order is preserved.
/// Optional keys that are absent are treated as `null`; unknown keys are
/// ignored.
pub fn validate(text: &str) -> Result<Vec<ExerciseRecord>, ValidationError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ValidationError::InvalidJson {
        reason: e.to_string(),
    })?;

    let Value::Array(items) = value else {
        return Err(ValidationError::NotAnArray {
            found: json_type(&value),
        });
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_record(index, item))
        .collect()
}

fn validate_record(index: usize, item: &Value) -> Result<ExerciseRecord, ValidationError> {
    let Value::Object(obj) = item else {
        return Err(ValidationError::NotAnObject {
            index,
            found: json_type(item),
        });
    };

    Ok(ExerciseRecord {
        exercise: exercise_name(index, obj)?,
        weight: integer_field(index, obj, "weight", 0)?,
        sets: integer_field(index, obj, "sets", 1)?,
        reps: integer_field(index, obj, "reps", 1)?,
        duration: integer_field(index, obj, "duration", 1)?,
    })
}

fn exercise_name(index: usize, obj: &Map<String, Value>) -> Result<String, ValidationError> {
    const FIELD: &str = "exercise";

    match obj.get(FIELD) {
        None | Some(Value::Null) => Err(ValidationError::MissingField {
            index,
            field: FIELD,
        }),
        Some(Value::String(name)) if name.trim().is_empty() => Err(ValidationError::Blank {
            index,
            field: FIELD,
        }),
        Some(Value::String(name)) => Ok(name.clone()),
        Some(other) => Err(ValidationError::WrongType {
            index,
            field: FIELD,
            expected: "a string",
            found: json_type(other).to_owned(),
        }),
    }
}

/// Read an optional non-negative integer field with a lower bound.
///
/// Whole-valued floats such as `135.0` are accepted as integers.
fn integer_field(
    index: usize,
    obj: &Map<String, Value>,
    field: &'static str,
    min: i64,
) -> Result<Option<u32>, ValidationError> {
    let n = match obj.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n,
        Some(other) => {
            return Err(ValidationError::WrongType {
                index,
                field,
                expected: "an integer or null",
                found: json_type(other).to_owned(),
            });
        }
    };

    let value = as_integer(n).ok_or_else(|| ValidationError::WrongType {
        index,
        field,
        expected: "an integer or null",
        found: format!("the number {n}"),
    })?;

    if value < min {
        return Err(ValidationError::OutOfRange {
            index,
            field,
            constraint: if min == 0 { "must be >= 0" } else { "must be >= 1" },
            value: n.to_string(),
        });
    }

    u32::try_from(value)
        .map(Some)
        .map_err(|_| ValidationError::OutOfRange {
            index,
            field,
            constraint: "must fit in 32 bits",
            value: n.to_string(),
        })
}

/// Interpret a JSON number as an integer, if it is one.
fn as_integer(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.as_u64().is_some() {
        // Larger than i64::MAX; certainly out of range, report it as such.
        return Some(i64::MAX);
    }
    let f = n.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER).then_some(f as i64)
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
