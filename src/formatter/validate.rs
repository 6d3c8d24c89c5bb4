// ABOUTME: Schema validation and normalization of parsed model output
// ABOUTME: Tagged-variant exercise parsing, default filling, and ID normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Validation
//!
//! Model output is untrusted. [`validate_workout`] turns an arbitrary JSON
//! value into a [`WorkoutRecord`] or fails with a [`FormatError`] that names
//! the offending exercise index.
//!
//! Each exercise is parsed as a tagged variant selected by its `type`:
//! only the common fields and the fields of that variant are accepted, and the
//! variant's required fields must be present. `null` is treated as absent
//! everywhere. Unknown top-level keys are dropped.
//!
//! Validating the JSON serialization of a validated record yields an equal
//! record.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use workout_core::constants::pipeline::UNKNOWN_ESTIMATED_TIME;
use workout_core::errors::FormatError;
use workout_core::models::{
    opt_string_or_number, whole_number, AmrapBlock, EmomBlock, ExerciseKind, ExerciseRecord,
    ExerciseType, ForTimeBlock, StrengthPrescription, WorkoutRecord,
};

/// Keys shared by every exercise variant
const COMMON_EXERCISE_FIELDS: [&str; 9] = [
    "id",
    "name",
    "type",
    "notes",
    "restSeconds",
    "equipment",
    "muscleGroups",
    "videoId",
    "completed",
];

/// Strength keys that other variants may carry as neutral placeholders
const NEUTRAL_STRENGTH_FIELDS: [&str; 2] = ["sets", "reps"];

/// Common exercise fields after `name`, `type`, and `completed` are taken out
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CommonFields {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    #[serde(default)]
    notes: String,
    #[serde(default, deserialize_with = "whole_number")]
    rest_seconds: u32,
    #[serde(default)]
    equipment: Vec<String>,
    #[serde(default)]
    muscle_groups: Vec<String>,
    #[serde(default)]
    video_id: String,
}

/// Validate and normalize a parsed model response
///
/// # Errors
///
/// Returns a [`FormatError`] describing the first schema violation found.
pub fn validate_workout(mut value: Value) -> Result<WorkoutRecord, FormatError> {
    strip_nulls(&mut value);

    let Value::Object(mut workout) = value else {
        return Err(FormatError::MissingWorkoutName);
    };

    let name = match workout.remove("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => return Err(FormatError::MissingWorkoutName),
    };

    let Some(Value::Array(raw_exercises)) = workout.remove("exercises") else {
        return Err(FormatError::InvalidExercises);
    };

    let goal = optional_text(&mut workout, "goal")?.unwrap_or_default();
    let coach_notes = optional_text(&mut workout, "coachNotes")?.unwrap_or_default();
    let estimated_time = optional_text(&mut workout, "estimatedTime")?
        .filter(|time| !time.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ESTIMATED_TIME.to_owned());

    for key in workout.keys() {
        debug!(field = %key, "Dropping unknown top-level workout field");
    }

    let mut exercises = raw_exercises
        .into_iter()
        .enumerate()
        .map(|(index, raw)| validate_exercise(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    normalize_ids(&mut exercises);

    Ok(WorkoutRecord {
        name,
        goal,
        coach_notes,
        estimated_time,
        exercises,
    })
}

/// Validate one element of the `exercises` array
fn validate_exercise(index: usize, raw: Value) -> Result<ExerciseRecord, FormatError> {
    let Value::Object(mut fields) = raw else {
        return Err(FormatError::InvalidExerciseField {
            index,
            reason: "exercise must be a JSON object".to_owned(),
        });
    };

    let name = match fields.remove("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => return Err(missing_field(index, "name")),
    };

    let exercise_type = match fields.remove("type") {
        None => return Err(missing_field(index, "type")),
        Some(Value::String(literal)) if literal.trim().is_empty() => {
            return Err(missing_field(index, "type"))
        }
        Some(Value::String(literal)) => {
            ExerciseType::parse(&literal).ok_or(FormatError::InvalidExerciseType {
                index,
                value: literal,
            })?
        }
        Some(other) => {
            return Err(FormatError::InvalidExerciseType {
                index,
                value: other.to_string(),
            })
        }
    };

    // `completed` is owned by the session UI and always reset
    fields.remove("completed");

    let (common, variant) = partition_fields(index, exercise_type, fields)?;

    for required in exercise_type.required_fields() {
        if !variant.contains_key(*required) {
            return Err(FormatError::MissingVariantField {
                index,
                exercise_type: exercise_type.as_str().to_owned(),
                field: (*required).to_owned(),
            });
        }
    }

    let common: CommonFields = parse_fields(index, "common", common)?;
    let kind = parse_kind(index, exercise_type, variant)?;
    check_kind(index, &kind)?;

    Ok(ExerciseRecord {
        id: common.id.unwrap_or_default(),
        name,
        notes: common.notes,
        rest_seconds: common.rest_seconds,
        equipment: common.equipment,
        muscle_groups: common.muscle_groups,
        video_id: common.video_id,
        completed: false,
        kind,
    })
}

/// Split exercise keys into common and variant groups, rejecting foreign keys
fn partition_fields(
    index: usize,
    exercise_type: ExerciseType,
    fields: Map<String, Value>,
) -> Result<(Map<String, Value>, Map<String, Value>), FormatError> {
    let own_fields = exercise_type.variant_fields();
    let mut common = Map::new();
    let mut variant = Map::new();

    for (key, value) in fields {
        if own_fields.contains(&key.as_str()) {
            variant.insert(key, value);
        } else if COMMON_EXERCISE_FIELDS.contains(&key.as_str()) {
            common.insert(key, value);
        } else if NEUTRAL_STRENGTH_FIELDS.contains(&key.as_str()) {
            // Non-strength variants serialize sets = 0 and reps = ""
            continue;
        } else {
            return Err(FormatError::ForeignField {
                index,
                exercise_type: exercise_type.as_str().to_owned(),
                field: key,
            });
        }
    }

    Ok((common, variant))
}

/// Deserialize the variant group selected by `exercise_type`
fn parse_kind(
    index: usize,
    exercise_type: ExerciseType,
    variant: Map<String, Value>,
) -> Result<ExerciseKind, FormatError> {
    let label = exercise_type.as_str();
    Ok(match exercise_type {
        ExerciseType::Strength => {
            ExerciseKind::Strength(parse_fields::<StrengthPrescription>(index, label, variant)?)
        }
        ExerciseType::ForTime => {
            ExerciseKind::ForTime(parse_fields::<ForTimeBlock>(index, label, variant)?)
        }
        ExerciseType::Emom => ExerciseKind::Emom(parse_fields::<EmomBlock>(index, label, variant)?),
        ExerciseType::Amrap => {
            ExerciseKind::Amrap(parse_fields::<AmrapBlock>(index, label, variant)?)
        }
    })
}

fn parse_fields<T: DeserializeOwned>(
    index: usize,
    group: &str,
    fields: Map<String, Value>,
) -> Result<T, FormatError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| FormatError::InvalidExerciseField {
        index,
        reason: format!("invalid {group} fields: {e}"),
    })
}

/// Range and emptiness checks serde cannot express
fn check_kind(index: usize, kind: &ExerciseKind) -> Result<(), FormatError> {
    let invalid = |reason: &str| {
        Err(FormatError::InvalidExerciseField {
            index,
            reason: reason.to_owned(),
        })
    };

    match kind {
        // Presence is enforced by `required_fields`; a timed hold may carry sets = 0
        ExerciseKind::Strength(_) => {}
        ExerciseKind::ForTime(block) => {
            if block.segments.is_empty() {
                return invalid("'segments' must not be empty");
            }
            for segment in &block.segments {
                if segment.name.trim().is_empty() {
                    return invalid("segment 'name' must not be empty");
                }
                if !segment.duration_minutes.is_finite() || segment.duration_minutes <= 0.0 {
                    return invalid("segment 'durationMinutes' must be greater than 0");
                }
            }
        }
        ExerciseKind::Emom(block) => {
            if block.emom_interval_seconds == 0 {
                return invalid("'emomIntervalSeconds' must be greater than 0");
            }
            if block.emom_total_minutes == 0 {
                return invalid("'emomTotalMinutes' must be greater than 0");
            }
            if block.emom_intervals.is_empty() {
                return invalid("'emomIntervals' must not be empty");
            }
            if block.emom_intervals.iter().any(|i| i.name.trim().is_empty()) {
                return invalid("interval 'name' must not be empty");
            }
        }
        ExerciseKind::Amrap(block) => {
            if block.amrap_duration_minutes == 0 {
                return invalid("'amrapDurationMinutes' must be greater than 0");
            }
            if block.amrap_exercises.is_empty() {
                return invalid("'amrapExercises' must not be empty");
            }
            if block.amrap_exercises.iter().any(|m| m.name.trim().is_empty()) {
                return invalid("movement 'name' must not be empty");
            }
        }
    }
    Ok(())
}

/// Keep model IDs when they are all present and unique, else renumber from "1"
fn normalize_ids(exercises: &mut [ExerciseRecord]) {
    let mut seen = HashSet::with_capacity(exercises.len());
    let usable = exercises
        .iter()
        .all(|exercise| !exercise.id.trim().is_empty() && seen.insert(exercise.id.as_str()));

    if usable {
        return;
    }

    debug!(
        count = exercises.len(),
        "Exercise IDs missing or duplicated, renumbering"
    );
    for (position, exercise) in exercises.iter_mut().enumerate() {
        exercise.id = (position + 1).to_string();
    }
}

/// Take an optional top-level text field
fn optional_text(
    workout: &mut Map<String, Value>,
    field: &str,
) -> Result<Option<String>, FormatError> {
    match workout.remove(field) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) if field == "estimatedTime" => Ok(Some(number.to_string())),
        Some(_) => Err(FormatError::InvalidWorkoutField {
            field: field.to_owned(),
        }),
    }
}

/// Remove `null` object members at every depth
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, member| !member.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

fn missing_field(index: usize, field: &str) -> FormatError {
    FormatError::MissingExerciseField {
        index,
        field: field.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_top_level_fields() {
        let record = validate_workout(json!({
            "name": "Leg Day",
            "date": "2025-01-01",
            "exercises": []
        }))
        .unwrap();
        assert_eq!(record.name, "Leg Day");
        assert!(record.exercises.is_empty());
    }

    #[test]
    fn test_nulls_are_absent() {
        let record = validate_workout(json!({
            "name": "Row",
            "goal": null,
            "estimatedTime": null,
            "exercises": [{
                "name": "Row",
                "type": "for-time",
                "weight": null,
                "segments": [{"name": "Row", "durationMinutes": 20, "zone": null}]
            }]
        }))
        .unwrap();
        assert_eq!(record.goal, "");
        assert_eq!(record.estimated_time, "Unknown");
        assert_eq!(record.exercises[0].exercise_type(), ExerciseType::ForTime);
    }

    #[test]
    fn test_numeric_estimated_time_stringified() {
        let record = validate_workout(json!({
            "name": "Quick",
            "estimatedTime": 30,
            "exercises": []
        }))
        .unwrap();
        assert_eq!(record.estimated_time, "30");
    }

    #[test]
    fn test_ids_renumbered_when_duplicated() {
        let strength = |id: &str| {
            json!({"id": id, "name": "Curl", "type": "strength", "sets": 3, "reps": "12"})
        };
        let record = validate_workout(json!({
            "name": "Arms",
            "exercises": [strength("a"), strength("a"), strength("c")]
        }))
        .unwrap();
        let ids: Vec<_> = record.exercises.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_unique_ids_kept() {
        let record = validate_workout(json!({
            "name": "Arms",
            "exercises": [
                {"id": 7, "name": "Curl", "type": "strength", "sets": 3, "reps": 12},
                {"id": "x", "name": "Dip", "type": "strength", "sets": 3, "reps": "8-10"}
            ]
        }))
        .unwrap();
        assert_eq!(record.exercises[0].id, "7");
        assert_eq!(record.exercises[0].reps(), "12");
        assert_eq!(record.exercises[1].id, "x");
    }
}
