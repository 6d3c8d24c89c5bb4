// ABOUTME: Structured workout record produced by the formatting pipeline
// ABOUTME: Tagged exercise union over strength, for-time, EMOM, and AMRAP modalities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Records
//!
//! A [`WorkoutRecord`] is built once per import and never mutated afterwards.
//! Each [`ExerciseRecord`] carries exactly one [`ExerciseKind`] field group,
//! selected by its `type` discriminant, so a strength exercise can never hold
//! segments and a for-time block can never hold a weight.
//!
//! The JSON shape is the flat camelCase object the rest of the application
//! consumes: the variant fields sit next to the common ones, and non-strength
//! exercises always serialize `sets: 0` and `reps: ""`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::serde_helpers::{opt_string_or_number, string_or_number, whole_number};
use crate::constants::{exercise_types, pipeline};

/// Discriminant of an exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseType {
    /// Resistance work with sets and reps
    Strength,
    /// Continuous-duration work split into segments
    ForTime,
    /// Interval rotation performed once per fixed interval
    Emom,
    /// Round-based work under a time cap
    Amrap,
}

impl ExerciseType {
    /// Wire literal for this type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => exercise_types::STRENGTH,
            Self::ForTime => exercise_types::FOR_TIME,
            Self::Emom => exercise_types::EMOM,
            Self::Amrap => exercise_types::AMRAP,
        }
    }

    /// Parse an exact wire literal
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            exercise_types::STRENGTH => Some(Self::Strength),
            exercise_types::FOR_TIME => Some(Self::ForTime),
            exercise_types::EMOM => Some(Self::Emom),
            exercise_types::AMRAP => Some(Self::Amrap),
            _ => None,
        }
    }

    /// Fields that belong to this variant's group
    #[must_use]
    pub const fn variant_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Strength => &["sets", "reps", "weight"],
            Self::ForTime => &["segments"],
            Self::Emom => &["emomIntervalSeconds", "emomTotalMinutes", "emomIntervals"],
            Self::Amrap => &["amrapDurationMinutes", "amrapExercises"],
        }
    }

    /// Fields that must be present for this variant
    #[must_use]
    pub const fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Strength => &["sets", "reps"],
            Self::ForTime => &["segments"],
            Self::Emom => &["emomTotalMinutes", "emomIntervals"],
            Self::Amrap => &["amrapDurationMinutes", "amrapExercises"],
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully structured training session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    /// Session name, never empty
    pub name: String,
    /// Free-text goal, empty when unknown
    pub goal: String,
    /// Free-text coaching notes, empty when unknown
    pub coach_notes: String,
    /// Human-readable duration, `"Unknown"` when the model gave none
    pub estimated_time: String,
    /// Exercises in session order
    pub exercises: Vec<ExerciseRecord>,
}

/// One trainable unit within a session
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRecord {
    /// Sequential identifier, unique within the workout
    pub id: String,
    /// Exercise name, ideally a reference library name or alias
    pub name: String,
    /// Free-text notes
    pub notes: String,
    /// Rest between sets for strength, 0 for continuous-effort types
    pub rest_seconds: u32,
    /// Required equipment
    pub equipment: Vec<String>,
    /// Targeted muscle groups
    pub muscle_groups: Vec<String>,
    /// Video reference, populated downstream
    pub video_id: String,
    /// Session progress flag owned by the UI, always `false` here
    pub completed: bool,
    /// Variant-specific field group
    pub kind: ExerciseKind,
}

impl ExerciseRecord {
    /// Discriminant of this exercise
    #[must_use]
    pub const fn exercise_type(&self) -> ExerciseType {
        self.kind.exercise_type()
    }

    /// Set count; 0 for every non-strength variant
    #[must_use]
    pub const fn sets(&self) -> u32 {
        match &self.kind {
            ExerciseKind::Strength(strength) => strength.sets,
            _ => 0,
        }
    }

    /// Rep prescription; empty for every non-strength variant
    #[must_use]
    pub fn reps(&self) -> &str {
        match &self.kind {
            ExerciseKind::Strength(strength) => &strength.reps,
            _ => "",
        }
    }

    /// Load prescription, strength only
    #[must_use]
    pub fn weight(&self) -> Option<&str> {
        match &self.kind {
            ExerciseKind::Strength(strength) => strength.weight.as_deref(),
            _ => None,
        }
    }
}

impl Serialize for ExerciseRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("type", &self.exercise_type())?;
        map.serialize_entry("sets", &self.sets())?;
        map.serialize_entry("reps", self.reps())?;
        if let Some(weight) = self.weight() {
            map.serialize_entry("weight", weight)?;
        }
        map.serialize_entry("notes", &self.notes)?;
        map.serialize_entry("restSeconds", &self.rest_seconds)?;
        map.serialize_entry("equipment", &self.equipment)?;
        map.serialize_entry("muscleGroups", &self.muscle_groups)?;
        map.serialize_entry("videoId", &self.video_id)?;
        map.serialize_entry("completed", &self.completed)?;
        match &self.kind {
            ExerciseKind::Strength(_) => {}
            ExerciseKind::ForTime(block) => {
                map.serialize_entry("segments", &block.segments)?;
            }
            ExerciseKind::Emom(block) => {
                map.serialize_entry("emomIntervalSeconds", &block.emom_interval_seconds)?;
                map.serialize_entry("emomTotalMinutes", &block.emom_total_minutes)?;
                map.serialize_entry("emomIntervals", &block.emom_intervals)?;
            }
            ExerciseKind::Amrap(block) => {
                map.serialize_entry("amrapDurationMinutes", &block.amrap_duration_minutes)?;
                map.serialize_entry("amrapExercises", &block.amrap_exercises)?;
            }
        }
        map.end()
    }
}

/// Variant-specific field group of an exercise
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseKind {
    /// `strength`
    Strength(StrengthPrescription),
    /// `for-time`
    ForTime(ForTimeBlock),
    /// `emom`
    Emom(EmomBlock),
    /// `amrap`
    Amrap(AmrapBlock),
}

impl ExerciseKind {
    /// Discriminant for this field group
    #[must_use]
    pub const fn exercise_type(&self) -> ExerciseType {
        match self {
            Self::Strength(_) => ExerciseType::Strength,
            Self::ForTime(_) => ExerciseType::ForTime,
            Self::Emom(_) => ExerciseType::Emom,
            Self::Amrap(_) => ExerciseType::Amrap,
        }
    }
}

/// Sets, reps, and load for resistance work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StrengthPrescription {
    /// Number of working sets, 0 for timed holds written without sets
    #[serde(deserialize_with = "whole_number")]
    pub sets: u32,
    /// Single count (`"10"`) or range (`"6-8"`)
    #[serde(deserialize_with = "string_or_number")]
    pub reps: String,
    /// Free-form load with units, e.g. `"80kg"`
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<String>,
}

/// Ordered continuous-effort segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ForTimeBlock {
    /// Segments in the order they are performed
    pub segments: Vec<Segment>,
}

impl ForTimeBlock {
    /// Sum of all segment durations, in minutes
    #[must_use]
    pub fn total_minutes(&self) -> f64 {
        self.segments.iter().map(|segment| segment.duration_minutes).sum()
    }
}

/// One continuous-effort piece of a for-time block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Segment {
    /// Movement or machine name
    pub name: String,
    /// Duration in minutes, strictly positive
    pub duration_minutes: f64,
    /// Intensity label, e.g. `"Zone 2"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Video reference, populated downstream
    #[serde(default)]
    pub video_id: String,
}

/// Interval rotation performed once per interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmomBlock {
    /// Interval cadence: 60 for EMOM, 120 for E2MOM
    #[serde(
        default = "default_emom_interval_seconds",
        deserialize_with = "whole_number"
    )]
    pub emom_interval_seconds: u32,
    /// Total duration in minutes
    #[serde(deserialize_with = "whole_number")]
    pub emom_total_minutes: u32,
    /// Movements in rotation order
    pub emom_intervals: Vec<EmomInterval>,
}

const fn default_emom_interval_seconds() -> u32 {
    pipeline::DEFAULT_EMOM_INTERVAL_SECONDS
}

/// One movement of an EMOM rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmomInterval {
    /// Movement name
    pub name: String,
    /// Work per interval, e.g. `"40m"` or `"12"`
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub reps: Option<String>,
    /// Load with units
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<String>,
    /// Coaching cue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Video reference, populated downstream
    #[serde(default)]
    pub video_id: String,
}

/// One round of a time-capped AMRAP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AmrapBlock {
    /// Time cap in minutes
    #[serde(deserialize_with = "whole_number")]
    pub amrap_duration_minutes: u32,
    /// Movements of one round, in order
    pub amrap_exercises: Vec<AmrapMovement>,
}

/// One movement of an AMRAP round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AmrapMovement {
    /// Movement name
    pub name: String,
    /// Reps per round
    #[serde(deserialize_with = "string_or_number")]
    pub reps: String,
    /// Load with units
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<String>,
    /// Coaching cue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Video reference, populated downstream
    #[serde(default)]
    pub video_id: String,
}
