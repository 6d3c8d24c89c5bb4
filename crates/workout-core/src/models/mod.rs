// ABOUTME: Data models for structured workouts and the reference exercise library
// ABOUTME: Re-exports the workout record types and the read-only ReferenceExercise input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Models
//!
//! - [`WorkoutRecord`]: one normalized training session
//! - [`ExerciseRecord`] / [`ExerciseKind`]: a trainable unit, tagged by modality
//! - [`ReferenceExercise`]: an entry of the external exercise dataset

mod library;
mod serde_helpers;
mod workout;

pub use library::ReferenceExercise;
pub use serde_helpers::{opt_string_or_number, string_or_number, whole_number};
pub use workout::{
    AmrapBlock, AmrapMovement, EmomBlock, EmomInterval, ExerciseKind, ExerciseRecord,
    ExerciseType, ForTimeBlock, Segment, StrengthPrescription, WorkoutRecord,
};
