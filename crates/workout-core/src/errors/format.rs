// ABOUTME: Error taxonomy for the workout formatting pipeline
// ABOUTME: Input, provider, extraction, and schema validation failures with AppError conversion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Format Error Types
//!
//! Every stage of the pipeline fails with a `FormatError`. The messages are
//! meant for direct display; validation variants always name the offending
//! exercise index so the user can find the line that confused the model.

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Failures raised while turning raw workout text into a `WorkoutRecord`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Raw text was missing or blank
    #[error("Missing rawText")]
    EmptyInput,

    /// Raw text exceeded the configured cap
    #[error("Workout text is too long: {length} characters (maximum {max})")]
    InputTooLarge {
        /// Length of the submitted text, in characters
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// The reference library was not array-shaped at the outer boundary
    #[error("Invalid exerciseLibrary - must be an array")]
    InvalidLibrary,

    /// The completion provider failed
    #[error("completion provider error: {message}")]
    Provider {
        /// Code reported by the provider layer
        code: ErrorCode,
        /// Underlying provider message
        message: String,
    },

    /// The model output was not parseable JSON after fence stripping
    #[error("Model output is not valid JSON: {0}")]
    Extraction(String),

    /// Top-level `name` missing, empty, or not a string
    #[error("Invalid workout: missing or invalid 'name'")]
    MissingWorkoutName,

    /// Top-level `exercises` missing or not an array
    #[error("Invalid workout: missing or invalid 'exercises' array")]
    InvalidExercises,

    /// A top-level optional field had the wrong type
    #[error("Invalid workout: '{field}' must be a string")]
    InvalidWorkoutField {
        /// Offending field
        field: String,
    },

    /// An exercise lacks `name` or `type`
    #[error("Invalid exercise at index {index}: missing {field}")]
    MissingExerciseField {
        /// Position in the `exercises` array
        index: usize,
        /// Missing field
        field: String,
    },

    /// An exercise `type` is not one of the four accepted literals
    #[error("Invalid exercise type at index {index}: '{value}' must be 'strength', 'for-time', 'emom', or 'amrap'")]
    InvalidExerciseType {
        /// Position in the `exercises` array
        index: usize,
        /// Rejected value
        value: String,
    },

    /// An exercise carries a field that belongs to another variant or to no variant
    #[error("Invalid exercise at index {index}: field '{field}' is not allowed on a '{exercise_type}' exercise")]
    ForeignField {
        /// Position in the `exercises` array
        index: usize,
        /// Variant named by `type`
        exercise_type: String,
        /// Rejected field
        field: String,
    },

    /// A variant-specific required field is absent
    #[error("Invalid exercise at index {index}: '{exercise_type}' exercise requires '{field}'")]
    MissingVariantField {
        /// Position in the `exercises` array
        index: usize,
        /// Variant named by `type`
        exercise_type: String,
        /// Required field
        field: String,
    },

    /// A field is present but has the wrong shape or an out-of-range value
    #[error("Invalid exercise at index {index}: {reason}")]
    InvalidExerciseField {
        /// Position in the `exercises` array
        index: usize,
        /// What was wrong
        reason: String,
    },
}

impl FormatError {
    /// Error code used when this failure crosses into `AppError`
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyInput | Self::InvalidLibrary => ErrorCode::InvalidInput,
            Self::InputTooLarge { .. } => ErrorCode::ValueOutOfRange,
            Self::Provider { code, .. } => *code,
            Self::Extraction(_)
            | Self::MissingWorkoutName
            | Self::InvalidExercises
            | Self::InvalidWorkoutField { .. }
            | Self::MissingExerciseField { .. }
            | Self::InvalidExerciseType { .. }
            | Self::ForeignField { .. }
            | Self::MissingVariantField { .. }
            | Self::InvalidExerciseField { .. } => ErrorCode::InvalidModelOutput,
        }
    }

    /// Index of the offending exercise, for validation failures scoped to one exercise
    #[must_use]
    pub const fn exercise_index(&self) -> Option<usize> {
        match self {
            Self::MissingExerciseField { index, .. }
            | Self::InvalidExerciseType { index, .. }
            | Self::ForeignField { index, .. }
            | Self::MissingVariantField { index, .. }
            | Self::InvalidExerciseField { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Wrap a provider failure, keeping its code
    #[must_use]
    pub fn provider(error: &AppError) -> Self {
        Self::Provider {
            code: error.code,
            message: error.message.clone(),
        }
    }
}

impl From<FormatError> for AppError {
    fn from(error: FormatError) -> Self {
        let code = error.code();
        let app_error = Self::new(code, error.to_string());
        match error.exercise_index() {
            Some(index) => app_error.with_details(serde_json::json!({ "exerciseIndex": index })),
            None => app_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_index() {
        let error = FormatError::MissingExerciseField {
            index: 2,
            field: "type".to_owned(),
        };
        assert_eq!(error.to_string(), "Invalid exercise at index 2: missing type");
        assert_eq!(error.exercise_index(), Some(2));
    }

    #[test]
    fn test_provider_error_keeps_code_and_prefix() {
        let source = AppError::new(ErrorCode::ExternalAuthFailed, "bad key");
        let error = FormatError::provider(&source);
        let app_error = AppError::from(error);

        assert_eq!(app_error.code, ErrorCode::ExternalAuthFailed);
        assert_eq!(app_error.message, "completion provider error: bad key");
    }

    #[test]
    fn test_input_errors_map_to_bad_request() {
        assert_eq!(AppError::from(FormatError::EmptyInput).http_status(), 400);
        assert_eq!(AppError::from(FormatError::InvalidLibrary).http_status(), 400);
        assert_eq!(
            AppError::from(FormatError::Extraction("eof".to_owned())).http_status(),
            502
        );
    }

    #[test]
    fn test_invalid_type_details_carry_index() {
        let app_error = AppError::from(FormatError::InvalidExerciseType {
            index: 1,
            value: "hiit".to_owned(),
        });
        assert_eq!(app_error.details, Some(serde_json::json!({ "exerciseIndex": 1 })));
        assert!(app_error.message.contains("'hiit'"));
    }
}
