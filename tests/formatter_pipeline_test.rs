// ABOUTME: End-to-end tests for the workout formatting pipeline against a scripted provider
// ABOUTME: Covers the four exercise modalities, malformed output, and provider failure handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    sample_library, scripted_formatter, synthetic_library, ScriptedProvider, AMRAP_OUTPUT,
    EMOM_OUTPUT, FOR_TIME_OUTPUT, STRENGTH_OUTPUT,
};
use serde_json::json;
use workout_formatter::errors::{AppError, ErrorCode, FormatError};
use workout_formatter::library::ExerciseLibrary;
use workout_formatter::llm::MessageRole;
use workout_formatter::models::{ExerciseKind, ExerciseType};

#[tokio::test]
async fn test_strength_scenario() {
    let (formatter, provider) = scripted_formatter(ScriptedProvider::replying(STRENGTH_OUTPUT));

    let record = formatter
        .format("Bench Press 4x6-8 @ 80kg, rest 3min", &sample_library())
        .await
        .unwrap();

    assert_eq!(record.exercises.len(), 1);
    let bench = &record.exercises[0];
    assert_eq!(bench.exercise_type(), ExerciseType::Strength);
    assert_eq!(bench.sets(), 4);
    assert_eq!(bench.reps(), "6-8");
    assert_eq!(bench.weight(), Some("80kg"));
    assert!((120..=180).contains(&bench.rest_seconds));
    assert!(!bench.completed);
    assert_eq!(bench.video_id, "");
    assert_eq!(record.coach_notes, "");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_for_time_scenario() {
    let (formatter, _) = scripted_formatter(ScriptedProvider::replying(FOR_TIME_OUTPUT));

    let record = formatter
        .format("20min ski erg Z2\n10min bike Z2", &sample_library())
        .await
        .unwrap();

    assert_eq!(record.exercises.len(), 1);
    let cardio = &record.exercises[0];
    assert_eq!(cardio.sets(), 0);
    assert_eq!(cardio.reps(), "");
    let ExerciseKind::ForTime(block) = &cardio.kind else {
        panic!("expected a for-time exercise, got {:?}", cardio.kind);
    };
    let durations: Vec<f64> = block.segments.iter().map(|s| s.duration_minutes).collect();
    assert_eq!(durations, [20.0, 10.0]);
    assert_eq!(record.estimated_time, "Unknown");

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["exercises"][0]["sets"], 0);
    assert_eq!(json["exercises"][0]["reps"], "");
}

#[tokio::test]
async fn test_emom_scenario() {
    let (formatter, _) = scripted_formatter(ScriptedProvider::replying(EMOM_OUTPUT));

    let record = formatter
        .format(
            "E2MOM 10 min: Min1 Sled Push 40m @90kg, Min2 Sled Pull 40m @70kg",
            &sample_library(),
        )
        .await
        .unwrap();

    let ExerciseKind::Emom(block) = &record.exercises[0].kind else {
        panic!("expected an emom exercise");
    };
    assert_eq!(block.emom_interval_seconds, 120);
    assert_eq!(block.emom_total_minutes, 10);
    assert_eq!(block.emom_intervals.len(), 2);
    assert_eq!(block.emom_intervals[1].weight.as_deref(), Some("70kg"));
}

#[tokio::test]
async fn test_amrap_scenario() {
    let (formatter, _) = scripted_formatter(ScriptedProvider::replying(AMRAP_OUTPUT));

    let record = formatter
        .format(
            "15 min AMRAP: 10 pull-ups, 15 KB swings @24kg, 20 box jumps 24in",
            &sample_library(),
        )
        .await
        .unwrap();

    let ExerciseKind::Amrap(block) = &record.exercises[0].kind else {
        panic!("expected an amrap exercise");
    };
    assert_eq!(block.amrap_duration_minutes, 15);
    assert_eq!(block.amrap_exercises.len(), 3);
    assert_eq!(block.amrap_exercises[0].reps, "10");
}

#[tokio::test]
async fn test_truncated_output_is_extraction_error() {
    let truncated = &STRENGTH_OUTPUT[..STRENGTH_OUTPUT.len() / 2];
    let (formatter, _) = scripted_formatter(ScriptedProvider::replying(truncated));

    let error = formatter
        .format("Bench Press 4x6-8 @ 80kg", &sample_library())
        .await
        .unwrap_err();

    assert!(matches!(error, FormatError::Extraction(_)));
    assert_eq!(AppError::from(error).code, ErrorCode::InvalidModelOutput);
}

#[tokio::test]
async fn test_missing_type_names_index_two() {
    let output = json!({
        "name": "Mixed",
        "exercises": [
            {"name": "Squat", "type": "strength", "sets": 5, "reps": "5"},
            {"name": "Row", "type": "for-time", "segments": [{"name": "Row", "durationMinutes": 10}]},
            {"name": "Plank", "sets": 3, "reps": "60s"}
        ]
    });
    let (formatter, _) = scripted_formatter(ScriptedProvider::replying(output.to_string()));

    let error = formatter
        .format("Squat 5x5, row 10 min, plank 3x60s", &sample_library())
        .await
        .unwrap_err();

    assert_eq!(
        error,
        FormatError::MissingExerciseField {
            index: 2,
            field: "type".to_owned()
        }
    );
    assert!(error.to_string().contains("index 2"));
}

#[tokio::test]
async fn test_provider_failure_is_prefixed_and_not_retried() {
    let (formatter, provider) = scripted_formatter(ScriptedProvider::scripted(vec![
        Err(AppError::new(
            ErrorCode::ExternalServiceUnavailable,
            "OpenRouter: upstream overloaded",
        )),
        Ok(STRENGTH_OUTPUT.to_owned()),
    ]));

    let error = formatter
        .format("Bench 3x5", &sample_library())
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "completion provider error: OpenRouter: upstream overloaded"
    );
    assert_eq!(
        AppError::from(error).code,
        ErrorCode::ExternalServiceUnavailable
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_blank_input_never_reaches_provider() {
    let (formatter, provider) = scripted_formatter(ScriptedProvider::replying(STRENGTH_OUTPUT));

    let error = formatter
        .format("   \n  ", &sample_library())
        .await
        .unwrap_err();

    assert_eq!(error, FormatError::EmptyInput);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_request_shape() {
    let (formatter, provider) =
        scripted_formatter(ScriptedProvider::replying(STRENGTH_OUTPUT).with_json_mode());

    formatter
        .format("Bench Press 4x6-8", &sample_library())
        .await
        .unwrap();

    let requests = provider.requests();
    let request = &requests[0];
    assert_eq!(request.temperature, Some(0.3));
    assert!(request.json_mode);
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert!(request.messages[0]
        .content
        .contains("- Barbell Bench Press (aliases: Bench Press, Bench)"));
    assert_eq!(request.messages[1].role, MessageRole::User);
    assert_eq!(
        request.messages[1].content,
        "Parse this workout into structured JSON format:\n\nBench Press 4x6-8"
    );
}

#[tokio::test]
async fn test_prompt_grounding_is_bounded() {
    let (formatter, provider) = scripted_formatter(ScriptedProvider::replying(STRENGTH_OUTPUT));

    formatter
        .format("Bench 3x5", &synthetic_library(100_000))
        .await
        .unwrap();

    let system = &provider.requests()[0].messages[0].content;
    let grounding_lines = system
        .lines()
        .filter(|line| line.starts_with("- Exercise "))
        .count();
    assert_eq!(grounding_lines, 200);
    assert!(system.contains("- Exercise 199 (aliases: Ex199)"));
    assert!(!system.contains("- Exercise 200 "));
}

#[tokio::test]
async fn test_empty_library_still_formats() {
    let (formatter, provider) = scripted_formatter(ScriptedProvider::replying(STRENGTH_OUTPUT));

    let record = formatter
        .format("Bench 4x6-8", &ExerciseLibrary::from_value(json!({"not": "a list"})))
        .await
        .unwrap();

    assert_eq!(record.name, "Bench Day");
    assert_eq!(provider.call_count(), 1);
}
