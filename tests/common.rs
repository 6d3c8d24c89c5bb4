// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides quiet logging, a scripted completion provider, and exercise library fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `workout_formatter`

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::Level;
use workout_formatter::errors::AppError;
use workout_formatter::formatter::{FormatterOptions, WorkoutFormatter};
use workout_formatter::library::ExerciseLibrary;
use workout_formatter::llm::{
    ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage,
};
use workout_formatter::models::ReferenceExercise;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Provider that replays canned outputs and records every request
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, AppError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    capabilities: LlmCapabilities,
}

impl ScriptedProvider {
    /// Provider whose next call returns `content`
    pub fn replying(content: impl Into<String>) -> Self {
        Self::scripted(vec![Ok(content.into())])
    }

    /// Provider whose next call fails with `error`
    pub fn failing(error: AppError) -> Self {
        Self::scripted(vec![Err(error)])
    }

    /// Provider that plays `replies` in order
    pub fn scripted(replies: Vec<Result<String, AppError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            capabilities: LlmCapabilities::text_only(),
        }
    }

    /// Advertise JSON mode
    pub fn with_json_mode(mut self) -> Self {
        self.capabilities |= LlmCapabilities::JSON_MODE;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of `complete` calls so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn display_name(&self) -> &str {
        "Scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("script exhausted")))?;

        Ok(ChatResponse {
            content: reply,
            model: "scripted-model".to_owned(),
            usage: Some(TokenUsage {
                prompt_tokens: 100,
                completion_tokens: 50,
                total_tokens: 150,
            }),
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Formatter around a scripted provider, returning both
pub fn scripted_formatter(provider: ScriptedProvider) -> (WorkoutFormatter, Arc<ScriptedProvider>) {
    init_test_logging();
    let provider = Arc::new(provider);
    let formatter = WorkoutFormatter::with_options(provider.clone(), FormatterOptions::default());
    (formatter, provider)
}

/// Small library with aliases, equipment, and muscles
pub fn sample_library() -> ExerciseLibrary {
    ExerciseLibrary::new(vec![
        ReferenceExercise::new("Barbell Bench Press", "strength")
            .with_aliases(["Bench Press", "Bench"])
            .with_equipment(["barbell", "bench"])
            .with_primary_muscles(["chest"])
            .with_secondary_muscles(["triceps", "shoulders"]),
        ReferenceExercise::new("Back Squat", "strength")
            .with_aliases(["Squat"])
            .with_equipment(["barbell"])
            .with_primary_muscles(["quadriceps"]),
        ReferenceExercise::new("Pull-up", "strength")
            .with_aliases(["Pullup", "Chin-up"])
            .with_equipment(["pull-up bar"])
            .with_primary_muscles(["lats"]),
        ReferenceExercise::new("Kettlebell Swing", "strength")
            .with_aliases(["KB Swing"])
            .with_equipment(["kettlebell"])
            .with_primary_muscles(["glutes", "hamstrings"]),
        ReferenceExercise::new("Box Jump", "plyometrics")
            .with_equipment(["box"])
            .with_primary_muscles(["quadriceps"]),
        ReferenceExercise::new("Ski Erg", "cardio")
            .with_equipment(["ski erg"])
            .with_primary_muscles(["lats"]),
        ReferenceExercise::new("Plank", "core")
            .with_equipment(["none"])
            .with_primary_muscles(["abdominals"]),
    ])
}

/// Synthetic library of `count` entries named `Exercise 0..count`
pub fn synthetic_library(count: usize) -> ExerciseLibrary {
    ExerciseLibrary::new(
        (0..count)
            .map(|i| {
                ReferenceExercise::new(format!("Exercise {i}"), "strength")
                    .with_aliases([format!("Ex{i}")])
            })
            .collect(),
    )
}

/// JSON form of [`sample_library`], as a client would send it
pub fn sample_library_json() -> Value {
    json!([
        {
            "name": "Barbell Bench Press",
            "category": "strength",
            "aliases": ["Bench Press", "Bench"],
            "equipment": ["barbell", "bench"],
            "primary_muscles": ["chest"]
        },
        {
            "name": "Back Squat",
            "category": "strength",
            "equipment": ["barbell"],
            "primary_muscles": ["quadriceps"]
        }
    ])
}

/// Model output for "Bench Press 4x6-8 @ 80kg, rest 3min"
pub const STRENGTH_OUTPUT: &str = r#"{
  "name": "Bench Day",
  "goal": "Upper body strength",
  "estimatedTime": "25 minutes",
  "exercises": [
    {
      "id": "1",
      "name": "Barbell Bench Press",
      "type": "strength",
      "sets": 4,
      "reps": "6-8",
      "weight": "80kg",
      "restSeconds": 180,
      "equipment": ["barbell", "bench"],
      "muscleGroups": ["chest", "triceps"],
      "notes": ""
    }
  ]
}"#;

/// Model output for "20min ski erg Z2\n10min bike Z2", wrapped in a fence
pub const FOR_TIME_OUTPUT: &str = r#"```json
{
  "name": "Zone 2 Conditioning",
  "exercises": [
    {
      "id": "1",
      "name": "Zone 2 Cardio",
      "type": "for-time",
      "sets": 0,
      "reps": "",
      "restSeconds": 0,
      "segments": [
        {"name": "Ski Erg", "durationMinutes": 20, "zone": "Zone 2"},
        {"name": "Bike", "durationMinutes": 10, "zone": "Zone 2"}
      ]
    }
  ]
}
```"#;

/// Model output for "E2MOM 10 min: Min1 Sled Push 40m @90kg, Min2 Sled Pull 40m @70kg"
pub const EMOM_OUTPUT: &str = r#"{
  "name": "Sled E2MOM",
  "exercises": [
    {
      "id": "1",
      "name": "E2MOM Sled Work",
      "type": "emom",
      "emomIntervalSeconds": 120,
      "emomTotalMinutes": 10,
      "emomIntervals": [
        {"name": "Sled Push", "reps": "40m", "weight": "90kg"},
        {"name": "Sled Pull", "reps": "40m", "weight": "70kg"}
      ]
    }
  ]
}"#;

/// Model output for "15 min AMRAP: 10 pull-ups, 15 KB swings @24kg, 20 box jumps 24in"
pub const AMRAP_OUTPUT: &str = r#"```
{
  "name": "15 Minute AMRAP",
  "exercises": [
    {
      "id": "1",
      "name": "AMRAP",
      "type": "amrap",
      "amrapDurationMinutes": 15,
      "amrapExercises": [
        {"name": "Pull-up", "reps": 10},
        {"name": "Kettlebell Swing", "reps": "15", "weight": "24kg"},
        {"name": "Box Jump", "reps": "20", "notes": "24in"}
      ]
    }
  ]
}
```"#;
