// ABOUTME: HTTP adapter for the workout formatting pipeline
// ABOUTME: POST /api/format-workout with rawText and exerciseLibrary, returning a WorkoutRecord
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use workout_core::errors::{AppError, FormatError};
use workout_core::models::WorkoutRecord;

use crate::formatter::WorkoutFormatter;
use crate::library::ExerciseLibrary;
use crate::logging::FormatterLogger;
use crate::middleware::request_id;

/// Path served by [`WorkoutFormatRoutes`]
pub const FORMAT_WORKOUT_PATH: &str = "/api/format-workout";

/// Request body for the formatting endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatWorkoutRequest {
    /// Free-form workout notes
    #[serde(default)]
    pub raw_text: Option<String>,
    /// Reference exercise library, must be a JSON array
    #[serde(default)]
    pub exercise_library: Option<Value>,
}

/// Workout formatting routes
pub struct WorkoutFormatRoutes;

impl WorkoutFormatRoutes {
    /// Create the formatting route
    pub fn routes(formatter: Arc<WorkoutFormatter>) -> Router {
        Router::new()
            .route(FORMAT_WORKOUT_PATH, post(Self::format_workout))
            .with_state(formatter)
    }

    async fn format_workout(
        State(formatter): State<Arc<WorkoutFormatter>>,
        headers: HeaderMap,
        body: Result<Json<FormatWorkoutRequest>, JsonRejection>,
    ) -> Response {
        let started = Instant::now();
        let request_id = request_id(&headers);

        let response = match Self::handle(&formatter, body).await {
            Ok(record) => Json(record).into_response(),
            Err(error) => error.with_request_id(request_id.clone()).into_response(),
        };

        FormatterLogger::log_http_request(
            FORMAT_WORKOUT_PATH,
            response.status().as_u16(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            &request_id,
        );
        response
    }

    async fn handle(
        formatter: &WorkoutFormatter,
        body: Result<Json<FormatWorkoutRequest>, JsonRejection>,
    ) -> Result<WorkoutRecord, AppError> {
        let Json(request) =
            body.map_err(|e| AppError::invalid_input(format!("Invalid request body: {e}")))?;

        let raw_text = request
            .raw_text
            .filter(|text| !text.trim().is_empty())
            .ok_or(FormatError::EmptyInput)?;

        let library = request
            .exercise_library
            .map_or(Err(FormatError::InvalidLibrary), ExerciseLibrary::try_from_value)?;

        Ok(formatter.format(&raw_text, &library).await?)
    }
}
