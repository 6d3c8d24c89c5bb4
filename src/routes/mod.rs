// ABOUTME: Route module organization for the workout formatter HTTP endpoints
// ABOUTME: Health checks and the format-workout adapter, each exposing an axum Router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the formatter.

use std::sync::Arc;

use axum::Router;

use crate::formatter::WorkoutFormatter;

/// Workout formatting endpoint
pub mod format_workout;
/// Health check and readiness routes
pub mod health;

pub use format_workout::{FormatWorkoutRequest, WorkoutFormatRoutes};
pub use health::HealthRoutes;

/// Full application router: health checks plus the formatting API
pub fn app_router(formatter: Arc<WorkoutFormatter>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(formatter.provider())))
        .merge(WorkoutFormatRoutes::routes(formatter))
}
