// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness is unconditional; readiness asks the completion provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::llm::LlmProvider;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(provider: Arc<dyn LlmProvider>) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
            .with_state(provider)
    }

    async fn health_handler() -> Json<serde_json::Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339()
        }))
    }

    async fn ready_handler(State(provider): State<Arc<dyn LlmProvider>>) -> Response {
        let (status, label) = match provider.health_check().await {
            Ok(true) => (StatusCode::OK, "ready"),
            Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, "not_ready"),
            Err(e) => {
                warn!(provider = provider.name(), "Readiness check failed: {e}");
                (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
            }
        };

        (
            status,
            Json(json!({
                "status": label,
                "provider": provider.name(),
                "timestamp": Utc::now().to_rfc3339()
            })),
        )
            .into_response()
    }
}
