// ABOUTME: Main library entry point for the workout formatter
// ABOUTME: Turns free-form workout notes into structured workout records through a language model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Workout Formatter
//!
//! Normalizes free-form workout notes ("Back squat 5x5 @ 225, then 20 min
//! zone 2 row") into a typed [`WorkoutRecord`](models::WorkoutRecord).
//!
//! ## Pipeline
//!
//! 1. **Grounding**: a bounded prefix of the reference exercise library is
//!    rendered into the system prompt ([`library`])
//! 2. **Prompting**: system and user messages are assembled ([`llm::prompts`])
//! 3. **Completion**: one call to an `OpenAI`-compatible provider ([`llm`])
//! 4. **Validation**: fences stripped, JSON parsed, every exercise checked
//!    against its tagged variant and normalized ([`formatter`])
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workout_formatter::config::LlmConfig;
//! use workout_formatter::formatter::WorkoutFormatter;
//! use workout_formatter::library::ExerciseLibrary;
//! use workout_formatter::llm::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = create_provider(&LlmConfig::from_env()?)?;
//!     let formatter = WorkoutFormatter::new(provider);
//!     let library = ExerciseLibrary::load_file("exercises.json").await?;
//!
//!     let record = formatter.format("Bench 4x8 @ 135", &library).await?;
//!     println!("{}", serde_json::to_string_pretty(&record)?);
//!     Ok(())
//! }
//! ```

/// Environment-based configuration
pub mod config;

/// The formatting pipeline: extraction, validation, orchestration
pub mod formatter;

/// Reference exercise library and grounding subset selection
pub mod library;

/// Completion providers and prompt assembly
pub mod llm;

/// Logging configuration and structured pipeline events
pub mod logging;

/// `HTTP` middleware: CORS and request tracing
pub mod middleware;

/// `HTTP` routes
pub mod routes;

pub use workout_core::{constants, errors, models};
