// ABOUTME: Core types and constants for the workout formatting pipeline
// ABOUTME: Foundation crate with error handling, workout record models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Workout Core
//!
//! Foundation crate providing shared types and constants for the workout
//! formatter. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the pipeline's `FormatError`
//! - **models**: `WorkoutRecord`, the tagged `ExerciseKind` union, and `ReferenceExercise`
//! - **constants**: Pipeline defaults and environment variable names

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Structured workout records and reference exercise types
pub mod models;
