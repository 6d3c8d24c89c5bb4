// ABOUTME: Input helpers for the format-workout command-line tool
// ABOUTME: Reads workout text from a file or stdin and loads an optional library file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::{self, AsyncReadExt};
use tracing::debug;
use workout_formatter::library::ExerciseLibrary;

/// Read the workout text from `path`, or from stdin when `path` is `None` or `-`
pub async fn read_workout_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read workout text from {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read workout text from stdin")?;
            Ok(text)
        }
    }
}

/// Load the reference library, or an empty one when no file is given
pub async fn load_library(path: Option<&Path>) -> Result<ExerciseLibrary> {
    let Some(path) = path else {
        debug!("No exercise library given, grounding without one");
        return Ok(ExerciseLibrary::default());
    };

    let library = ExerciseLibrary::load_file(path)
        .await
        .with_context(|| format!("Failed to load exercise library from {}", path.display()))?;
    debug!(entries = library.len(), "Exercise library loaded");
    Ok(library)
}
