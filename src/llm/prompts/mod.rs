// ABOUTME: System and user prompts for workout formatting loaded at compile time
// ABOUTME: Splices the exercise library grounding subset into the markdown template
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Formatting Prompts
//!
//! The system prompt is kept in a markdown file and loaded at compile time for
//! easy maintenance. It contains the workout schema, a placeholder for the
//! exercise library grounding subset, the parsing rules, one worked example per
//! exercise type, and a JSON-only response instruction.
//!
//! Both builders are pure: identical input always yields an identical prompt.

use workout_core::constants::pipeline::USER_PROMPT_PREFIX;

use super::ChatMessage;

/// Workout formatter system prompt template
///
/// `{{EXERCISE_LIBRARY}}` is replaced with the grounding subset.
pub const WORKOUT_FORMATTER_PROMPT_TEMPLATE: &str = include_str!("workout_formatter.md");

/// Placeholder replaced by [`build_system_prompt`]
pub const EXERCISE_LIBRARY_PLACEHOLDER: &str = "{{EXERCISE_LIBRARY}}";

/// Build the system prompt around a grounding subset
///
/// `grounding_subset` is the newline-joined output of
/// `ExerciseLibrary::select_grounding_subset`. An empty subset leaves the
/// library section empty; the rest of the prompt is unchanged.
#[must_use]
pub fn build_system_prompt(grounding_subset: &str) -> String {
    WORKOUT_FORMATTER_PROMPT_TEMPLATE.replacen(EXERCISE_LIBRARY_PLACEHOLDER, grounding_subset, 1)
}

/// Build the user prompt wrapping the coach's raw text verbatim
#[must_use]
pub fn build_user_prompt(raw_text: &str) -> String {
    format!("{USER_PROMPT_PREFIX}\n\n{raw_text}")
}

/// Build the `[system, user]` message pair sent to the completion provider
#[must_use]
pub fn build_messages(grounding_subset: &str, raw_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(build_system_prompt(grounding_subset)),
        ChatMessage::user(build_user_prompt(raw_text)),
    ]
}
