// ABOUTME: Workout formatting pipeline from raw text to a validated WorkoutRecord
// ABOUTME: Grounds the prompt in the exercise library, calls the provider once, then extracts and validates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Formatter
//!
//! ```text
//! raw text ──► grounding subset ──► [system, user] ──► provider ──► strip fence
//!                                                                     │
//!                                     WorkoutRecord ◄── validate ◄── parse
//! ```
//!
//! The formatter is stateless and safe to share across concurrent requests.
//! The library is passed per call. The provider is called exactly once per
//! [`WorkoutFormatter::format`]; retry belongs to the provider stack.

/// Code-fence stripping and JSON parsing of model output
pub mod extract;
/// Tagged-variant validation and normalization
pub mod validate;

pub use extract::{parse_model_output, strip_code_fence};
pub use validate::validate_workout;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};
use workout_core::constants::pipeline::{
    DEFAULT_GROUNDING_LIMIT, DEFAULT_MAX_INPUT_CHARS, DEFAULT_TEMPERATURE,
};
use workout_core::errors::FormatError;
use workout_core::models::WorkoutRecord;

use crate::library::ExerciseLibrary;
use crate::llm::{build_messages, ChatRequest, LlmProvider};
use crate::logging::FormatterLogger;

/// Tunables for one formatter instance
#[derive(Debug, Clone, PartialEq)]
pub struct FormatterOptions {
    /// Maximum library entries rendered into the prompt
    pub grounding_limit: usize,
    /// Sampling temperature sent to the provider
    pub temperature: f32,
    /// Completion token cap, provider default when `None`
    pub max_tokens: Option<u32>,
    /// Model override, provider default when `None`
    pub model: Option<String>,
    /// Longest accepted raw text, in characters
    pub max_input_chars: usize,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            grounding_limit: DEFAULT_GROUNDING_LIMIT,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            model: None,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

/// Turns free-form workout notes into validated [`WorkoutRecord`]s
#[derive(Clone)]
pub struct WorkoutFormatter {
    provider: Arc<dyn LlmProvider>,
    options: FormatterOptions,
}

impl WorkoutFormatter {
    /// Formatter with default options
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_options(provider, FormatterOptions::default())
    }

    /// Formatter with explicit options
    #[must_use]
    pub fn with_options(provider: Arc<dyn LlmProvider>, options: FormatterOptions) -> Self {
        Self { provider, options }
    }

    /// Options in use
    #[must_use]
    pub const fn options(&self) -> &FormatterOptions {
        &self.options
    }

    /// Provider in use
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Check the raw text against the input rules
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::EmptyInput`] for blank text and
    /// [`FormatError::InputTooLarge`] past `max_input_chars`.
    pub fn check_input(&self, raw_text: &str) -> Result<(), FormatError> {
        if raw_text.trim().is_empty() {
            return Err(FormatError::EmptyInput);
        }
        let length = raw_text.chars().count();
        if length > self.options.max_input_chars {
            return Err(FormatError::InputTooLarge {
                length,
                max: self.options.max_input_chars,
            });
        }
        Ok(())
    }

    /// Build the completion request the pipeline would send
    ///
    /// Used directly by `format-workout --print-prompt`.
    #[must_use]
    pub fn build_request(&self, raw_text: &str, library: &ExerciseLibrary) -> ChatRequest {
        let grounding = library.select_grounding_subset(self.options.grounding_limit);
        let mut request = ChatRequest::new(build_messages(&grounding, raw_text))
            .with_temperature(self.options.temperature);

        if let Some(max_tokens) = self.options.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(model) = &self.options.model {
            request = request.with_model(model.clone());
        }
        if self.provider.capabilities().supports_json_mode() {
            request = request.with_json_mode();
        }
        request
    }

    /// Run the full pipeline on one piece of raw workout text
    ///
    /// # Errors
    ///
    /// Returns the [`FormatError`] of the first failing stage: input checks,
    /// the provider call, JSON extraction, or schema validation.
    #[instrument(
        skip(self, raw_text, library),
        fields(
            provider = %self.provider.name(),
            input_chars = raw_text.len(),
            library_size = library.len(),
        )
    )]
    pub async fn format(
        &self,
        raw_text: &str,
        library: &ExerciseLibrary,
    ) -> Result<WorkoutRecord, FormatError> {
        let started = Instant::now();
        let result = self.run(raw_text, library).await;
        let elapsed_ms = elapsed_millis(started);

        match &result {
            Ok(record) => FormatterLogger::log_success(
                self.provider.name(),
                record.exercises.len(),
                elapsed_ms,
            ),
            Err(error) => FormatterLogger::log_failure(self.provider.name(), error, elapsed_ms),
        }
        result
    }

    async fn run(
        &self,
        raw_text: &str,
        library: &ExerciseLibrary,
    ) -> Result<WorkoutRecord, FormatError> {
        self.check_input(raw_text)?;

        let request = self.build_request(raw_text, library);
        debug!(
            messages = request.messages.len(),
            json_mode = request.json_mode,
            "Sending completion request"
        );

        let call_started = Instant::now();
        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| FormatError::provider(&e))?;
        FormatterLogger::log_stage("completion", elapsed_millis(call_started), true);
        debug!(
            model = %response.model,
            output_len = response.content.len(),
            finish_reason = ?response.finish_reason,
            "Completion received"
        );

        let parsed = parse_model_output(&response.content)?;
        validate_workout(parsed)
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
