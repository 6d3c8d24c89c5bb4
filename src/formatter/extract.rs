// ABOUTME: Extraction of a JSON document from raw model output
// ABOUTME: Strips a surrounding markdown code fence and parses without repair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;
use workout_core::errors::FormatError;

/// Opening fence with an optional language tag: ```` ``` ````, ```` ```json ````, ```` ```JSON ````
static OPENING_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*").ok());

const FENCE: &str = "```";

/// Remove a markdown code fence wrapped around the model output
///
/// The text is trimmed first. When it opens with a fence, the opening fence
/// (with any language tag) and a trailing fence are removed and the remainder
/// is trimmed again. Text without an opening fence is only trimmed.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed;
    }

    let body = OPENING_FENCE
        .as_ref()
        .and_then(|re| re.find(trimmed))
        .map_or(&trimmed[FENCE.len()..], |m| &trimmed[m.end()..]);

    let body = body.trim_end();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Unwrap and parse model output into a JSON value
///
/// # Errors
///
/// Returns [`FormatError::Extraction`] when the unwrapped text is not valid
/// JSON. No attempt is made to repair truncated or malformed output.
pub fn parse_model_output(text: &str) -> Result<Value, FormatError> {
    let unwrapped = strip_code_fence(text);
    serde_json::from_str(unwrapped).map_err(|e| {
        warn!(
            output_len = text.len(),
            error = %e,
            "Model output is not valid JSON"
        );
        FormatError::Extraction(e.to_string())
    })
}
