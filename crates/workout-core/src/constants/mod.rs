// ABOUTME: Application constants for the workout formatting pipeline
// ABOUTME: Pipeline defaults, exercise type literals, and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants organized by domain.

/// Defaults applied by the formatting pipeline
pub mod pipeline {
    /// Maximum number of reference exercises embedded in the system prompt
    pub const DEFAULT_GROUNDING_LIMIT: usize = 200;

    /// Sampling temperature used for workout formatting (low creative variance)
    pub const DEFAULT_TEMPERATURE: f32 = 0.3;

    /// Maximum accepted raw text length, in characters
    pub const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

    /// Value used for `estimatedTime` when the model omits it
    pub const UNKNOWN_ESTIMATED_TIME: &str = "Unknown";

    /// EMOM cadence used when the model omits `emomIntervalSeconds`
    pub const DEFAULT_EMOM_INTERVAL_SECONDS: u32 = 60;

    /// Instruction that prefixes the caller's raw text in the user message
    pub const USER_PROMPT_PREFIX: &str = "Parse this workout into structured JSON format:";
}

/// Wire literals for the `type` discriminant of an exercise
pub mod exercise_types {
    /// Resistance work with sets and reps
    pub const STRENGTH: &str = "strength";
    /// Continuous-duration work split into segments
    pub const FOR_TIME: &str = "for-time";
    /// Every-minute-on-the-minute interval rotation
    pub const EMOM: &str = "emom";
    /// As-many-rounds-as-possible under a time cap
    pub const AMRAP: &str = "amrap";

    /// All accepted discriminants, in prompt order
    pub const ALL: [&str; 4] = [STRENGTH, FOR_TIME, EMOM, AMRAP];
}

/// Environment variable names read by the configuration layer
pub mod env_vars {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Provider selection (`openrouter` or `local`)
    pub const LLM_PROVIDER: &str = "LLM_PROVIDER";
    /// `OpenRouter` credential
    pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
    /// Base URL override for the completion endpoint
    pub const LLM_BASE_URL: &str = "LLM_BASE_URL";
    /// Model identifier override
    pub const LLM_MODEL: &str = "LLM_MODEL";
    /// Credential for a self-hosted `OpenAI`-compatible endpoint
    pub const LLM_API_KEY: &str = "LLM_API_KEY";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
    /// Completion token cap
    pub const LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
    /// Caller-side retry attempts around the provider
    pub const LLM_MAX_RETRIES: &str = "LLM_MAX_RETRIES";
    /// HTTP request timeout for the provider
    pub const LLM_REQUEST_TIMEOUT_SECS: &str = "LLM_REQUEST_TIMEOUT_SECS";
    /// Number of library entries embedded in the prompt
    pub const GROUNDING_LIMIT: &str = "GROUNDING_LIMIT";
    /// Raw text size cap
    pub const MAX_INPUT_CHARS: &str = "MAX_INPUT_CHARS";
    /// Comma-separated CORS origins, or `*`
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
}

/// Service identification for structured logs
pub mod service_names {
    /// Service name reported at startup
    pub const WORKOUT_FORMATTER: &str = "workout-formatter";
}
