// ABOUTME: Environment configuration for the formatter server and CLI
// ABOUTME: Reads typed settings from environment variables and validates the provider credential
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use std::env;
use std::error::Error as StdError;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use workout_core::constants::{env_vars, pipeline};
use workout_core::errors::AppError;

use super::types::{Environment, LlmProviderType};
use crate::formatter::FormatterOptions;

/// Default HTTP listen port
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default provider request timeout, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Completion provider settings
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Backend selection
    pub provider: LlmProviderType,
    /// Credential, required for `OpenRouter`
    pub api_key: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Caller-side retry attempts around the provider
    pub max_retries: u32,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl LlmConfig {
    /// Load provider settings from the environment
    ///
    /// # Errors
    ///
    /// Returns an error when `OPENROUTER_API_KEY` is missing for the
    /// `OpenRouter` backend, or a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        let provider = LlmProviderType::from_env();
        let api_key = match provider {
            LlmProviderType::OpenRouter => non_empty_var(env_vars::OPENROUTER_API_KEY),
            LlmProviderType::Local => non_empty_var(env_vars::LLM_API_KEY),
        };

        let config = Self {
            provider,
            api_key,
            base_url: non_empty_var(env_vars::LLM_BASE_URL),
            model: non_empty_var(env_vars::LLM_MODEL),
            max_retries: parse_env(env_vars::LLM_MAX_RETRIES, 0)?,
            request_timeout: Duration::from_secs(parse_env(
                env_vars::LLM_REQUEST_TIMEOUT_SECS,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the selected backend has what it needs to start
    ///
    /// # Errors
    ///
    /// Returns a `ConfigMissing` [`AppError`] when a required credential is absent.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.provider.requires_api_key() && self.api_key.is_none() {
            return Err(AppError::config_missing(env_vars::OPENROUTER_API_KEY));
        }
        Ok(())
    }
}

/// Server and pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Completion provider settings
    pub llm: LlmConfig,
    /// Pipeline settings
    pub formatter: FormatterOptions,
    /// Allowed CORS origins; `["*"]` allows any
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse or a required credential is missing.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: parse_env(env_vars::HTTP_PORT, DEFAULT_HTTP_PORT)?,
            environment: Environment::from_env(),
            llm: LlmConfig::from_env()?,
            formatter: formatter_options_from_env()?,
            cors_allowed_origins: parse_origins(&env_var_or(env_vars::CORS_ALLOWED_ORIGINS, "*")),
        };

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Workout Formatter Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - LLM Provider: {}\n\
             - LLM Model: {}\n\
             - LLM Base URL: {}\n\
             - API Key: {}\n\
             - Temperature: {}\n\
             - Max Retries: {}\n\
             - Request Timeout: {}s\n\
             - Grounding Limit: {}\n\
             - Max Input Chars: {}\n\
             - CORS Origins: {}",
            self.http_port,
            self.environment,
            self.llm.provider,
            self.llm.model.as_deref().unwrap_or("(provider default)"),
            self.llm.base_url.as_deref().unwrap_or("(provider default)"),
            if self.llm.api_key.is_some() {
                "Configured"
            } else {
                "Not set"
            },
            self.formatter.temperature,
            self.llm.max_retries,
            self.llm.request_timeout.as_secs(),
            self.formatter.grounding_limit,
            self.formatter.max_input_chars,
            self.cors_allowed_origins.join(", "),
        )
    }
}

/// Pipeline options from `LLM_TEMPERATURE`, `LLM_MAX_TOKENS`, `LLM_MODEL`,
/// `GROUNDING_LIMIT`, and `MAX_INPUT_CHARS`
///
/// # Errors
///
/// Returns an error if a variable is set but does not parse.
pub fn formatter_options_from_env() -> Result<FormatterOptions> {
    let max_tokens = match non_empty_var(env_vars::LLM_MAX_TOKENS) {
        Some(raw) => Some(
            raw.trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid {} value: {raw}", env_vars::LLM_MAX_TOKENS))?,
        ),
        None => None,
    };

    Ok(FormatterOptions {
        grounding_limit: parse_env(env_vars::GROUNDING_LIMIT, pipeline::DEFAULT_GROUNDING_LIMIT)?,
        temperature: parse_env(env_vars::LLM_TEMPERATURE, pipeline::DEFAULT_TEMPERATURE)?,
        max_tokens,
        model: non_empty_var(env_vars::LLM_MODEL),
        max_input_chars: parse_env(env_vars::MAX_INPUT_CHARS, pipeline::DEFAULT_MAX_INPUT_CHARS)?,
    })
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a non-empty environment variable
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    match non_empty_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {raw}")),
        None => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
