// ABOUTME: Logging configuration and structured pipeline events for the workout formatter
// ABOUTME: Configures level, output format, and noise reduction on top of tracing-subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging setup
//!
//! Raw workout text is never logged. Pipeline events carry lengths, counts,
//! durations, and error codes only.

use std::env;
use std::io;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use workout_core::constants::service_names;
use workout_core::errors::FormatError;

use crate::config::Environment;

/// Directives applied on top of any `RUST_LOG` value
const NOISE_DIRECTIVES: [&str; 4] = [
    "hyper=warn",
    "hyper::proto=warn",
    "reqwest=warn",
    "tower_http=info",
];

/// Logging configuration
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, testing, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for terminals and the CLI
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to `Pretty`
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::WORKOUT_FORMATTER.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = env::var("LOG_FORMAT")
            .map_or(LogFormat::Pretty, |value| LogFormat::from_str_or_default(&value));
        let environment = Environment::from_env();

        // In production, use more detailed logging
        let is_production = environment.is_production();

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::WORKOUT_FORMATTER.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment: environment.to_string(),
        }
    }

    /// Compact, location-free configuration for the command-line tool
    #[must_use]
    pub fn for_cli(level: &str) -> Self {
        Self {
            level: level.to_owned(),
            format: LogFormat::Compact,
            ..Self::default()
        }
    }

    /// Build the filter: `RUST_LOG` (or the configured level) plus noise reduction
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").unwrap_or_else(|_| self.level.clone());
        let mut filter = EnvFilter::new(base);
        for directive in NOISE_DIRECTIVES {
            filter = filter.add_directive(parse_directive(directive, LevelFilter::WARN));
        }
        filter.add_directive(parse_directive(
            &format!("workout_formatter={}", self.level),
            LevelFilter::INFO,
        ))
    }

    /// Initialize the global tracing subscriber
    ///
    /// Logs go to stderr so the CLI can keep stdout for JSON output.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_thread_names(self.include_thread)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(span_events),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_thread_names(self.include_thread)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(span_events),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to initialize tracing subscriber: {e}"))?;

        self.log_startup_info();
        Ok(())
    }

    /// Log structured startup information
    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Workout formatter starting up"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread,
                    "spans": self.include_spans
                }
            }
        });

        info!("Logging configured: {config_summary}");
    }
}

fn parse_directive(directive: &str, fallback: LevelFilter) -> Directive {
    directive.parse().unwrap_or_else(|_| fallback.into())
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Structured events for the formatting pipeline
pub struct FormatterLogger;

impl FormatterLogger {
    /// Log completion of one pipeline stage
    pub fn log_stage(stage: &str, duration_ms: u64, success: bool) {
        info!(
            pipeline.stage = %stage,
            pipeline.duration_ms = %duration_ms,
            pipeline.success = %success,
            event_type = "pipeline_stage",
            "Pipeline stage finished"
        );
    }

    /// Log a successfully formatted workout
    pub fn log_success(provider: &str, exercise_count: usize, duration_ms: u64) {
        info!(
            provider = %provider,
            exercise_count = %exercise_count,
            duration_ms = %duration_ms,
            outcome = "success",
            event_type = "workout_format",
            "Workout formatted"
        );
    }

    /// Log a failed format call with its error code and exercise index, if any
    pub fn log_failure(provider: &str, error: &FormatError, duration_ms: u64) {
        warn!(
            provider = %provider,
            error.code = ?error.code(),
            exercise_index = ?error.exercise_index(),
            duration_ms = %duration_ms,
            outcome = "failure",
            event_type = "workout_format",
            "Workout formatting failed: {error}"
        );
    }

    /// Log an HTTP request handled by the formatter routes
    pub fn log_http_request(path: &str, status: u16, duration_ms: u64, request_id: &str) {
        info!(
            http.path = %path,
            http.status = %status,
            http.duration_ms = %duration_ms,
            request_id = %request_id,
            "HTTP request"
        );
    }
}
