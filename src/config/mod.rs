// ABOUTME: Configuration management for the formatter server and CLI
// ABOUTME: Environment-driven settings for the provider, pipeline, and HTTP layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: Server, provider, and pipeline settings from environment variables
//! - **Types**: Shared enums for deployment environment and provider selection

/// Environment and server configuration
pub mod environment;
/// Core configuration type definitions
pub mod types;

pub use environment::{formatter_options_from_env, LlmConfig, ServerConfig};
pub use types::{Environment, LlmProviderType};
