// ABOUTME: OpenAI-compatible completion provider for OpenRouter and self-hosted endpoints
// ABOUTME: Posts chat completions over reqwest and maps HTTP failures to error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Generic implementation for any endpoint that speaks the `OpenAI` chat
//! completions API. The same client serves the hosted `OpenRouter` gateway and
//! local servers like Ollama or vLLM; only the base URL, credential, and
//! capability flags differ.
//!
//! ## Supported Backends
//!
//! - **`OpenRouter`**: <https://openrouter.ai/api/v1>
//! - **Ollama**: <http://localhost:11434/v1>
//! - **vLLM**: <http://localhost:8000/v1>
//! - **Any `OpenAI`-compatible endpoint**
//!
//! ## Example
//!
//! ```rust,no_run
//! use workout_formatter::llm::{
//!     ChatMessage, ChatRequest, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider,
//! };
//! use workout_formatter::errors::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = OpenAiCompatibleConfig::ollama("qwen2.5:14b-instruct");
//!     let provider = OpenAiCompatibleProvider::new(config)?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("Squat 5x5")]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use workout_core::errors::{AppError, ErrorCode};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};

// ============================================================================
// Configuration Constants
// ============================================================================

/// `OpenRouter` gateway base URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default `OpenRouter` model for workout formatting
pub const OPENROUTER_DEFAULT_MODEL: &str = "tngtech/deepseek-r1t2-chimera:free";

/// Default base URL for a local Ollama server
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model for local inference
pub const LOCAL_DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (reasoning models can take a while on long workouts)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Characters of a non-JSON error body kept in error messages
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAiResponseFormat>,
}

/// Structured output selector
#[derive(Debug, Serialize)]
struct OpenAiResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: String,
    /// Provider display name
    pub display_name: String,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// Create configuration for the `OpenRouter` gateway
    #[must_use]
    pub fn openrouter(api_key: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            base_url: OPENROUTER_BASE_URL.to_owned(),
            api_key: Some(api_key.into()),
            default_model: model.unwrap_or(OPENROUTER_DEFAULT_MODEL).to_owned(),
            provider_name: "openrouter".to_owned(),
            display_name: "OpenRouter".to_owned(),
            capabilities: LlmCapabilities::text_only(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Create configuration for a local Ollama instance
    #[must_use]
    pub fn ollama(model: &str) -> Self {
        Self {
            base_url: OLLAMA_BASE_URL.to_owned(),
            api_key: None,
            default_model: model.to_owned(),
            provider_name: "ollama".to_owned(),
            display_name: "Ollama (Local)".to_owned(),
            capabilities: LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Create configuration for an arbitrary self-hosted endpoint
    ///
    /// The provider name is inferred from the well-known local ports.
    #[must_use]
    pub fn local(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        let (provider_name, display_name, capabilities) = if base_url.contains(":11434") {
            (
                "ollama",
                "Ollama (Local)",
                LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
            )
        } else if base_url.contains(":8000") {
            (
                "vllm",
                "vLLM (Local)",
                LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
            )
        } else {
            ("local", "Local LLM", LlmCapabilities::text_only())
        };

        Self {
            base_url: base_url.to_owned(),
            api_key: api_key.filter(|key| !key.is_empty()),
            default_model: model.to_owned(),
            provider_name: provider_name.to_owned(),
            display_name: display_name.to_owned(),
            capabilities,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the capability flags
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: LlmCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    /// Provider configuration
    #[must_use]
    pub const fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Log message shapes for debugging; content is never logged
    fn log_messages_debug(messages: &[OpenAiMessage], provider_name: &str) {
        for (i, msg) in messages.iter().enumerate() {
            debug!(
                "Message[{i}] role={}, content_len={}",
                msg.role,
                msg.content.len()
            );
        }
        debug!(
            "Sending chat completion request to {provider_name} with {} messages",
            messages.len()
        );
    }

    /// Parse error response from API
    fn parse_error_response(&self, status: StatusCode, body: &str) -> AppError {
        let service = self.config.display_name.as_str();

        let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) else {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
            return Self::error_for_status(
                status,
                service,
                format!("API error ({status}): {preview}"),
            );
        };

        let detail = error_response.error.message;
        match status.as_u16() {
            401 | 403 => Self::error_for_status(
                status,
                service,
                format!("API authentication failed: {detail}"),
            ),
            429 => Self::error_for_status(status, service, Self::extract_rate_limit_message(&detail)),
            404 => Self::error_for_status(
                status,
                service,
                format!("Model or endpoint not found: {detail}"),
            ),
            _ => {
                let error_type = error_response
                    .error
                    .error_type
                    .unwrap_or_else(|| "unknown".to_owned());
                Self::error_for_status(status, service, format!("{error_type} - {detail}"))
            }
        }
    }

    /// Pick the error code for an HTTP status
    fn error_for_status(status: StatusCode, service: &str, message: String) -> AppError {
        let code = match status.as_u16() {
            401 | 403 => ErrorCode::ExternalAuthFailed,
            429 => ErrorCode::ExternalRateLimited,
            500..=599 => ErrorCode::ExternalServiceUnavailable,
            _ => ErrorCode::ExternalServiceError,
        };
        AppError::new(code, format!("{service}: {message}"))
    }

    /// Extract a user-friendly rate limit message
    ///
    /// `OpenAI`-style rate limit errors may include "try again in Xs".
    fn extract_rate_limit_message(message: &str) -> String {
        const MARKER: &str = "try again in ";
        if let Some(retry_pos) = message.to_lowercase().find(MARKER) {
            let after_prefix = &message[retry_pos + MARKER.len()..];
            let end_pos = after_prefix
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .unwrap_or(after_prefix.len());
            if let Ok(seconds) = after_prefix[..end_pos].parse::<f64>() {
                let seconds_int = seconds.ceil() as u64;
                return format!("LLM rate limit reached. Please try again in {seconds_int} seconds.");
            }
        }
        "LLM rate limit reached. Please wait a moment and try again.".to_owned()
    }

    /// Map a transport failure
    fn transport_error(&self, e: &reqwest::Error) -> AppError {
        let service = self.config.display_name.as_str();
        if e.is_connect() {
            AppError::external_unavailable(
                service,
                format!(
                    "Cannot connect to {}. Is the server running at {}?",
                    self.config.display_name, self.config.base_url
                ),
            )
        } else if e.is_timeout() {
            AppError::external_unavailable(service, format!("Request timed out: {e}"))
        } else {
            AppError::external_service(service, format!("Failed to send request: {e}"))
        }
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.bearer_auth(api_key)
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = %self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let messages: Vec<OpenAiMessage> = request.messages.iter().map(OpenAiMessage::from).collect();
        Self::log_messages_debug(&messages, &self.config.provider_name);

        let json_mode = request.json_mode && self.config.capabilities.supports_json_mode();
        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: json_mode.then_some(OpenAiResponseFormat {
                format_type: "json_object",
            }),
        };

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", self.config.provider_name, e);
                self.transport_error(&e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read API response: {}", e);
            AppError::external_service(
                self.config.display_name.as_str(),
                format!("Failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            let app_error = self.parse_error_response(status, &body);
            warn!(status = %status, code = ?app_error.code, "Completion request rejected");
            return Err(app_error);
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            AppError::external_service(
                self.config.display_name.as_str(),
                format!("Failed to parse response: {e}"),
            )
        })?;

        let choice = openai_response.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(self.config.display_name.as_str(), "API returned no choices")
        })?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.config.provider_name,
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model.unwrap_or_else(|| model.to_owned()),
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self), fields(provider = %self.config.provider_name))]
    async fn health_check(&self) -> Result<bool, AppError> {
        debug!(
            "Performing {} health check at {}",
            self.config.provider_name, self.config.base_url
        );

        let http_request = self.client.get(self.api_url("models"));

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("{} health check failed: {}", self.config.provider_name, e);
                self.transport_error(&e)
            })?;

        let healthy = response.status().is_success();

        if healthy {
            debug!("{} health check passed", self.config.provider_name);
        } else {
            warn!(
                "{} health check failed with status: {}",
                self.config.provider_name,
                response.status()
            );
        }

        Ok(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider {
            client: Client::new(),
            config: OpenAiCompatibleConfig::ollama("test-model"),
        }
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let provider = OpenAiCompatibleProvider {
            client: Client::new(),
            config: OpenAiCompatibleConfig::ollama("m").with_base_url("http://host:1/v1/"),
        };
        assert_eq!(provider.api_url("chat/completions"), "http://host:1/v1/chat/completions");
    }

    #[test]
    fn test_status_mapping() {
        let provider = provider();
        let body = r#"{"error": {"message": "No auth credentials found", "code": 401}}"#;

        let auth = provider.parse_error_response(StatusCode::UNAUTHORIZED, body);
        assert_eq!(auth.code, ErrorCode::ExternalAuthFailed);
        assert!(auth.message.contains("No auth credentials found"));

        let limited = provider.parse_error_response(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Please try again in 2.5s"}}"#,
        );
        assert_eq!(limited.code, ErrorCode::ExternalRateLimited);
        assert!(limited.message.contains("try again in 3 seconds"));

        let down = provider.parse_error_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(down.code, ErrorCode::ExternalServiceUnavailable);

        let other = provider.parse_error_response(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"message": "bad model", "type": "invalid_request_error"}}"#,
        );
        assert_eq!(other.code, ErrorCode::ExternalServiceError);
        assert!(other.message.contains("invalid_request_error - bad model"));
    }

    #[test]
    fn test_local_preset_detection() {
        let ollama = OpenAiCompatibleConfig::local("http://localhost:11434/v1", "m", None);
        assert_eq!(ollama.provider_name, "ollama");
        assert!(ollama.capabilities.supports_json_mode());

        let other = OpenAiCompatibleConfig::local("http://gpu-box:9999/v1", "m", Some(String::new()));
        assert_eq!(other.provider_name, "local");
        assert!(other.api_key.is_none());
        assert!(!other.capabilities.supports_json_mode());
    }

    #[test]
    fn test_openrouter_preset() {
        let config = OpenAiCompatibleConfig::openrouter("sk-or-test", None);
        assert_eq!(config.base_url, OPENROUTER_BASE_URL);
        assert_eq!(config.default_model, OPENROUTER_DEFAULT_MODEL);
        assert_eq!(config.api_key.as_deref(), Some("sk-or-test"));
    }
}
