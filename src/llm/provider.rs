// ABOUTME: Completion provider construction from configuration
// ABOUTME: Selects OpenRouter or a local endpoint and applies the optional retry decorator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Provider Selection
//!
//! Set `LLM_PROVIDER` to choose the backend:
//! - `openrouter` (default): hosted gateway, requires `OPENROUTER_API_KEY`
//! - `local`/`ollama`/`vllm`/`localai`: any self-hosted `OpenAI`-compatible endpoint
//!
//! `LLM_BASE_URL` and `LLM_MODEL` override the preset for either backend.

use std::sync::Arc;

use tracing::{debug, info};
use workout_core::errors::{AppError, AppResult};

use super::openai_compatible::{LOCAL_DEFAULT_MODEL, OLLAMA_BASE_URL};
use super::{
    LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider, RetryPolicy, RetryingProvider,
};
use crate::config::{LlmConfig, LlmProviderType};

/// Build the completion provider described by `config`
///
/// When `max_retries` is non-zero the provider is wrapped in a
/// [`RetryingProvider`]; the formatter itself never retries.
///
/// # Errors
///
/// Returns an error if a required credential is missing or the HTTP client
/// cannot be created.
pub fn create_provider(config: &LlmConfig) -> AppResult<Arc<dyn LlmProvider>> {
    config.validate()?;

    let provider_config = match config.provider {
        LlmProviderType::OpenRouter => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                AppError::config("OpenRouter selected without an API key")
            })?;
            let preset = OpenAiCompatibleConfig::openrouter(api_key, config.model.as_deref());
            match &config.base_url {
                Some(base_url) => preset.with_base_url(base_url.as_str()),
                None => preset,
            }
        }
        LlmProviderType::Local => OpenAiCompatibleConfig::local(
            config.base_url.as_deref().unwrap_or(OLLAMA_BASE_URL),
            config.model.as_deref().unwrap_or(LOCAL_DEFAULT_MODEL),
            config.api_key.clone(),
        ),
    }
    .with_request_timeout(config.request_timeout);

    info!(
        "Initializing LLM provider: {} (set {} to change)",
        config.provider,
        LlmProviderType::ENV_VAR
    );

    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiCompatibleProvider::new(provider_config)?);
    debug!(
        "Provider {} initialized with model: {}",
        provider.display_name(),
        provider.default_model()
    );

    if config.max_retries == 0 {
        return Ok(provider);
    }

    info!(max_retries = config.max_retries, "Wrapping provider with retry policy");
    Ok(Arc::new(RetryingProvider::new(
        provider,
        RetryPolicy::with_max_retries(config.max_retries),
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;
    use workout_core::errors::ErrorCode;

    fn llm_config(provider: LlmProviderType, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: api_key.map(str::to_owned),
            base_url: None,
            model: None,
            max_retries: 0,
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_openrouter_requires_key() {
        let Err(error) = create_provider(&llm_config(LlmProviderType::OpenRouter, None)) else {
            panic!("expected a configuration error");
        };
        assert_eq!(error.code, ErrorCode::ConfigMissing);
    }

    #[test]
    fn test_local_defaults_to_ollama() {
        let provider = create_provider(&llm_config(LlmProviderType::Local, None)).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.default_model(), LOCAL_DEFAULT_MODEL);
        assert!(provider.capabilities().supports_json_mode());
    }

    #[test]
    fn test_model_override_applies() {
        let mut config = llm_config(LlmProviderType::OpenRouter, Some("sk-or-test"));
        config.model = Some("meta-llama/llama-3.3-70b-instruct".to_owned());
        config.max_retries = 2;

        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openrouter");
        assert_eq!(provider.default_model(), "meta-llama/llama-3.3-70b-instruct");
    }
}
