// ABOUTME: Caller-side retry decorator for completion providers
// ABOUTME: Exponential backoff on transient provider failures only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! The formatter itself never retries. Binaries that want resilience wrap the
//! provider in a [`RetryingProvider`] before handing it to the formatter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};
use workout_core::errors::AppError;

use super::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};

/// Backoff schedule for [`RetryingProvider`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Multiplier applied after each retry
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Default schedule with `max_retries` extra attempts
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        delay.mul_f64(self.backoff_factor).min(self.max_delay)
    }
}

/// Provider decorator that retries retryable failures
///
/// Auth failures and other permanent errors are returned immediately.
pub struct RetryingProvider {
    inner: Arc<dyn LlmProvider>,
    policy: RetryPolicy,
}

impl RetryingProvider {
    /// Wrap `inner` with `policy`
    #[must_use]
    pub fn new(inner: Arc<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Retry schedule in use
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl LlmProvider for RetryingProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn display_name(&self) -> &str {
        self.inner.display_name()
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.inner.capabilities()
    }

    fn default_model(&self) -> &str {
        self.inner.default_model()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let mut attempt = 0;
        let mut delay = self.policy.initial_delay;

        loop {
            match self.inner.complete(request).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.code.is_retryable() => return Err(e),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.policy.max_retries {
                        if self.policy.max_retries > 0 {
                            warn!(
                                provider = self.inner.name(),
                                "Max retries ({}) exceeded", self.policy.max_retries
                            );
                        }
                        return Err(e);
                    }

                    debug!(
                        provider = self.inner.name(),
                        code = ?e.code,
                        "Attempt {attempt} failed, retrying in {}ms: {e}",
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    delay = self.policy.next_delay(delay);
                }
            }
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        self.inner.health_check().await
    }
}
