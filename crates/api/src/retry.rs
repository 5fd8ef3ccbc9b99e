use anyhow::Result;
use async_trait::async_trait;
use extract::LanguageModel;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{warn, info};

use crate::config::RetryConfig;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// Run `f` until it succeeds or `max_retries` extra attempts are spent,
    /// doubling the pause between attempts up to `max_backoff`.
    pub async fn retry<F, Fut, T, E>(&self, operation_name: &str, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            let err = match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        info!(operation = operation_name, attempts = attempt, "Succeeded after retries");
                    }
                    return Ok(result);
                }
                Err(e) => e,
            };

            if attempt > self.max_retries {
                warn!(operation = operation_name, attempts = attempt, error = %err, "Giving up");
                return Err(err);
            }

            warn!(
                operation = operation_name,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "Attempt failed, retrying"
            );

            sleep(backoff).await;
            backoff = (backoff * 2).min(self.max_backoff);
            attempt += 1;
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.initial_backoff_ms, config.max_backoff_ms)
    }
}

/// Wraps a language model so every completion goes through a retry policy.
pub struct RetryingModel {
    inner: Arc<dyn LanguageModel>,
    policy: RetryPolicy,
}

impl RetryingModel {
    pub fn new(inner: Arc<dyn LanguageModel>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl LanguageModel for RetryingModel {
    fn name(&self) -> String {
        self.inner.name()
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let operation = format!("complete:{}", self.inner.name());
        self.policy
            .retry(&operation, || self.inner.complete(system, prompt))
            .await
    }
}
