use crate::errors::{Error, Result};
use crate::http::retry::{RetryPolicy, is_retryable_status};
use crate::rate_limiter::RateLimiter;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;

/// HTTP client with built-in rate limiting and retry
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
    retry: RetryPolicy,
}

/// Outcome of a single failed attempt
enum AttemptError {
    Retryable(String),
    Fatal(Error),
}

impl RateLimitedClient {
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        rate_limit_ms: u64,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        let rate_limiter = RateLimiter::new(rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
            retry,
        })
    }

    /// GET a JSON document, retrying transport failures with backoff
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempt = 1;
        loop {
            match self.try_get_json(url, attempt).await {
                Ok(data) => return Ok(data),
                Err(AttemptError::Retryable(reason)) if self.retry.can_retry(attempt) => {
                    let delay = self.retry.backoff(attempt);
                    warn!("Attempt {} for {} failed ({}), retrying in {:?}", attempt, url, reason, delay);
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(AttemptError::Retryable(reason)) => {
                    return Err(Error::Transport {
                        url: url.to_string(),
                        attempts: attempt,
                        reason,
                    });
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
            }
        }
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?)
    }

    async fn try_get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        attempt: u32,
    ) -> std::result::Result<T, AttemptError> {
        self.rate_limiter.wait().await;
        debug!("GET {} (attempt {})", url, attempt);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let reason = format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            );
            if is_retryable_status(status) {
                return Err(AttemptError::Retryable(reason));
            }
            return Err(AttemptError::Fatal(Error::Transport {
                url: url.to_string(),
                attempts: attempt,
                reason,
            }));
        }

        response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(Error::Http(e)))
    }

    fn classify_send_error(error: reqwest::Error) -> AttemptError {
        if error.is_timeout() || error.is_connect() || error.is_request() {
            AttemptError::Retryable(error.to_string())
        } else {
            AttemptError::Fatal(Error::Http(error))
        }
    }
}
