//! Resilient request layer
//!
//! Every call goes through the [`RateGate`] and two retry paths:
//!
//! 1. Transport retry: connection failures and statuses 429, 500, 502, 503
//!    and 504 are retried up to `max_retries` times with exponential backoff.
//! 2. Rate-limit retry: a 429 that survives transport retry sleeps for the
//!    server's `Retry-After` (or the configured default, never longer than
//!    `max_retry_after_secs`) and reissues the request, at most
//!    `max_rate_limit_retries` times.
//!
//! The layer never returns an error. Callers get `Some(response)` with any
//! status code, or `None` when no response could be obtained.

use super::rate_gate::RateGate;
use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::config::{RateLimitConfig, RetryConfig};
use crate::log_retry_attempt;
use std::sync::Arc;
use std::time::Duration;

/// Statuses retried at the transport level
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

const TOO_MANY_REQUESTS: u16 = 429;

/// Retry/pacing wrapper around an [`HttpTransport`]
#[derive(Clone)]
pub struct RequestLayer {
    transport: Arc<dyn HttpTransport>,
    gate: Arc<RateGate>,
    retry: RetryConfig,
    rate_limit: RateLimitConfig,
}

impl RequestLayer {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        gate: Arc<RateGate>,
        retry: RetryConfig,
        rate_limit: RateLimitConfig,
    ) -> Self {
        Self {
            transport,
            gate,
            retry,
            rate_limit,
        }
    }

    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    /// Execute a request with pacing and both retry paths
    pub async fn execute(&self, request: HttpRequest) -> Option<HttpResponse> {
        let max_waits = self.rate_limit.max_rate_limit_retries;
        let mut waits = 0;

        loop {
            let response = self.send_with_retry(&request).await?;
            if response.status != TOO_MANY_REQUESTS {
                return Some(response);
            }

            if waits >= max_waits {
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    waits = waits,
                    "Rate limit persisted after {} waits, giving up",
                    waits
                );
                return Some(response);
            }
            waits += 1;

            let wait = response
                .retry_after()
                .unwrap_or_else(|| Duration::from_secs(self.rate_limit.default_retry_after_secs))
                .min(Duration::from_secs(self.rate_limit.max_retry_after_secs));
            tracing::warn!("Rate limit hit. Waiting {}s...", wait.as_secs_f64());
            tokio::time::sleep(wait).await;
        }
    }

    /// One logical attempt: transport-level retries with backoff
    async fn send_with_retry(&self, request: &HttpRequest) -> Option<HttpResponse> {
        let max_retries = self.retry.max_retries;
        let mut attempt = 0;

        loop {
            self.gate.wait().await;

            match self.transport.send(request.clone()).await {
                Ok(response) => {
                    if !RETRYABLE_STATUSES.contains(&response.status) || attempt >= max_retries {
                        return Some(response);
                    }
                    attempt += 1;
                    log_retry_attempt!(attempt, max_retries, format!("status {}", response.status));
                }
                Err(error) => {
                    if !error.is_retryable() || attempt >= max_retries {
                        tracing::error!(
                            method = %request.method,
                            url = %request.url,
                            "Request failed: {}",
                            error
                        );
                        return None;
                    }
                    attempt += 1;
                    log_retry_attempt!(attempt, max_retries, error);
                }
            }

            tokio::time::sleep(backoff_delay(&self.retry, attempt)).await;
        }
    }
}

/// Delay before retry number `attempt` (1-based):
/// `min(initial * multiplier^(attempt - 1), max)`
pub fn backoff_delay(retry: &RetryConfig, attempt: usize) -> Duration {
    let exponent = attempt.saturating_sub(1).min(i32::MAX as usize) as i32;
    let delay_ms = retry.initial_delay_ms as f64 * retry.backoff_multiplier.powi(exponent);
    let capped = delay_ms.min(retry.max_delay_ms as f64);
    Duration::from_millis(capped as u64)
}
