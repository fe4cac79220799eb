//! Retry loop with exponential backoff for transient failures.
//!
//! Only 429 and 5xx responses and per-attempt timeouts are retried. Any other
//! non-2xx status is a client error that a retry cannot fix, and any other
//! transport failure is returned at once.

use log::debug;
use rand::Rng;
use std::time::Duration;

use super::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::config::RetryPolicy;
use crate::error::NewsRpmError;

/// Upper bound of the random jitter added to a backoff delay.
pub const MAX_JITTER_MS: u64 = 250;

/// True for overload and server-instability statuses.
pub fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Delay schedule: starts at `base_delay_ms`, doubles after each use, never
/// exceeds `max_delay_ms`.
#[derive(Debug, Clone)]
pub struct Backoff {
    delay_ms: u64,
    max_delay_ms: u64,
    jitter: bool,
}

impl Backoff {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            delay_ms: policy.base_delay_ms.min(policy.max_delay_ms),
            max_delay_ms: policy.max_delay_ms,
            jitter: policy.jitter,
        }
    }

    /// Returns how long to sleep before the next attempt and advances the
    /// schedule. Jitter is only added when `jittered` is set and the policy
    /// enables it.
    pub fn next_delay(&mut self, jittered: bool) -> Duration {
        let mut sleep_ms = self.delay_ms;
        if jittered && self.jitter {
            let bound = MAX_JITTER_MS.min(self.delay_ms);
            if bound > 0 {
                sleep_ms += rand::thread_rng().gen_range(0..bound);
            }
        }
        let sleep_ms = sleep_ms.min(self.max_delay_ms);

        self.delay_ms = self.delay_ms.saturating_mul(2).min(self.max_delay_ms);
        Duration::from_millis(sleep_ms)
    }
}

/// Sends `request`, retrying timeouts and transient statuses within
/// `policy.max_retries`.
///
/// Returns the last response once the budget is spent, even if it is a
/// failure; classifying it is the caller's job. Only an exhausted run of
/// timeouts becomes [`NewsRpmError::Timeout`].
#[tracing::instrument(skip(transport, request, policy))]
pub async fn send_with_retry<T: Transport + ?Sized>(
    transport: &T,
    request: &HttpRequest,
    policy: &RetryPolicy,
    context: &str,
) -> Result<HttpResponse, NewsRpmError> {
    let mut backoff = Backoff::new(policy);
    let mut attempt = 0;
    let max_attempts = policy.max_retries.saturating_add(1);

    loop {
        let outcome = match tokio::time::timeout(request.timeout, transport.send(request.clone()))
            .await
        {
            Ok(result) => result,
            Err(_elapsed) => Err(TransportError::TimedOut),
        };

        match outcome {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) if is_transient_status(response.status) => {
                if attempt >= policy.max_retries {
                    debug!(
                        "{}: status {} after {} attempt(s), giving up",
                        context,
                        response.status,
                        attempt.saturating_add(1)
                    );
                    return Ok(response);
                }
                let delay = backoff.next_delay(true);
                debug!(
                    "{}: attempt {}/{} got status {}, retrying in {}ms...",
                    context,
                    attempt + 1,
                    max_attempts,
                    response.status,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Ok(response) => {
                debug!("{}: non-retryable status {}", context, response.status);
                return Ok(response);
            }
            Err(TransportError::TimedOut) => {
                if attempt >= policy.max_retries {
                    return Err(NewsRpmError::Timeout {
                        context: context.to_string(),
                        attempts: attempt.saturating_add(1),
                    });
                }
                let delay = backoff.next_delay(false);
                debug!(
                    "{}: attempt {}/{} timed out after {}ms, retrying in {}ms...",
                    context,
                    attempt + 1,
                    max_attempts,
                    request.timeout.as_millis(),
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(TransportError::Failed(message)) => {
                debug!("{}: transport failure: {}", context, message);
                return Err(NewsRpmError::Transport {
                    context: context.to_string(),
                    message,
                });
            }
        }

        attempt += 1;
    }
}
