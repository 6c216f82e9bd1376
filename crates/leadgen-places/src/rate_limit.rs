//! Bounded retry with exponential backoff for Places API calls.
//!
//! Network failures, non-2xx HTTP responses, non-JSON bodies and the
//! benign-but-unusable upstream statuses are retried. Unknown upstream
//! statuses are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

/// Attempt budget and backoff curve for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// Five attempts, waiting 1 s, 2 s, 4 s and 8 s in between (capped at 10 s).
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Same attempt budget with no waiting. For tests against local stubs.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay to sleep after the `attempt`-th failure (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(20);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Returns `true` if `err` is worth another attempt after backoff.
///
/// Retriable:
/// - [`PlacesError::Http`]: connection reset, timeout, TLS failure.
/// - [`PlacesError::UnexpectedStatus`]: any non-2xx HTTP response.
/// - [`PlacesError::MalformedBody`]: a 2xx response that is not JSON.
/// - [`PlacesError::TransientStatus`]: `OVER_QUERY_LIMIT` and friends.
///
/// Everything else is a contract or programming error and is returned as is.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    matches!(
        err,
        PlacesError::Http(_)
            | PlacesError::UnexpectedStatus { .. }
            | PlacesError::MalformedBody { .. }
            | PlacesError::TransientStatus { .. }
    )
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// `policy.max_attempts` attempts have been made. The last error is returned
/// when the budget runs out.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient Places API error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
