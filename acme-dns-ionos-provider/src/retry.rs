//! Retry policy for transient provider failures
//!
//! Only errors for which [`ProviderError::is_retryable`] holds are retried:
//! network errors and timeouts use exponential backoff, rate limiting uses a
//! longer backoff or the provider's `Retry-After` hint.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};

/// Bounded exponential backoff with jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retrying.
    pub max_attempts: u32,
    /// Backoff for the first retry of a network error or timeout.
    pub base_delay_ms: u64,
    /// Upper bound for any computed backoff.
    pub max_delay_ms: u64,
    /// Backoff for the first retry of a rate-limited request without a hint.
    pub rate_limit_delay_ms: u64,
    /// Cap applied to a provider-supplied `Retry-After`.
    pub max_retry_after_secs: u64,
    /// Random extra delay as a fraction of the computed delay (`0.0..=1.0`).
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            rate_limit_delay_ms: 2_000,
            max_retry_after_secs: 30,
            jitter: 0.2,
        }
    }
}

impl RetryPolicy {
    /// A policy that performs exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// A policy that retries without sleeping. Intended for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
            rate_limit_delay_ms: 0,
            max_retry_after_secs: 0,
            jitter: 0.0,
        }
    }

    /// Deterministic part of the delay before retry number `attempt` (0-based).
    pub fn backoff_delay(&self, error: &ProviderError, attempt: u32) -> Duration {
        match error {
            ProviderError::RateLimited {
                retry_after: Some(secs),
                ..
            } => Duration::from_secs((*secs).min(self.max_retry_after_secs)),
            ProviderError::RateLimited { .. } => {
                Duration::from_millis(self.exponential(self.rate_limit_delay_ms, attempt))
            }
            _ => Duration::from_millis(self.exponential(self.base_delay_ms, attempt)),
        }
    }

    /// Delay before retry number `attempt`, with jitter applied.
    pub fn delay_for(&self, error: &ProviderError, attempt: u32) -> Duration {
        let delay = self.backoff_delay(error, attempt);
        let jitter = self.jitter.clamp(0.0, 1.0);
        if jitter <= 0.0 || delay.is_zero() {
            return delay;
        }
        let factor = rand::rng().random_range(0.0..=jitter);
        delay + delay.mul_f64(factor)
    }

    fn exponential(&self, base_ms: u64, attempt: u32) -> u64 {
        // 2^20 is already far past any sensible cap
        let capped_attempt = attempt.min(20);
        base_ms
            .saturating_mul(1_u64 << capped_attempt)
            .min(self.max_delay_ms)
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the attempt
    /// budget is spent. The last error is returned.
    pub async fn run<T, F, Fut>(&self, op_name: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 < max_attempts && e.is_retryable() => {
                    let delay = self.delay_for(&e, attempt);
                    log::warn!(
                        "{op_name} failed (attempt {}/{max_attempts}), retrying in {:.1}s: {e}",
                        attempt + 1,
                        delay.as_secs_f32(),
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn network() -> ProviderError {
        ProviderError::NetworkError {
            provider: "test".into(),
            detail: "err".into(),
        }
    }

    fn rate_limited(retry_after: Option<u64>) -> ProviderError {
        ProviderError::RateLimited {
            provider: "test".into(),
            retry_after,
            raw_message: None,
        }
    }

    fn auth() -> ProviderError {
        ProviderError::InvalidCredentials {
            provider: "test".into(),
            raw_message: None,
        }
    }

    // ---- backoff_delay ----

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(&network(), 0), Duration::from_millis(500));
        assert_eq!(policy.backoff_delay(&network(), 1), Duration::from_millis(1_000));
        assert_eq!(policy.backoff_delay(&network(), 2), Duration::from_millis(2_000));
    }

    #[test]
    fn backoff_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.backoff_delay(&network(), 10),
            Duration::from_millis(10_000)
        );
    }

    #[test]
    fn rate_limit_backoff_is_longer() {
        let policy = RetryPolicy::default();
        assert!(policy.backoff_delay(&rate_limited(None), 0) > policy.backoff_delay(&network(), 0));
    }

    #[test]
    fn rate_limit_honours_retry_after_with_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.backoff_delay(&rate_limited(Some(5)), 0),
            Duration::from_secs(5)
        );
        assert_eq!(
            policy.backoff_delay(&rate_limited(Some(3600)), 0),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn jitter_stays_within_fraction() {
        let policy = RetryPolicy {
            jitter: 0.5,
            ..RetryPolicy::default()
        };
        for _ in 0..50 {
            let d = policy.delay_for(&network(), 0);
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(750));
        }
    }

    // ---- run ----

    #[tokio::test]
    async fn run_retries_transient_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = RetryPolicy::immediate(3)
            .run("op", || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(network())
                } else {
                    Ok(7)
                }
            })
            .await;
        assert!(matches!(result, Ok(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn run_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = RetryPolicy::immediate(3)
            .run("op", || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(rate_limited(None))
            })
            .await;
        assert!(matches!(result, Err(ProviderError::RateLimited { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn run_does_not_retry_auth_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = RetryPolicy::immediate(5)
            .run("op", || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(auth())
            })
            .await;
        assert!(matches!(result, Err(ProviderError::InvalidCredentials { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_retry_policy_makes_one_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let _: Result<()> = RetryPolicy::no_retry()
            .run("op", || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(network())
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
