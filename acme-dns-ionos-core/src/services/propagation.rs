//! Propagation waiting

use std::time::Duration;

use async_trait::async_trait;

use crate::traits::PropagationWaiter;

/// Longest propagation wait accepted by configuration (seconds)
pub const MAX_PROPAGATION_SECONDS: u64 = 3600;

/// Default propagation wait (seconds)
pub const DEFAULT_PROPAGATION_SECONDS: u64 = 10;

/// Fixed-delay waiter backed by `tokio::time::sleep`.
///
/// IONOS gives no signal for when a change reaches its name servers, so this
/// simply waits. At least 60 seconds is recommended for production runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepPropagationWaiter;

#[async_trait]
impl PropagationWaiter for SleepPropagationWaiter {
    async fn wait(&self, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        log::info!(
            "Waiting {}s for DNS changes to propagate",
            delay.as_secs_f32()
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleeps_for_the_requested_delay() {
        let start = tokio::time::Instant::now();
        SleepPropagationWaiter.wait(Duration::from_secs(90)).await;
        assert!(start.elapsed() >= Duration::from_secs(90));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_returns_immediately() {
        let start = tokio::time::Instant::now();
        SleepPropagationWaiter.wait(Duration::ZERO).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
