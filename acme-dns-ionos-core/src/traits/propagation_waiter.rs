//! Propagation wait abstraction

use std::time::Duration;

use async_trait::async_trait;

/// Waits for freshly created records to become visible to the ACME server.
///
/// Implementations:
/// - `SleepPropagationWaiter`: fixed delay
#[async_trait]
pub trait PropagationWaiter: Send + Sync {
    /// Wait for `delay` before returning control to the ACME client
    async fn wait(&self, delay: Duration);
}
