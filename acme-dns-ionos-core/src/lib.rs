//! ACME DNS-01 challenge core for IONOS-hosted domains
//!
//! Drives the DNS side of an ACME `dns-01` challenge:
//! - Zone resolution (longest label-boundary suffix match)
//! - Challenge record placement and removal (`ChallengeRecordManager`)
//! - Propagation waiting
//!
//! Remote calls go through the [`DnsProvider`](acme_dns_ionos_provider::DnsProvider)
//! trait, so everything here can be exercised against an in-memory provider.
//!
//! ```rust,no_run
//! use acme_dns_ionos_core::{ChallengeConfig, ChallengeRecordManager, IonosCredentials};
//!
//! # async fn run() -> acme_dns_ionos_core::CoreResult<()> {
//! let manager = ChallengeRecordManager::from_credentials(
//!     IonosCredentials::from_env()?,
//!     ChallengeConfig { propagation_seconds: 60, ..ChallengeConfig::default() },
//! )?;
//!
//! manager.setup("*.example.com", "token").await?;
//! // ... ACME validation ...
//! manager.cleanup("*.example.com", "token").await;
//! manager.cleanup_report().await.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::ChallengeConfig;
pub use error::{CoreError, CoreResult};
pub use services::{ChallengeRecordManager, SleepPropagationWaiter};
pub use traits::{ChallengeRecordStore, InMemoryChallengeRecordStore, PropagationWaiter};
pub use types::{ChallengeKey, CleanupFailure, CleanupReport, IonosCredentials, RecordOrigin, TrackedRecord, Zone};

pub use acme_dns_ionos_provider::{DnsProvider, ProviderError, RetryPolicy};
