//! # acme-dns-ionos-provider
//!
//! Remote zone client for the [IONOS DNS API](https://developer.hosting.ionos.com/docs/dns),
//! scoped to what an ACME DNS-01 challenge needs: listing zones, creating TXT
//! records, finding them again and deleting them.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acme_dns_ionos_provider::{create_provider, CreateTxtRecordRequest, IonosCredentials};
//!
//! # async fn example() -> acme_dns_ionos_provider::Result<()> {
//! let provider = create_provider(IonosCredentials::new("prefix", "secret"))?;
//!
//! let zones = provider.list_zones().await?;
//! let zone = &zones[0];
//!
//! let record = provider
//!     .create_txt_record(&CreateTxtRecordRequest::new(
//!         &zone.id,
//!         format!("_acme-challenge.{}", zone.name),
//!         "token",
//!     ))
//!     .await?;
//!
//! provider.delete_record(&zone.id, &record.id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Transport
//! failures, timeouts and HTTP 429 are reported as retryable
//! ([`ProviderError::is_retryable`]); wrap calls in a [`RetryPolicy`] to retry them.

mod error;
mod factory;
mod http_client;
mod providers;
mod retry;
mod traits;
mod types;
pub mod utils;

pub use error::{ProviderError, Result};
pub use factory::create_provider;
pub use providers::IonosProvider;
pub use retry::RetryPolicy;
pub use traits::DnsProvider;
pub use types::{
    CreateTxtRecordRequest, CredentialValidationError, DEFAULT_CHALLENGE_TTL, DEFAULT_ENDPOINT,
    ENV_ENDPOINT, ENV_PREFIX, ENV_SECRET, IonosCredentials, TxtRecord, Zone,
};

/// Domain-name helpers shared with callers that compare names against zones.
pub use providers::common::{normalize_domain_name, strip_txt_quotes};
