//! Provider factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::IonosProvider;
use crate::traits::DnsProvider;
use crate::types::IonosCredentials;

/// Creates a shareable [`DnsProvider`] from IONOS credentials.
///
/// The returned provider is wrapped in `Arc<dyn DnsProvider>` for easy sharing
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use acme_dns_ionos_provider::{create_provider, IonosCredentials};
///
/// let provider = create_provider(IonosCredentials::new("prefix", "secret")).unwrap();
/// ```
pub fn create_provider(credentials: IonosCredentials) -> Result<Arc<dyn DnsProvider>> {
    Ok(Arc::new(IonosProvider::new(credentials)?))
}
