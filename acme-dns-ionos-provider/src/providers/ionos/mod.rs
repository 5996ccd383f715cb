//! IONOS DNS Provider
//!
//! API documentation: <https://developer.hosting.ionos.com/docs/dns>

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::types::IonosCredentials;
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use types::{IonosApiError, IonosRecord, IonosRecordCreate, IonosZone, IonosZoneDetail};

/// Zones collection, relative to the endpoint
pub(crate) const ZONES_PATH: &str = "/dns/v1/zones";

pub(crate) const PROVIDER_NAME: &str = "ionos";

/// IONOS DNS Provider
pub struct IonosProvider {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
}

impl IonosProvider {
    /// Create a provider with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] if the credentials are invalid or the
    /// HTTP client cannot be built.
    pub fn new(credentials: IonosCredentials) -> Result<Self> {
        let client = create_http_client(PROVIDER_NAME)?;
        Self::with_client(credentials, client)
    }

    /// Create a provider that sends requests through `client`.
    pub fn with_client(credentials: IonosCredentials, client: Client) -> Result<Self> {
        credentials
            .validate()
            .map_err(|e| ProviderError::Configuration {
                provider: PROVIDER_NAME.to_string(),
                detail: e.to_string(),
            })?;

        log::debug!(
            "[{PROVIDER_NAME}] Using endpoint {} with key prefix {}",
            credentials.endpoint,
            mask_secret(&credentials.prefix)
        );

        Ok(Self {
            client,
            api_key: credentials.api_key(),
            endpoint: credentials.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

impl std::fmt::Debug for IonosProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IonosProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &mask_secret(&self.api_key))
            .finish_non_exhaustive()
    }
}
