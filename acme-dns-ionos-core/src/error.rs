//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use acme_dns_ionos_provider::{CredentialValidationError, ProviderError};

use crate::types::CleanupFailure;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No zone in the account owns the domain
    #[error("No DNS zone found for '{domain}'")]
    ZoneNotFound { domain: String },

    /// Several distinct zones share the best-matching name
    #[error(
        "Domain '{domain}' matches several zones named '{zone_name}' ({})",
        .zone_ids.join(", ")
    )]
    AmbiguousZone {
        domain: String,
        zone_name: String,
        zone_ids: Vec<String>,
    },

    /// A remote call failed while placing a challenge record
    #[error(
        "DNS-01 challenge for '{domain}'{} failed: {source}",
        .zone.as_ref().map(|z| format!(" in zone '{z}'")).unwrap_or_default()
    )]
    Challenge {
        domain: String,
        zone: Option<String>,
        source: ProviderError,
    },

    /// Invalid run configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Credential validation errors (structured, supports field level errors)
    #[error("{0}")]
    CredentialValidation(CredentialValidationError),

    /// Challenge records that could not be removed
    #[error("{} challenge record(s) could not be removed", .failures.len())]
    CleanupIncomplete { failures: Vec<CleanupFailure> },

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.); used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ZoneNotFound { .. }
            | Self::AmbiguousZone { .. }
            | Self::InvalidConfig(_)
            | Self::CredentialValidation(_) => true,
            Self::Challenge { source, .. } => source.is_expected(),
            Self::Provider(e) => e.is_expected(),
            Self::CleanupIncomplete { .. } => false,
        }
    }

    /// The underlying provider error, if any.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Challenge { source, .. } | Self::Provider(source) => Some(source),
            _ => None,
        }
    }
}

impl From<CredentialValidationError> for CoreError {
    fn from(e: CredentialValidationError) -> Self {
        Self::CredentialValidation(e)
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
