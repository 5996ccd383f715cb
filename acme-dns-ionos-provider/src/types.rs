use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default IONOS hosting API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.hosting.ionos.com";

/// Default TTL for challenge records. IONOS rejects anything lower.
pub const DEFAULT_CHALLENGE_TTL: u32 = 60;

// ============ Zone Types ============

/// A DNS zone registered with the provider account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone identifier.
    pub id: String,
    /// Zone apex (e.g., `"example.com"`).
    pub name: String,
}

impl Zone {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ============ Record Types ============

/// A TXT record as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxtRecord {
    /// Provider-assigned record identifier.
    pub id: String,
    /// Zone the record belongs to.
    pub zone_id: String,
    /// Fully-qualified record name (e.g., `"_acme-challenge.example.com"`).
    pub name: String,
    /// Record content with any surrounding quotes removed.
    pub content: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Whether the record is disabled at the provider.
    pub disabled: bool,

    /// When the record was last changed, if known.
    #[serde(with = "crate::utils::datetime")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Request to create a TXT record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTxtRecordRequest {
    /// Zone to create the record in.
    pub zone_id: String,
    /// Fully-qualified record name.
    pub name: String,
    /// Record content (the challenge token).
    pub content: String,
    /// Time to live in seconds.
    pub ttl: u32,
}

impl CreateTxtRecordRequest {
    /// Build a request with the default challenge TTL.
    pub fn new(
        zone_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.into(),
            content: content.into(),
            ttl: DEFAULT_CHALLENGE_TTL,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

// ============ Credential Types ============

/// Validation error for provider credentials.
///
/// Returned when credential fields are missing, empty, or have an invalid format.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field has an invalid format.
    InvalidFormat {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Credentials for the IONOS hosting API.
///
/// The API key sent to IONOS is `"{prefix}.{secret}"`.
#[derive(Clone, Serialize, Deserialize)]
pub struct IonosCredentials {
    /// Public key prefix.
    pub prefix: String,
    /// Key secret.
    pub secret: String,
    /// API base URL, without trailing slash.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl std::fmt::Debug for IonosCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IonosCredentials")
            .field("prefix", &self.prefix)
            .field("secret", &"***")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Key prefix used by certbot-style INI credential files (`dns_ionos_prefix = ...`).
const INI_KEY_PREFIX: &str = "dns_ionos_";

/// Environment variables read by [`IonosCredentials::from_env`].
pub const ENV_PREFIX: &str = "IONOS_API_PREFIX";
pub const ENV_SECRET: &str = "IONOS_API_SECRET";
pub const ENV_ENDPOINT: &str = "IONOS_API_ENDPOINT";

impl IonosCredentials {
    /// Create credentials against the default endpoint.
    pub fn new(prefix: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            secret: secret.into(),
            endpoint: default_endpoint(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Value of the `X-API-Key` header.
    pub fn api_key(&self) -> String {
        format!("{}.{}", self.prefix, self.secret)
    }

    /// Construct credentials from a flat key-value map, validating required fields.
    ///
    /// Accepts plain keys (`prefix`, `secret`, `endpoint`) as well as the keys of a
    /// certbot credentials file (`dns_ionos_prefix`, `dns_ionos_secret`,
    /// `dns_ionos_endpoint`). `endpoint` is optional.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required field is missing or empty,
    /// or if the endpoint is not an http(s) URL.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CredentialValidationError> {
        let lookup = |key: &str| {
            map.get(key)
                .or_else(|| map.get(&format!("{INI_KEY_PREFIX}{key}")))
                .cloned()
        };

        let credentials = Self {
            prefix: lookup("prefix").ok_or_else(|| missing("prefix", "API Prefix"))?,
            secret: lookup("secret").ok_or_else(|| missing("secret", "API Secret"))?,
            endpoint: lookup("endpoint").unwrap_or_else(default_endpoint),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Read credentials from `IONOS_API_PREFIX`, `IONOS_API_SECRET` and the optional
    /// `IONOS_API_ENDPOINT`.
    pub fn from_env() -> Result<Self, CredentialValidationError> {
        let map: HashMap<String, String> = [
            ("prefix", ENV_PREFIX),
            ("secret", ENV_SECRET),
            ("endpoint", ENV_ENDPOINT),
        ]
        .into_iter()
        .filter_map(|(key, var)| std::env::var(var).ok().map(|v| (key.to_string(), v)))
        .collect();
        Self::from_map(&map)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        if self.prefix.trim().is_empty() {
            return Err(empty("prefix", "API Prefix"));
        }
        if self.secret.trim().is_empty() {
            return Err(empty("secret", "API Secret"));
        }
        if self.prefix.contains('.') {
            return Err(CredentialValidationError::InvalidFormat {
                field: "prefix".to_string(),
                label: "API Prefix".to_string(),
                reason: "must not contain '.'".to_string(),
            });
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(CredentialValidationError::InvalidFormat {
                field: "endpoint".to_string(),
                label: "API Endpoint".to_string(),
                reason: format!("expected an http(s) URL, got '{}'", self.endpoint),
            });
        }
        Ok(())
    }
}

fn missing(field: &str, label: &str) -> CredentialValidationError {
    CredentialValidationError::MissingField {
        field: field.to_string(),
        label: label.to_string(),
    }
}

fn empty(field: &str, label: &str) -> CredentialValidationError {
    CredentialValidationError::EmptyField {
        field: field.to_string(),
        label: label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn from_map_plain_keys() {
        let creds = IonosCredentials::from_map(&map(&[("prefix", "pub"), ("secret", "s3cr3t")]))
            .unwrap();
        assert_eq!(creds.api_key(), "pub.s3cr3t");
        assert_eq!(creds.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn from_map_certbot_keys() {
        let creds = IonosCredentials::from_map(&map(&[
            ("dns_ionos_prefix", "pub"),
            ("dns_ionos_secret", "s3cr3t"),
            ("dns_ionos_endpoint", "https://api.example.test"),
        ]))
        .unwrap();
        assert_eq!(creds.endpoint, "https://api.example.test");
    }

    #[test]
    fn from_map_missing_secret() {
        let err = IonosCredentials::from_map(&map(&[("prefix", "pub")])).unwrap_err();
        assert!(matches!(
            err,
            CredentialValidationError::MissingField { ref field, .. } if field == "secret"
        ));
        assert_eq!(err.to_string(), "Missing required field: API Secret");
    }

    #[test]
    fn validate_rejects_blank_prefix() {
        let err = IonosCredentials::new("  ", "secret").validate().unwrap_err();
        assert!(matches!(err, CredentialValidationError::EmptyField { .. }));
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let err = IonosCredentials::new("pub", "secret")
            .with_endpoint("mock://endpoint")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialValidationError::InvalidFormat { ref field, .. } if field == "endpoint"
        ));
    }

    #[test]
    fn debug_masks_secret() {
        let creds = IonosCredentials::new("pub", "s3cr3t");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("pub"));
    }

    #[test]
    fn create_request_defaults_ttl() {
        let req = CreateTxtRecordRequest::new("z1", "_acme-challenge.example.com", "tok");
        assert_eq!(req.ttl, DEFAULT_CHALLENGE_TTL);
        assert_eq!(req.with_ttl(300).ttl, 300);
    }
}
