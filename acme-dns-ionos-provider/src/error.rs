use serde::{Deserialize, Serialize};

/// Unified error type for all DNS provider operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Error classes
///
/// - Authentication: [`InvalidCredentials`](Self::InvalidCredentials),
///   [`PermissionDenied`](Self::PermissionDenied). Permanent for the run.
/// - Transient: [`NetworkError`](Self::NetworkError) (including HTTP 5xx),
///   [`Timeout`](Self::Timeout), [`RateLimited`](Self::RateLimited).
///   These are the only variants a [`RetryPolicy`](crate::RetryPolicy) retries.
/// - Protocol: [`ParseError`](Self::ParseError). Never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (connection refused, HTTP 5xx, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The provided credentials are invalid or expired.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The authenticated key lacks permission for the requested operation.
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified DNS record was not found.
    RecordNotFound {
        /// Provider that produced the error.
        provider: String,
        /// ID of the record that was not found.
        record_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified zone was not found.
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Zone name or identifier that was not found.
        domain: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter was rejected (e.g., bad TTL value, malformed record name).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// The client could not be constructed (bad endpoint, TLS backend failure).
    Configuration {
        /// Provider that produced the error.
        provider: String,
        /// Details about the configuration problem.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether a retry has a chance of succeeding.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Whether the credentials were rejected. Such failures hold for the whole run.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. } | Self::PermissionDenied { .. }
        )
    }

    /// Whether the error is an expected condition (bad input, missing resource), used to
    /// pick a log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::RecordNotFound { .. }
                | Self::DomainNotFound { .. }
                | Self::InvalidParameter { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::PermissionDenied {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Permission denied: {msg}")
                } else {
                    write!(f, "[{provider}] Permission denied")
                }
            }
            Self::RecordNotFound {
                provider,
                record_id,
                ..
            } => {
                write!(f, "[{provider}] Record '{record_id}' not found")
            }
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Zone '{domain}' not found: {msg}")
                } else {
                    write!(f, "[{provider}] Zone '{domain}' not found")
                }
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Configuration { provider, detail } => {
                write!(f, "[{provider}] Configuration error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ProviderError::NetworkError {
            provider: "ionos".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[ionos] Network error: connection refused");
    }

    #[test]
    fn display_invalid_credentials_with_message() {
        let e = ProviderError::InvalidCredentials {
            provider: "ionos".to_string(),
            raw_message: Some("bad key".to_string()),
        };
        assert_eq!(e.to_string(), "[ionos] Invalid credentials: bad key");
    }

    #[test]
    fn display_invalid_credentials_without_message() {
        let e = ProviderError::InvalidCredentials {
            provider: "ionos".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[ionos] Invalid credentials");
    }

    #[test]
    fn display_rate_limited_with_retry() {
        let e = ProviderError::RateLimited {
            provider: "ionos".to_string(),
            retry_after: Some(30),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[ionos] Rate limited (retry after 30s)");
    }

    #[test]
    fn display_rate_limited_without_retry() {
        let e = ProviderError::RateLimited {
            provider: "ionos".to_string(),
            retry_after: None,
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[ionos] Rate limited");
    }

    #[test]
    fn display_domain_not_found_with_message() {
        let e = ProviderError::DomainNotFound {
            provider: "ionos".to_string(),
            domain: "example.com".to_string(),
            raw_message: Some("no such zone".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "[ionos] Zone 'example.com' not found: no such zone"
        );
    }

    #[test]
    fn display_configuration() {
        let e = ProviderError::Configuration {
            provider: "ionos".to_string(),
            detail: "relative URL without a base".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[ionos] Configuration error: relative URL without a base"
        );
    }

    #[test]
    fn display_unknown() {
        let e = ProviderError::Unknown {
            provider: "ionos".to_string(),
            raw_code: Some("E001".to_string()),
            raw_message: "something broke".to_string(),
        };
        assert_eq!(e.to_string(), "[ionos] something broke");
    }

    #[test]
    fn serialize_carries_code_tag() {
        let e = ProviderError::RateLimited {
            provider: "ionos".to_string(),
            retry_after: Some(60),
            raw_message: Some("too many requests".to_string()),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"RateLimited\""));
        assert!(json.contains("\"retry_after\":60"));
    }

    #[test]
    fn retryable_classes() {
        assert!(
            ProviderError::NetworkError {
                provider: "t".into(),
                detail: "x".into(),
            }
            .is_retryable()
        );
        assert!(
            ProviderError::Timeout {
                provider: "t".into(),
                detail: "x".into(),
            }
            .is_retryable()
        );
        assert!(
            ProviderError::RateLimited {
                provider: "t".into(),
                retry_after: None,
                raw_message: None,
            }
            .is_retryable()
        );
        assert!(
            !ProviderError::InvalidCredentials {
                provider: "t".into(),
                raw_message: None,
            }
            .is_retryable()
        );
        assert!(
            !ProviderError::ParseError {
                provider: "t".into(),
                detail: "bad".into(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn auth_failure_classes() {
        assert!(
            ProviderError::PermissionDenied {
                provider: "t".into(),
                raw_message: None,
            }
            .is_auth_failure()
        );
        assert!(
            !ProviderError::RecordNotFound {
                provider: "t".into(),
                record_id: "1".into(),
                raw_message: None,
            }
            .is_auth_failure()
        );
    }
}
