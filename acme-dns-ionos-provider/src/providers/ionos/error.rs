//! IONOS error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{IonosProvider, PROVIDER_NAME};

/// IONOS error code mapping
/// Reference: <https://developer.hosting.ionos.com/docs/dns>
///
/// Codes the API is known to send are matched first; anything else falls back
/// to the HTTP status.
impl ProviderErrorMapper for IonosProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("UNAUTHORIZED") => self.invalid_credentials(raw),
            Some("FORBIDDEN" | "ACCESS_DENIED") => self.permission_denied(raw),
            Some("ZONE_NOT_FOUND") => self.domain_not_found(raw, context),
            Some("RECORD_NOT_FOUND") => self.record_not_found(raw, context),
            Some("INVALID_RECORD" | "RECORD_VALIDATION_ERROR" | "INVALID_INPUT") => {
                self.invalid_parameter(raw, context)
            }
            _ => match raw.status {
                Some(401) => self.invalid_credentials(raw),
                Some(403) => self.permission_denied(raw),
                Some(404) if context.record_id.is_some() => self.record_not_found(raw, context),
                Some(404) if context.domain.is_some() => self.domain_not_found(raw, context),
                Some(400 | 422) => self.invalid_parameter(raw, context),
                _ => self.unknown_error(raw),
            },
        }
    }
}

impl IonosProvider {
    fn invalid_credentials(&self, raw: RawApiError) -> ProviderError {
        ProviderError::InvalidCredentials {
            provider: self.provider_name().to_string(),
            raw_message: Some(raw.message),
        }
    }

    fn permission_denied(&self, raw: RawApiError) -> ProviderError {
        ProviderError::PermissionDenied {
            provider: self.provider_name().to_string(),
            raw_message: Some(raw.message),
        }
    }

    fn domain_not_found(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        ProviderError::DomainNotFound {
            provider: self.provider_name().to_string(),
            domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
            raw_message: Some(raw.message),
        }
    }

    fn record_not_found(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: self.provider_name().to_string(),
            record_id: context.record_id.unwrap_or_else(|| "<unknown>".to_string()),
            raw_message: Some(raw.message),
        }
    }

    fn invalid_parameter(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: context.record_name.unwrap_or_else(|| "record".to_string()),
            detail: raw.message,
        }
    }
}
