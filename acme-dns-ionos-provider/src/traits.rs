use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{CreateTxtRecordRequest, TxtRecord, Zone};

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP status code of the failed response
    pub status: Option<u16>,
    /// Provider error code, if the body carried one
    pub code: Option<String>,
    /// Raw error message
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: Some(code.into()),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Extra information used while mapping errors (internal use)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Record name (for `InvalidParameter`)
    pub record_name: Option<String>,
    /// Record ID (for `RecordNotFound`)
    pub record_id: Option<String>,
    /// Zone name or ID (for `DomainNotFound`)
    pub domain: Option<String>,
}

/// Maps raw API errors onto [`ProviderError`] (internal use)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: parse error
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Remote zone client: the capabilities a DNS-01 flow needs from a DNS provider.
///
/// Implementations perform the network I/O; everything above this trait is pure
/// bookkeeping and can be tested against an in-memory implementation.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// List every zone registered with the account.
    async fn list_zones(&self) -> Result<Vec<Zone>>;

    /// Create a TXT record and return it, including the provider-assigned ID.
    async fn create_txt_record(&self, req: &CreateTxtRecordRequest) -> Result<TxtRecord>;

    /// Delete a record by ID.
    ///
    /// Idempotent: deleting a record that no longer exists succeeds.
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;

    /// TXT records in `zone_id` whose fully-qualified name equals `name`.
    ///
    /// The default implementation reports none, which makes callers always create
    /// a fresh record.
    async fn find_txt_records(&self, zone_id: &str, name: &str) -> Result<Vec<TxtRecord>> {
        let _ = (zone_id, name);
        Ok(Vec::new())
    }
}
