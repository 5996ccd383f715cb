//! IONOS HTTP request methods

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::{IonosApiError, IonosProvider, PROVIDER_NAME};

impl IonosProvider {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    fn authorized(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("X-API-Key", &self.api_key)
            .header("Accept", "application/json")
    }

    /// Execute a GET request
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let url = self.url(path);
        let rb = self.authorized(self.client.get(&url));
        let (status, body) = HttpUtils::execute_request(rb, PROVIDER_NAME, "GET", &url).await?;
        self.check_status(status, &body, context)?;
        HttpUtils::parse_json(&body, PROVIDER_NAME)
    }

    /// Execute a POST request with a JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let url = self.url(path);
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: PROVIDER_NAME.to_string(),
                detail: e.to_string(),
            })?;
        log::debug!("[{PROVIDER_NAME}] Request Body: {}", truncate_for_log(&payload));

        let rb = self
            .authorized(self.client.post(&url))
            .header("Content-Type", "application/json")
            .body(payload);
        let (status, body) = HttpUtils::execute_request(rb, PROVIDER_NAME, "POST", &url).await?;
        self.check_status(status, &body, context)?;
        HttpUtils::parse_json(&body, PROVIDER_NAME)
    }

    /// Execute a DELETE request; the response body is ignored on success
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        let url = self.url(path);
        let rb = self.authorized(self.client.delete(&url));
        let (status, body) = HttpUtils::execute_request(rb, PROVIDER_NAME, "DELETE", &url).await?;
        self.check_status(status, &body, context)
    }

    /// Turn a non-2xx response into a mapped [`ProviderError`].
    fn check_status(&self, status: u16, body: &str, context: ErrorContext) -> Result<()> {
        if HttpUtils::is_success(status) {
            return Ok(());
        }

        let raw = match parse_error_body(body) {
            Some(api_error) => RawApiError::with_code(
                api_error.code,
                api_error
                    .message
                    .unwrap_or_else(|| format!("HTTP {status}")),
            ),
            None if body.trim().is_empty() => RawApiError::new(format!("HTTP {status}")),
            None => RawApiError::new(truncate_for_log(body)),
        }
        .status(status);

        log::error!(
            "[{PROVIDER_NAME}] API error (HTTP {status}): code={:?}, message={}",
            raw.code,
            raw.message
        );
        Err(self.map_error(raw, context))
    }
}

/// IONOS answers with a list of errors; a single object is accepted too.
fn parse_error_body(body: &str) -> Option<IonosApiError> {
    if let Ok(errors) = serde_json::from_str::<Vec<IonosApiError>>(body) {
        return errors.into_iter().next();
    }
    serde_json::from_str::<IonosApiError>(body).ok()
}
