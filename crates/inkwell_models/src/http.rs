//! Shared HTTP plumbing for provider clients.

use inkwell_error::{ProviderError, ProviderErrorKind};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::error;

/// Build a client whose every request is bounded by `timeout`.
#[track_caller]
pub(crate) fn client_with_timeout(
    provider: &'static str,
    timeout: Duration,
) -> Result<Client, ProviderError> {
    Client::builder().timeout(timeout).build().map_err(|e| {
        ProviderError::new(
            provider,
            ProviderErrorKind::Builder(format!("HTTP client: {}", e)),
        )
    })
}

/// Classify a transport failure.
#[track_caller]
pub(crate) fn send_error(provider: &'static str, e: reqwest::Error) -> ProviderError {
    error!(provider, error = ?e, "Failed to send request");
    let kind = if e.is_timeout() {
        ProviderErrorKind::Timeout(e.to_string())
    } else {
        ProviderErrorKind::Http(e.to_string())
    };
    ProviderError::new(provider, kind)
}

/// Turn a non-2xx response into an error carrying the body.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: Response,
) -> Result<Response, ProviderError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!(provider, status = %status, body = %body, "Provider returned error");
    Err(ProviderError::new(
        provider,
        ProviderErrorKind::Api {
            status: status.as_u16(),
            message: body,
        },
    ))
}

/// Decode a JSON response body.
pub(crate) async fn decode<T>(provider: &'static str, response: Response) -> Result<T, ProviderError>
where
    T: serde::de::DeserializeOwned,
{
    response.json::<T>().await.map_err(|e| {
        error!(provider, error = ?e, "Failed to decode provider response");
        ProviderError::new(provider, ProviderErrorKind::Decode(e.to_string()))
    })
}
