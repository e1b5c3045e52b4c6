//! Shared HTTP transport for the remote clients.
//!
//! Every remote client posts one JSON body and decodes one JSON reply, so the
//! transport owns the reqwest client, the timeouts and the mapping from HTTP
//! failures onto `ApiError`.

use crate::error::ApiError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub(crate) fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::ProviderError(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// POST `body` to `url` and decode the reply as `R`.
    ///
    /// Non-2xx statuses are read to text and handed to [`status_error`].
    pub(crate) async fn post_json<B, R>(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: &B,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut header_map = HeaderMap::new();
        header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let value = HeaderValue::from_str(value).map_err(|_| {
                ApiError::ProviderNotConfigured(format!("Header '{}' has an unusable value", name))
            })?;
            header_map.insert(HeaderName::from_static(*name), value);
        }

        debug!(url, "posting completion request");
        let response = self
            .client
            .post(url)
            .headers(header_map)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ApiError::ProviderError(format!("Unreadable provider reply: {}", e)))
    }
}

pub(crate) fn transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        return ApiError::ProviderTimeout(error.to_string());
    }
    if error.is_connect() {
        return ApiError::ProviderRequestFailed(format!("connection failed: {}", error));
    }
    match error.status() {
        Some(status) => status_error(status, &error.to_string()),
        None => ApiError::ProviderError(error.to_string()),
    }
}

/// Sort a failed status into the provider error taxonomy.
///
/// 429 covers both quota exhaustion and plain throttling; the body decides.
pub(crate) fn status_error(status: StatusCode, body: &str) -> ApiError {
    let detail = format!("{} {}", status.as_u16(), body.trim());
    let mentions_quota = {
        let lowered = body.to_lowercase();
        lowered.contains("quota") || lowered.contains("billing")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::ProviderAuthFailed(detail),
        StatusCode::TOO_MANY_REQUESTS if mentions_quota => ApiError::ProviderQuotaExceeded(detail),
        StatusCode::TOO_MANY_REQUESTS => ApiError::ProviderRateLimit(detail),
        StatusCode::NOT_FOUND => ApiError::ProviderModelNotFound(detail),
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::ProviderInvalidRequest(detail)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ApiError::ProviderTimeout(detail)
        }
        _ => ApiError::ProviderRequestFailed(detail),
    }
}
