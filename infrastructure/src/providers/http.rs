//! Shared HTTP plumbing for the vendor adapters

use super::error::HttpProviderError;
use chorus_domain::truncate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest error body kept in a status error
const MAX_ERROR_BODY: usize = 300;

/// Client shared by every adapter.
///
/// `timeout` is a safety net; per-attempt budgets are enforced by the retry
/// wrapper.
pub fn build_client(timeout: Duration) -> Result<Client, HttpProviderError> {
    Client::builder()
        .user_agent(concat!("chorus/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| HttpProviderError::Client(e.to_string()))
}

/// Read an API key from the environment; blank values count as missing.
pub fn api_key_from_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// Send `request` and decode a JSON body, mapping non-success statuses.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, HttpProviderError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(HttpProviderError::Status {
            status: status.as_u16(),
            body: truncate(body.trim(), MAX_ERROR_BODY),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| HttpProviderError::Parse(e.to_string()))
}
