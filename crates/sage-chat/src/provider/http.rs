//! Shared HTTP client for provider requests.

use std::time::Duration;

use sage_core::config::ProvidersConfig;

use crate::error::ProviderError;

/// Build the [`reqwest::Client`] shared by every provider.
///
/// No timeout is set unless `timeout_secs` is configured.
pub fn build_client(config: &ProvidersConfig) -> Result<reqwest::Client, ProviderError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ProviderError::Http(format!("failed to build HTTP client: {e}")))
}

/// Send a request and return the status with the raw body.
pub(crate) async fn fetch(
    request: reqwest::RequestBuilder,
) -> Result<(reqwest::StatusCode, Vec<u8>), ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Http(format!("request failed: {e}")))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ProviderError::Http(format!("response read failed: {e}")))?;
    Ok((status, body.to_vec()))
}

/// Decode a JSON body.
pub(crate) fn parse_json(body: &[u8]) -> Result<serde_json::Value, ProviderError> {
    serde_json::from_slice(body).map_err(|e| ProviderError::Parse(e.to_string()))
}
