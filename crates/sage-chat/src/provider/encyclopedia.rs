//! Encyclopedic summary provider (Wikipedia REST `page/summary` shape).
//!
//! The topic is appended to the base URL as a single percent-encoded path
//! segment. Consumes `extract`, `thumbnail.source` and
//! `content_urls.desktop.page`.

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::ProviderError;
use crate::provider::http::{fetch, parse_json};
use crate::provider::{text_at, KnowledgeProvider, ProviderKind, ProviderResult};

/// Client for the page summary endpoint.
pub struct EncyclopediaProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl EncyclopediaProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::Http(format!("invalid summary URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Http(format!(
                "summary URL cannot take a path: {base_url}"
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Request URL for `topic`.
    pub fn request_url(&self, topic: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(topic);
        }
        url
    }
}

/// Map a decoded summary body onto a [`ProviderResult`].
pub fn parse_summary(body: &serde_json::Value) -> ProviderResult {
    match text_at(body, "/extract") {
        Some(extract) => ProviderResult {
            extract: Some(extract),
            source_url: text_at(body, "/content_urls/desktop/page"),
            thumbnail_url: text_at(body, "/thumbnail/source"),
        },
        None => ProviderResult::default(),
    }
}

#[async_trait]
impl KnowledgeProvider for EncyclopediaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Encyclopedia
    }

    async fn lookup(&self, topic: &str) -> Result<ProviderResult, ProviderError> {
        let url = self.request_url(topic);
        tracing::debug!(topic, "Summary lookup");

        let (status, body) = fetch(self.client.get(url)).await?;
        // Missing pages answer 404 with a problem document; that is "not found".
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(topic, "Summary page not found");
            return Ok(ProviderResult::default());
        }
        // Any other error status is a failure even if the body is JSON without
        // an extract; it is not downgraded to "not found".
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let result = parse_summary(&parse_json(&body)?);
        tracing::debug!(topic, found = result.is_usable(), "Summary received");
        Ok(result)
    }
}
