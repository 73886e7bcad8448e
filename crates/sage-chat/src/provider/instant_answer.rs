//! Instant-answer provider (DuckDuckGo Instant Answer API shape).
//!
//! Consumes `Abstract`, `Answer` and `Definition` (first non-blank wins)
//! plus the optional `AbstractURL`.

use async_trait::async_trait;
use url::Url;

use crate::error::ProviderError;
use crate::provider::http::{fetch, parse_json};
use crate::provider::{first_text, text_at, KnowledgeProvider, ProviderKind, ProviderResult};

/// Answer fields in priority order.
const ANSWER_FIELDS: &[&str] = &["Abstract", "Answer", "Definition"];

/// Client for the structured instant-answer endpoint.
pub struct InstantAnswerProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl InstantAnswerProvider {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::Http(format!("invalid instant answer URL: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Request URL for `topic`.
    pub fn request_url(&self, topic: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", topic)
            .append_pair("format", "json")
            .append_pair("no_redirect", "1");
        url
    }
}

/// Map a decoded response body onto a [`ProviderResult`].
pub fn parse_instant_answer(body: &serde_json::Value) -> ProviderResult {
    match first_text(body, ANSWER_FIELDS) {
        Some(answer) => ProviderResult {
            extract: Some(answer.to_string()),
            source_url: text_at(body, "/AbstractURL"),
            thumbnail_url: None,
        },
        None => ProviderResult::default(),
    }
}

#[async_trait]
impl KnowledgeProvider for InstantAnswerProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::InstantAnswer
    }

    async fn lookup(&self, topic: &str) -> Result<ProviderResult, ProviderError> {
        let url = self.request_url(topic);
        tracing::debug!(topic, "Instant answer lookup");

        let (status, body) = fetch(self.client.get(url)).await?;
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let result = parse_instant_answer(&parse_json(&body)?);
        tracing::debug!(topic, found = result.is_usable(), "Instant answer received");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_prefers_abstract() {
        let body = json!({
            "Abstract": "Rust is a general-purpose programming language.",
            "Answer": "ignored",
            "Definition": "ignored",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)"
        });
        let result = parse_instant_answer(&body);
        assert_eq!(
            result.extract.as_deref(),
            Some("Rust is a general-purpose programming language.")
        );
        assert_eq!(
            result.source_url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Rust_(programming_language)")
        );
        assert!(result.thumbnail_url.is_none());
    }

    #[test]
    fn test_parse_falls_back_to_answer_then_definition() {
        let answer = parse_instant_answer(&json!({"Abstract": "", "Answer": "4"}));
        assert_eq!(answer.extract.as_deref(), Some("4"));

        let definition = parse_instant_answer(&json!({
            "Abstract": "",
            "Answer": "",
            "Definition": "Entropy: a measure of disorder."
        }));
        assert_eq!(
            definition.extract.as_deref(),
            Some("Entropy: a measure of disorder.")
        );
    }

    #[test]
    fn test_parse_empty_response() {
        let result = parse_instant_answer(&json!({
            "Abstract": "",
            "Answer": "",
            "Definition": "",
            "AbstractURL": "https://example.com"
        }));
        assert_eq!(result, ProviderResult::default());
        assert!(!result.is_usable());
    }

    #[test]
    fn test_request_url_encodes_topic() {
        let provider =
            InstantAnswerProvider::new(reqwest::Client::new(), "https://api.duckduckgo.com/")
                .unwrap();
        let url = provider.request_url("ada lovelace & co");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "ada lovelace & co".to_string()),
                ("format".to_string(), "json".to_string()),
                ("no_redirect".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(url.host_str(), Some("api.duckduckgo.com"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(InstantAnswerProvider::new(reqwest::Client::new(), "not a url").is_err());
    }
}
