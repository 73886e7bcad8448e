//! Knowledge providers.
//!
//! Each provider answers a topic with a [`ProviderResult`]. A result whose
//! extract is missing or blank counts as "nothing found"; transport and
//! decoding problems come back as [`ProviderError`].

pub mod encyclopedia;
pub mod http;
pub mod instant_answer;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ProviderError;

pub use encyclopedia::EncyclopediaProvider;
pub use instant_answer::InstantAnswerProvider;

/// Which service produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Structured instant answers (abstract / answer / definition).
    InstantAnswer,
    /// Encyclopedic page summaries.
    Encyclopedia,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::InstantAnswer => "instant_answer",
            ProviderKind::Encyclopedia => "encyclopedia",
        }
    }

    /// Label for the source link shown under an answer.
    pub fn source_label(&self) -> &'static str {
        match self {
            ProviderKind::InstantAnswer => "📘 Source",
            ProviderKind::Encyclopedia => "📘 Wikipedia Source",
        }
    }
}

/// What a provider returned for a topic. Transient; never persisted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResult {
    pub extract: Option<String>,
    pub source_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl ProviderResult {
    pub fn with_extract(extract: impl Into<String>) -> Self {
        Self {
            extract: Some(extract.into()),
            ..Self::default()
        }
    }

    /// The extract, if it has any non-whitespace content.
    pub fn usable_extract(&self) -> Option<&str> {
        self.extract.as_deref().filter(|e| !e.trim().is_empty())
    }

    pub fn is_usable(&self) -> bool {
        self.usable_extract().is_some()
    }
}

/// A single knowledge service.
#[async_trait]
pub trait KnowledgeProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Look up `topic`. An empty [`ProviderResult`] means the service had nothing.
    async fn lookup(&self, topic: &str) -> Result<ProviderResult, ProviderError>;
}

/// Pick the first non-blank string field of a JSON object, in order.
pub(crate) fn first_text<'a>(value: &'a serde_json::Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| value.get(*field).and_then(serde_json::Value::as_str))
        .find(|text| !text.trim().is_empty())
}

/// A non-blank string at a JSON pointer.
pub(crate) fn text_at(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(serde_json::Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
