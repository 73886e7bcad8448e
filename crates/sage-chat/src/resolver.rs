//! Provider fallback chain and knowledge resolution.
//!
//! A [`ProviderChain`] asks each provider in order and stops at the first
//! usable extract. A failing provider that still has a successor is treated
//! like an empty one; only a failure of the last provider surfaces as
//! [`Resolution::NetworkError`]. Running out of providers otherwise yields
//! [`Resolution::NotFound`].

use std::sync::Arc;

use sage_core::config::ProvidersConfig;

use crate::error::ProviderError;
use crate::provider::http::build_client;
use crate::provider::{
    EncyclopediaProvider, InstantAnswerProvider, KnowledgeProvider, ProviderKind, ProviderResult,
};

/// Terminal outcome of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A provider returned a usable extract.
    Answer {
        provider: ProviderKind,
        result: ProviderResult,
    },
    /// Every provider answered cleanly but none had content.
    NotFound,
    /// The last provider in the chain could not be reached or decoded.
    NetworkError(ProviderError),
}

impl Resolution {
    pub fn is_answer(&self) -> bool {
        matches!(self, Resolution::Answer { .. })
    }
}

/// What one chain step produced.
#[derive(Debug)]
enum StepOutcome {
    Usable(ProviderResult),
    Empty,
    Failed(ProviderError),
}

impl From<Result<ProviderResult, ProviderError>> for StepOutcome {
    fn from(result: Result<ProviderResult, ProviderError>) -> Self {
        match result {
            Ok(r) if r.is_usable() => StepOutcome::Usable(r),
            Ok(_) => StepOutcome::Empty,
            Err(e) => StepOutcome::Failed(e),
        }
    }
}

/// Ordered chain of responsibility over knowledge providers.
#[derive(Clone)]
pub struct ProviderChain {
    steps: Vec<Arc<dyn KnowledgeProvider>>,
}

impl ProviderChain {
    pub fn new(steps: Vec<Arc<dyn KnowledgeProvider>>) -> Self {
        Self { steps }
    }

    pub async fn resolve(&self, topic: &str) -> Resolution {
        let last = self.steps.len().saturating_sub(1);
        for (index, step) in self.steps.iter().enumerate() {
            let provider = step.kind();
            match StepOutcome::from(step.lookup(topic).await) {
                StepOutcome::Usable(result) => {
                    tracing::info!(topic, provider = provider.name(), "Answer found");
                    return Resolution::Answer { provider, result };
                }
                StepOutcome::Empty => {
                    tracing::debug!(topic, provider = provider.name(), "Provider had no answer");
                }
                StepOutcome::Failed(error) if index == last => {
                    tracing::warn!(topic, provider = provider.name(), error = %error, "Provider failed");
                    return Resolution::NetworkError(error);
                }
                StepOutcome::Failed(error) => {
                    tracing::warn!(
                        topic,
                        provider = provider.name(),
                        error = %error,
                        "Provider failed, falling back"
                    );
                }
            }
        }
        tracing::info!(topic, "No provider had an answer");
        Resolution::NotFound
    }
}

/// Keep the first `line_limit` sentence-like units of `extract`.
///
/// Units are separated by `". "`. The result always ends with a period,
/// without doubling one that is already there.
///
/// A limit of zero keeps one unit instead of returning a bare `"."`; this
/// deliberately departs from a literal "first `line_limit` units" reading.
pub fn truncate_sentences(extract: &str, line_limit: usize) -> String {
    let kept: Vec<&str> = extract.split(". ").take(line_limit.max(1)).collect();
    let mut text = kept.join(". ");
    if !text.ends_with('.') {
        text.push('.');
    }
    text
}

/// Generic and line-limited resolution over two providers.
///
/// Generic lookups go through the primary then the secondary provider.
/// Line-limited lookups only ever ask the secondary provider.
#[derive(Clone)]
pub struct KnowledgeResolver {
    generic: ProviderChain,
    limited: ProviderChain,
}

impl KnowledgeResolver {
    pub fn new(primary: Arc<dyn KnowledgeProvider>, secondary: Arc<dyn KnowledgeProvider>) -> Self {
        Self {
            generic: ProviderChain::new(vec![primary, Arc::clone(&secondary)]),
            limited: ProviderChain::new(vec![secondary]),
        }
    }

    /// Instant-answer primary and encyclopedia secondary over one shared client.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let client = build_client(config)?;
        let primary = InstantAnswerProvider::new(client.clone(), &config.instant_answer_url)?;
        let secondary = EncyclopediaProvider::new(client, &config.summary_url)?;
        Ok(Self::new(Arc::new(primary), Arc::new(secondary)))
    }

    pub async fn resolve_generic(&self, topic: &str) -> Resolution {
        self.generic.resolve(topic).await
    }

    pub async fn resolve_limited(&self, topic: &str, line_limit: usize) -> Resolution {
        match self.limited.resolve(topic).await {
            Resolution::Answer {
                provider,
                mut result,
            } => {
                result.extract = result
                    .extract
                    .map(|extract| truncate_sentences(&extract, line_limit));
                Resolution::Answer { provider, result }
            }
            other => other,
        }
    }
}
