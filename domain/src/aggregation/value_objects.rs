//! Aggregation value objects - per-provider outcomes and the final result.
//!
//! - [`ProviderOutcome`] - tagged success/failure of one provider call
//! - [`ProviderResponse`] - one provider's outcome within a fanout
//! - [`AggregationResult`] - final text, raw answers and contribution weights

use crate::aggregation::policy::SelectionPolicy;
use crate::core::language::Language;
use crate::core::provider::ProviderName;
use crate::scoring::{Contributions, EmbeddingVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix that marks a failed answer once it is rendered as text.
pub const ERROR_MARKER: &str = "Error:";

/// What a provider task produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum ProviderOutcome {
    Answer(String),
    Failed(String),
}

/// Outcome of one provider within a fanout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub provider: ProviderName,
    pub outcome: ProviderOutcome,
    /// Position in completion order, starting at 0.
    pub arrival: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<EmbeddingVector>,
    /// False for context-only participants: shown in the raw map, never
    /// embedded, selected or weighted.
    #[serde(default = "default_scored", skip_serializing_if = "is_scored")]
    pub scored: bool,
}

fn default_scored() -> bool {
    true
}

fn is_scored(scored: &bool) -> bool {
    *scored
}

impl ProviderResponse {
    pub fn answer(provider: impl Into<ProviderName>, text: impl Into<String>, arrival: usize) -> Self {
        Self {
            provider: provider.into(),
            outcome: ProviderOutcome::Answer(text.into()),
            arrival,
            embedding: None,
            scored: true,
        }
    }

    pub fn failure(
        provider: impl Into<ProviderName>,
        reason: impl Into<String>,
        arrival: usize,
    ) -> Self {
        Self {
            provider: provider.into(),
            outcome: ProviderOutcome::Failed(reason.into()),
            arrival,
            embedding: None,
            scored: true,
        }
    }

    pub fn with_embedding(mut self, embedding: EmbeddingVector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn context_only(mut self) -> Self {
        self.scored = false;
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProviderOutcome::Answer(_))
    }

    /// The answer text, if the provider succeeded.
    pub fn answer_text(&self) -> Option<&str> {
        match &self.outcome {
            ProviderOutcome::Answer(text) => Some(text),
            ProviderOutcome::Failed(_) => None,
        }
    }

    /// User-facing rendering; failures carry the [`ERROR_MARKER`] prefix.
    pub fn display_text(&self) -> String {
        match &self.outcome {
            ProviderOutcome::Answer(text) => text.clone(),
            ProviderOutcome::Failed(reason) => {
                format!("{} {} did not respond: {}", ERROR_MARKER, self.provider, reason)
            }
        }
    }
}

/// Final per-request output of the reconciliation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Selected or synthesized answer
    pub final_text: String,
    /// Every dispatched provider → its answer or error string
    pub raw_responses: BTreeMap<ProviderName, String>,
    /// Providers with a computable score → percentage
    pub contributions: Contributions,
    pub policy: SelectionPolicy,
    /// Provider whose answer anchored the selection, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ProviderName>,
    /// True when re-synthesis failed and a single raw answer was used instead
    #[serde(default)]
    pub degraded: bool,
}

impl AggregationResult {
    pub fn new(
        final_text: impl Into<String>,
        responses: &[ProviderResponse],
        contributions: Contributions,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            final_text: final_text.into(),
            raw_responses: raw_map(responses),
            contributions,
            policy,
            reference: None,
            degraded: false,
        }
    }

    /// Result for a fanout in which no provider produced a usable answer.
    pub fn no_valid_responses(
        language: &Language,
        responses: &[ProviderResponse],
        policy: SelectionPolicy,
    ) -> Self {
        Self::new(
            language.no_valid_responses(),
            responses,
            Contributions::empty(),
            policy,
        )
    }

    pub fn with_reference(mut self, reference: ProviderName) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }
}

fn raw_map(responses: &[ProviderResponse]) -> BTreeMap<ProviderName, String> {
    responses
        .iter()
        .map(|r| (r.provider.clone(), r.display_text()))
        .collect()
}
